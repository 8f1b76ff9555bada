use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

/// A normalized location query built from one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub raw: String,
    pub trimmed: String,
    /// The value sent to the provider as `q`.
    pub qualified: String,
}

impl Query {
    /// Normalize raw user input. Returns `None` when nothing but whitespace was typed.
    ///
    /// Input without a comma gets `,<default_region>` appended; input that
    /// already names a region is sent as-is.
    pub fn parse(raw: &str, default_region: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let qualified = if trimmed.contains(',') {
            trimmed.to_string()
        } else {
            format!("{trimmed},{default_region}")
        };

        Some(Self {
            raw: raw.to_string(),
            trimmed: trimmed.to_string(),
            qualified,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// UI-ready projection of a successful provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherDisplayModel {
    pub coordinates: Coordinates,
    pub description: String,
    pub icon_url: String,
    /// Degrees Fahrenheit, as reported.
    pub current_temperature: f64,
    /// Degrees Fahrenheit, as reported.
    pub feels_like_temperature: f64,
    /// `"City, CountryCode"`.
    pub place: String,
    pub observed_at: DateTime<Utc>,
    /// UTC offset of the queried place, when the provider reports one.
    pub utc_offset: Option<FixedOffset>,
}
