use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::ProviderSettings,
    error::FetchError,
    model::{Coordinates, Query, WeatherDisplayModel},
};

use super::WeatherProvider;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Current-conditions client for the OpenWeather "weather by city name" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    settings: ProviderSettings,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            http: Client::new(),
        }
    }

    /// Full request URL for `query`, with `q` escaped.
    pub fn request_url(&self, query: &Query) -> Result<Url, FetchError> {
        let endpoint = format!(
            "{}{}",
            self.settings.base_url.trim_end_matches('/'),
            CURRENT_WEATHER_PATH
        );

        Url::parse_with_params(
            &endpoint,
            &[
                ("q", query.qualified.as_str()),
                ("units", self.settings.units.as_str()),
                ("appid", self.settings.api_key.as_str()),
            ],
        )
        .map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, query: &Query) -> Result<WeatherDisplayModel, FetchError> {
        let url = self.request_url(query)?;
        debug!(q = %query.qualified, units = %self.settings.units, "requesting current weather");

        let res = self.http.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "weather provider returned an error status");
        }

        parse_current(&body)
    }
}

/// Decode a current-weather body and project it into a display model.
///
/// The not-found signal is the top-level `cod` field equal to 404. The
/// provider sends `cod` as a number on success and as a string on errors,
/// so both encodings are read into the same code.
pub fn parse_current(body: &str) -> Result<WeatherDisplayModel, FetchError> {
    let status: OwStatus = serde_json::from_str(body)?;

    match status.cod {
        Some(OwCode(404)) => return Err(FetchError::LocationNotFound),
        Some(OwCode(200)) | None => {}
        Some(OwCode(code)) => {
            return Err(FetchError::Provider {
                code,
                message: status.message.unwrap_or_default(),
            });
        }
    }

    let parsed: OwCurrentResponse = serde_json::from_str(body)?;
    parsed.into_display_model()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "OwRawCode")]
struct OwCode(u16);

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwRawCode {
    Number(u16),
    Text(String),
}

impl TryFrom<OwRawCode> for OwCode {
    type Error = String;

    fn try_from(raw: OwRawCode) -> Result<Self, Self::Error> {
        match raw {
            OwRawCode::Number(n) => Ok(OwCode(n)),
            OwRawCode::Text(s) => s
                .trim()
                .parse()
                .map(OwCode)
                .map_err(|_| format!("invalid status code {s:?}")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwStatus {
    cod: Option<OwCode>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    weather: Vec<OwWeather>,
    main: OwMain,
    name: String,
    sys: OwSys,
    dt: i64,
    /// Shift in seconds from UTC for the queried place.
    timezone: Option<i32>,
}

impl OwCurrentResponse {
    fn into_display_model(self) -> Result<WeatherDisplayModel, FetchError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| schema_error("`weather` contained no conditions"))?;

        let observed_at = DateTime::from_timestamp(self.dt, 0)
            .ok_or_else(|| schema_error(&format!("`dt` {} is out of range", self.dt)))?;

        Ok(WeatherDisplayModel {
            coordinates: Coordinates {
                lat: self.coord.lat,
                lon: self.coord.lon,
            },
            icon_url: format!("{ICON_BASE_URL}/{}@2x.png", condition.icon),
            description: condition.description,
            current_temperature: self.main.temp,
            feels_like_temperature: self.main.feels_like,
            place: format!("{}, {}", self.name, self.sys.country),
            observed_at,
            utc_offset: self.timezone.and_then(FixedOffset::east_opt),
        })
    }
}

fn schema_error(msg: &str) -> FetchError {
    FetchError::Parse(<serde_json::Error as serde::de::Error>::custom(msg))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
