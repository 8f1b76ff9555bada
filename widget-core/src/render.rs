use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{
    dom::{Element, RenderTarget},
    model::WeatherDisplayModel,
};

pub const NOT_FOUND_MESSAGE: &str = "Location not found";
pub const MAP_LINK_TEXT: &str = "Click to view map";
pub const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

const TIME_FORMAT: &str = "%-I:%M %p";

/// Zone used for the "Last updated" line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The host's local zone.
    #[default]
    Local,
    Named(Tz),
    /// The queried place's own offset as reported by the provider; UTC if unknown.
    Location,
}

impl FromStr for DisplayZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "local" => Ok(DisplayZone::Local),
            "location" => Ok(DisplayZone::Location),
            other => other
                .parse::<Tz>()
                .map(DisplayZone::Named)
                .map_err(|_| format!("unknown timezone '{other}'")),
        }
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayZone::Local => f.write_str("local"),
            DisplayZone::Location => f.write_str("location"),
            DisplayZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// Draws display models (or the not-found message) into a render target.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    zone: DisplayZone,
}

impl Renderer {
    pub fn new(zone: DisplayZone) -> Self {
        Self { zone }
    }

    /// Replace the target's contents with a single not-found heading.
    pub fn render_error<T: RenderTarget + ?Sized>(&self, target: &mut T) {
        target.clear();
        target.append(Element::new("h2").with_text(NOT_FOUND_MESSAGE));
    }

    /// Replace the target's contents with the weather view for `model`.
    ///
    /// Consumers address these nodes by position, so the order is fixed:
    /// place, map link, icon, description, break, current, feels like,
    /// break, last updated.
    pub fn render_weather<T: RenderTarget + ?Sized>(
        &self,
        target: &mut T,
        model: &WeatherDisplayModel,
    ) {
        target.clear();

        for element in self.weather_elements(model) {
            target.append(element);
        }
    }

    fn weather_elements(&self, model: &WeatherDisplayModel) -> [Element; 9] {
        [
            Element::new("h2").with_text(model.place.as_str()),
            Element::new("a")
                .with_attr("href", format!("{MAP_SEARCH_URL}{}", model.coordinates))
                .with_attr("target", "_blank")
                .with_text(MAP_LINK_TEXT),
            Element::new("img").with_attr("src", model.icon_url.as_str()),
            Element::new("p")
                .with_attr("style", "text-transform: capitalize")
                .with_text(model.description.as_str()),
            Element::new("br"),
            Element::new("p").with_text(format!("Current: {}° F", degrees(model.current_temperature))),
            Element::new("p").with_text(format!(
                "Feels like: {}° F",
                degrees(model.feels_like_temperature)
            )),
            Element::new("br"),
            Element::new("p").with_text(format!("Last updated: {}", self.format_time(model))),
        ]
    }

    /// Hour and minute on a 12-hour clock, e.g. `8:43 PM`.
    pub fn format_time(&self, model: &WeatherDisplayModel) -> String {
        match self.zone {
            DisplayZone::Local => format_in(model.observed_at, &Local),
            DisplayZone::Named(tz) => format_in(model.observed_at, &tz),
            DisplayZone::Location => match model.utc_offset {
                Some(offset) => format_in(model.observed_at, &offset),
                None => format_in(model.observed_at, &Utc),
            },
        }
    }
}

/// Folds `-0.0` into `0.0` so a reading of zero never shows a sign.
fn degrees(t: f64) -> f64 {
    t + 0.0
}

fn format_in<Z: TimeZone>(at: DateTime<Utc>, zone: &Z) -> String
where
    Z::Offset: fmt::Display,
{
    at.with_timezone(zone).format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dom::Container, model::Coordinates};
    use chrono::FixedOffset;

    fn model(place: &str) -> WeatherDisplayModel {
        WeatherDisplayModel {
            coordinates: Coordinates { lat: 29.6516, lon: -82.3248 },
            description: "clear sky".into(),
            icon_url: "https://openweathermap.org/img/wn/01n@2x.png".into(),
            current_temperature: 80.56,
            feels_like_temperature: 84.33,
            place: place.into(),
            observed_at: DateTime::from_timestamp(1_624_840_993, 0).unwrap(),
            utc_offset: FixedOffset::east_opt(-14_400),
        }
    }

    #[test]
    fn error_render_is_single_heading() {
        let mut c = Container::default();
        c.append(Element::new("p").with_text("stale"));

        Renderer::default().render_error(&mut c);

        assert_eq!(c.children().len(), 1);
        assert_eq!(c.children()[0].tag(), "h2");
        assert_eq!(c.children()[0].text_content(), "Location not found");
    }

    #[test]
    fn weather_render_has_fixed_structure() {
        let mut c = Container::default();
        Renderer::new(DisplayZone::Location).render_weather(&mut c, &model("Gainesville, US"));

        let tags: Vec<&str> = c.children().iter().map(Element::tag).collect();
        assert_eq!(tags, ["h2", "a", "img", "p", "br", "p", "p", "br", "p"]);

        let link = &c.children()[1];
        assert_eq!(link.attr("target"), Some("_blank"));
        assert_eq!(
            link.attr("href"),
            Some("https://www.google.com/maps/search/?api=1&query=29.6516,-82.3248")
        );
    }

    #[test]
    fn whole_number_temperatures_drop_fraction() {
        let mut m = model("X, US");
        m.current_temperature = 80.0;
        m.feels_like_temperature = -3.5;

        let mut c = Container::default();
        Renderer::default().render_weather(&mut c, &m);

        assert_eq!(c.children()[5].text_content(), "Current: 80° F");
        assert_eq!(c.children()[6].text_content(), "Feels like: -3.5° F");
    }

    #[test]
    fn negative_zero_renders_without_sign() {
        let mut m = model("X, US");
        m.current_temperature = -0.0;
        m.feels_like_temperature = -0.0;

        let mut c = Container::default();
        Renderer::default().render_weather(&mut c, &m);

        assert_eq!(c.children()[5].text_content(), "Current: 0° F");
        assert_eq!(c.children()[6].text_content(), "Feels like: 0° F");
    }

    #[test]
    fn time_follows_display_zone() {
        let m = model("X, US");

        let ny = Renderer::new(DisplayZone::Named(chrono_tz::America::New_York));
        assert_eq!(ny.format_time(&m), "8:43 PM");

        let utc = Renderer::new(DisplayZone::Named(chrono_tz::UTC));
        assert_eq!(utc.format_time(&m), "12:43 AM");

        let loc = Renderer::new(DisplayZone::Location);
        assert_eq!(loc.format_time(&m), "8:43 PM");

        let mut no_offset = m.clone();
        no_offset.utc_offset = None;
        assert_eq!(loc.format_time(&no_offset), "12:43 AM");
    }

    #[test]
    fn display_zone_parse_and_display() {
        assert_eq!("local".parse::<DisplayZone>().unwrap(), DisplayZone::Local);
        assert_eq!(" location ".parse::<DisplayZone>().unwrap(), DisplayZone::Location);

        let tz: DisplayZone = "Europe/Berlin".parse().unwrap();
        assert_eq!(tz.to_string(), "Europe/Berlin");

        let err = "Nowhere/Special".parse::<DisplayZone>().unwrap_err();
        assert!(err.contains("unknown timezone"));
    }
}
