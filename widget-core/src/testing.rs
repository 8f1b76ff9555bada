//! Network stub for exercising the widget without reaching OpenWeather.

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    error::FetchError,
    model::{Query, WeatherDisplayModel},
    provider::{WeatherProvider, openweather::parse_current},
};

/// Current-weather response for Gainesville, FL as returned by OpenWeather.
pub const GAINESVILLE_FIXTURE: &str = r#"{
  "coord": { "lon": -82.3248, "lat": 29.6516 },
  "weather": [
    { "id": 800, "main": "Clear", "description": "clear sky", "icon": "01n" }
  ],
  "base": "stations",
  "main": {
    "temp": 80.56,
    "feels_like": 84.33,
    "temp_min": 78.71,
    "temp_max": 82.6,
    "pressure": 1018,
    "humidity": 73
  },
  "visibility": 10000,
  "wind": { "speed": 9.22, "deg": 80 },
  "clouds": { "all": 1 },
  "dt": 1624840993,
  "sys": {
    "type": 2,
    "id": 2039367,
    "country": "US",
    "sunrise": 1624789874,
    "sunset": 1624840404
  },
  "timezone": -14400,
  "id": 4156404,
  "name": "Gainesville",
  "cod": 200
}"#;

/// OpenWeather's body for an unknown city.
pub const NOT_FOUND_FIXTURE: &str = r#"{"cod":"404","message":"city not found"}"#;

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Unavailable,
    Pending,
}

#[derive(Debug, Clone)]
struct Route {
    qualified: String,
    reply: Reply,
    delay: Option<Duration>,
}

/// Stand-in for the weather provider.
///
/// Bodies go through the same decoding as live responses. Every query is
/// recorded in call order.
#[derive(Debug)]
pub struct StubProvider {
    default: Reply,
    routes: Vec<Route>,
    queries: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self::new(Reply::Body(body.into()))
    }

    /// Fails every request with a provider-reported 503. The request itself
    /// succeeds; transport failures need a real client.
    pub fn service_unavailable() -> Self {
        Self::new(Reply::Unavailable)
    }

    fn new(default: Reply) -> Self {
        Self {
            default,
            routes: Vec::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Never resolve the default reply.
    pub fn pending(mut self) -> Self {
        self.default = Reply::Pending;
        self
    }

    /// Answer `qualified` with `body` after `delay`, instead of the default.
    pub fn route(mut self, qualified: &str, body: impl Into<String>, delay: Duration) -> Self {
        self.routes.push(Route {
            qualified: qualified.to_string(),
            reply: Reply::Body(body.into()),
            delay: Some(delay),
        });
        self
    }

    /// Qualified queries received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn fetch_weather(&self, query: &Query) -> Result<WeatherDisplayModel, FetchError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.qualified.clone());

        let (reply, delay) = self
            .routes
            .iter()
            .find(|r| r.qualified == query.qualified)
            .map(|r| (r.reply.clone(), r.delay))
            .unwrap_or_else(|| (self.default.clone(), None));

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Body(body) => parse_current(&body),
            Reply::Unavailable => Err(FetchError::Provider {
                code: 503,
                message: "service unavailable".to_string(),
            }),
            Reply::Pending => std::future::pending().await,
        }
    }
}
