use crate::{Config, FetchError, Query, WeatherDisplayModel, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Source of current conditions for a query.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, query: &Query) -> Result<WeatherDisplayModel, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let settings = config.provider_settings()?;
    Ok(Arc::new(OpenWeatherProvider::new(settings)))
}
