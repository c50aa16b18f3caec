use crate::{
    Config, error::Result, model::WeatherRecord, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Current weather keyed by city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, city_name: &str) -> Result<WeatherRecord>;
}

/// Construct the weather provider from config.
///
/// Fails with [`crate::LookupError::MissingApiKey`] when no key is configured.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = OpenWeatherProvider::new(api_key.to_owned(), config.units)
        .with_base_url(&config.weather.base_url);

    Ok(Box::new(provider))
}
