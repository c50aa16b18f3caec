use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{
    config::DEFAULT_WEATHER_URL,
    error::{LookupError, Result},
    model::{Units, WeatherRecord},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    units: Units,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, units: Units) -> Self {
        Self {
            api_key,
            units,
            base_url: DEFAULT_WEATHER_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, city_name: &str) -> Result<WeatherRecord> {
        let url = format!("{}/weather", self.base_url);
        tracing::debug!(city = city_name, units = %self.units, "fetching current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city_name),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::status(status, &body));
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| LookupError::malformed("OpenWeather current JSON", e))?;

        Ok(WeatherRecord {
            city: city_name.to_string(),
            units: self.units,
            payload,
        })
    }
}
