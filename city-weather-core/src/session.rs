//! Top-level view state: browsing the city table or looking at one city's weather.

use crate::{
    Config,
    dataset::{CityDataset, OpenDataSoftDataset},
    error::Result,
    lookup::CityLookup,
    model::WeatherRecord,
    provider::{WeatherProvider, provider_from_config},
};

/// Which screen is showing. Exactly one is visible at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Browsing,
    WeatherDetail(WeatherRecord),
}

#[derive(Debug)]
pub struct Session {
    dataset: Box<dyn CityDataset>,
    weather: Box<dyn WeatherProvider>,
    lookup: CityLookup,
    view: View,
}

impl Session {
    pub fn new(
        dataset: Box<dyn CityDataset>,
        weather: Box<dyn WeatherProvider>,
        page_size: u64,
    ) -> Self {
        Self {
            dataset,
            weather,
            lookup: CityLookup::new(page_size),
            view: View::Browsing,
        }
    }

    /// Build a session talking to the configured public endpoints.
    pub fn from_config(config: &Config) -> Result<Self> {
        let weather = provider_from_config(config)?;
        let dataset = Box::new(OpenDataSoftDataset::from_config(&config.dataset));

        Ok(Self::new(dataset, weather, config.dataset.page_size))
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn lookup(&self) -> &CityLookup {
        &self.lookup
    }

    /// Weather currently on display, if any.
    pub fn current_weather(&self) -> Option<&WeatherRecord> {
        match &self.view {
            View::WeatherDetail(record) => Some(record),
            View::Browsing => None,
        }
    }

    /// Load the first page of the table.
    pub async fn start(&mut self) -> bool {
        self.load_more().await
    }

    pub async fn load_more(&mut self) -> bool {
        self.lookup.load_next_page(self.dataset.as_ref()).await
    }

    pub async fn search(&mut self, query: &str) -> bool {
        self.lookup.search(self.dataset.as_ref(), query).await
    }

    /// Fetch weather for `city_name` and switch to the detail view on success.
    ///
    /// Failures are logged and leave the current view as it was.
    pub async fn fetch_weather(&mut self, city_name: &str) -> bool {
        match self.weather.fetch_weather(city_name).await {
            Ok(record) => {
                tracing::info!(city = city_name, "showing weather");
                self.view = View::WeatherDetail(record);
                true
            }
            Err(err) => {
                tracing::error!(city = city_name, error = %err, "failed to fetch weather");
                false
            }
        }
    }

    /// Fetch weather for the current query, if there is one.
    pub async fn submit_search(&mut self) -> bool {
        let query = self.lookup.query().trim().to_string();
        if query.is_empty() {
            return false;
        }
        self.fetch_weather(&query).await
    }

    /// Return to the table. Lookup state is kept.
    pub fn back(&mut self) {
        self.view = View::Browsing;
    }
}
