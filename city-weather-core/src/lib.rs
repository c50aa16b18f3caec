//! Core library for the `city-weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The city dataset client and its browse/search state
//! - The weather provider abstraction
//! - The session that switches between the city table and a weather view
//!
//! It is used by `city-weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod dataset;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod session;

pub use config::{Config, DatasetConfig, WeatherConfig};
pub use dataset::{CityDataset, OpenDataSoftDataset};
pub use error::LookupError;
pub use lookup::{CityLookup, PageTicket, SearchTicket};
pub use model::{CityPage, CityRecord, Units, WeatherRecord, WeatherSummary};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use session::{Session, View};
