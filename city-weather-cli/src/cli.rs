use anyhow::{Context, bail};
use city_weather_core::{
    CityDataset, Config, OpenDataSoftDataset, Session, Units, WeatherSummary,
    provider_from_config,
};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use std::path::PathBuf;

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "city-weather", version, about = "Browse cities and show their current weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// OpenWeather API key; takes precedence over the config file.
    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Unit system for weather output: metric, imperial or standard.
    #[arg(long, global = true, value_parser = parse_units)]
    pub units: Option<Units>,

    /// Write debug logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather API key and preferred units.
    Configure,

    /// Interactive city table with search and weather view (default).
    Browse,

    /// Print one page of cities.
    Cities {
        /// Offset of the first record.
        #[arg(long, default_value_t = 0)]
        start: u64,

        /// Number of records; defaults to the configured page size.
        #[arg(long)]
        rows: Option<u64>,
    },

    /// Print cities matching a free-text query.
    Search {
        query: String,
    },

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,
    },
}

fn parse_units(value: &str) -> Result<Units, String> {
    Units::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli {
            command,
            api_key,
            units,
            ..
        } = self;

        match command.unwrap_or(Command::Browse) {
            Command::Configure => configure()?,
            Command::Browse => {
                let config = load_config(api_key, units)?;
                let session = Session::from_config(&config)?;
                interactive::run(session).await?;
            }
            Command::Cities { start, rows } => {
                let config = load_config(api_key, units)?;
                let rows = rows.unwrap_or(config.dataset.page_size);
                if rows == 0 {
                    bail!("--rows must be greater than zero");
                }
                let dataset = OpenDataSoftDataset::from_config(&config.dataset);
                let page = dataset
                    .fetch_page(start, rows)
                    .await
                    .context("Failed to fetch cities")?;
                print!("{}", render::city_table(&page.records));
            }
            Command::Search { query } => {
                let query = query.trim();
                if query.is_empty() {
                    bail!("Search query must not be empty");
                }
                let config = load_config(api_key, units)?;
                let dataset = OpenDataSoftDataset::from_config(&config.dataset);
                let page = dataset
                    .search(query)
                    .await
                    .context("Failed to search cities")?;
                if page.records.is_empty() {
                    println!("No cities match \"{query}\".");
                } else {
                    print!("{}", render::city_table(&page.records));
                }
            }
            Command::Show { city } => {
                let config = load_config(api_key, units)?;
                let provider = provider_from_config(&config)?;
                let record = provider
                    .fetch_weather(city.trim())
                    .await
                    .with_context(|| format!("Failed to fetch weather for '{city}'"))?;
                let summary = WeatherSummary::from_record(&record);
                print!("{}", render::weather_detail(&summary));
            }
        }

        Ok(())
    }
}

/// Config file with command-line overrides applied.
fn load_config(api_key: Option<String>, units: Option<Units>) -> anyhow::Result<Config> {
    let mut config = Config::load()?.with_api_key_override(api_key);
    if let Some(units) = units {
        config.units = units;
    }
    Ok(config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key);
    }

    let current = Units::all()
        .iter()
        .position(|u| *u == config.units)
        .unwrap_or(0);
    config.units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(current)
        .prompt()?;

    config.save()?;
    let path = Config::config_file_path()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
