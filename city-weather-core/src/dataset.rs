//! Transport for the public geonames city dataset.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    config::DatasetConfig,
    error::{LookupError, Result},
    model::{CityPage, CityRecord},
};

/// Source of city records: paginated browsing and free-text search.
#[async_trait]
pub trait CityDataset: Send + Sync + Debug {
    /// Fetch `rows` records starting at offset `start`.
    async fn fetch_page(&self, start: u64, rows: u64) -> Result<CityPage>;

    /// Fetch records matching a free-text query.
    async fn search(&self, query: &str) -> Result<CityPage>;
}

/// OpenDataSoft records API (`/search/`).
#[derive(Debug, Clone)]
pub struct OpenDataSoftDataset {
    base_url: String,
    dataset: String,
    http: Client,
}

impl OpenDataSoftDataset {
    pub fn new(base_url: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, dataset)
    }

    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            dataset: dataset.into(),
            http,
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(&config.base_url, &config.name)
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<CityPage> {
        let url = format!("{}/search/", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("dataset", self.dataset.as_str())])
            .query(params)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::status(status, &body));
        }

        let parsed: DsResponse = serde_json::from_str(&body)
            .map_err(|e| LookupError::malformed("dataset search JSON", e))?;

        Ok(CityPage {
            records: parsed.records.into_iter().map(CityRecord::from).collect(),
            total_hits: parsed.nhits,
        })
    }
}

#[async_trait]
impl CityDataset for OpenDataSoftDataset {
    async fn fetch_page(&self, start: u64, rows: u64) -> Result<CityPage> {
        tracing::debug!(start, rows, "fetching city page");
        let rows = rows.to_string();
        let start = start.to_string();
        self.get(&[("rows", rows.as_str()), ("start", start.as_str())])
            .await
    }

    async fn search(&self, query: &str) -> Result<CityPage> {
        tracing::debug!(query, "searching cities");
        self.get(&[("q", query)]).await
    }
}

#[derive(Debug, Deserialize)]
struct DsFields {
    name: String,
    cou_name_en: Option<String>,
    timezone: Option<String>,
    #[serde(default)]
    population: u64,
}

#[derive(Debug, Deserialize)]
struct DsRecord {
    recordid: String,
    fields: DsFields,
}

#[derive(Debug, Deserialize)]
struct DsResponse {
    nhits: Option<u64>,
    records: Vec<DsRecord>,
}

impl From<DsRecord> for CityRecord {
    fn from(record: DsRecord) -> Self {
        Self {
            id: record.recordid,
            name: record.fields.name,
            country: record.fields.cou_name_en,
            timezone: record.fields.timezone,
            population: record.fields.population,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_fields_map_onto_city() {
        let parsed: DsResponse = serde_json::from_str(
            r#"{
                "nhits": 140000,
                "records": [{
                    "recordid": "abc123",
                    "fields": {
                        "name": "Lyon",
                        "cou_name_en": "France",
                        "timezone": "Europe/Paris",
                        "population": 522969,
                        "country_code": "FR"
                    }
                }]
            }"#,
        )
        .expect("dataset response must parse");

        assert_eq!(parsed.nhits, Some(140000));
        let city = CityRecord::from(parsed.records.into_iter().next().expect("one record"));
        assert_eq!(city.id, "abc123");
        assert_eq!(city.name, "Lyon");
        assert_eq!(city.country.as_deref(), Some("France"));
        assert_eq!(city.timezone.as_deref(), Some("Europe/Paris"));
        assert_eq!(city.population, 522969);
    }

    #[test]
    fn optional_fields_may_be_missing() {
        let parsed: DsResponse = serde_json::from_str(
            r#"{ "records": [{ "recordid": "x", "fields": { "name": "Nowhere" } }] }"#,
        )
        .expect("sparse record must parse");

        let city = CityRecord::from(parsed.records.into_iter().next().expect("one record"));
        assert_eq!(city.country, None);
        assert_eq!(city.population, 0);
    }

    #[test]
    fn record_without_name_is_malformed() {
        let err = serde_json::from_str::<DsResponse>(
            r#"{ "records": [{ "recordid": "x", "fields": {} }] }"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let ds = OpenDataSoftDataset::new("http://localhost/api/", "cities");
        assert_eq!(ds.base_url, "http://localhost/api");
    }
}
