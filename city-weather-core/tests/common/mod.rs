//! Shared fixtures for the HTTP client tests.

#![allow(dead_code)]

use serde_json::{Value, json};

pub const DATASET: &str = "geonames-all-cities-with-a-population-1000";

/// Dataset response body holding cities numbered `start..start + rows`.
pub fn city_page(start: u64, rows: u64) -> Value {
    let records: Vec<Value> = (start..start + rows)
        .map(|n| {
            json!({
                "datasetid": DATASET,
                "recordid": format!("rec-{n}"),
                "fields": {
                    "name": format!("City {n}"),
                    "cou_name_en": "France",
                    "timezone": "Europe/Paris",
                    "population": 1000 + n
                }
            })
        })
        .collect();

    json!({ "nhits": 140_000, "parameters": {}, "records": records })
}

pub fn paris_weather() -> Value {
    json!({
        "coord": { "lon": 2.35, "lat": 48.85 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": {
            "temp": 21.3, "feels_like": 20.9, "temp_min": 19.8, "temp_max": 22.6,
            "pressure": 1018, "humidity": 52
        },
        "wind": { "speed": 3.6, "deg": 250 },
        "dt": 1_718_000_000,
        "sys": { "country": "FR", "sunrise": 1_717_990_000, "sunset": 1_718_047_000 },
        "timezone": 7200,
        "name": "Paris",
        "cod": 200
    })
}
