use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the geonames city dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub population: u64,
}

/// Records of a single dataset response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityPage {
    pub records: Vec<CityRecord>,
    /// Total number of matching records the dataset reports, if any.
    pub total_hits: Option<u64>,
}

/// Unit system requested from the weather API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Standard => "m/s",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial, standard."
            )),
        }
    }
}

/// Raw weather API payload together with the city name it was requested for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub units: Units,
    pub payload: Value,
}

/// Display-oriented view of a [`WeatherRecord`].
///
/// Extraction is lenient: any field missing from the payload is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSummary {
    pub city: String,
    pub units: Units,
    pub location_name: Option<String>,
    pub country: Option<String>,
    pub condition: Option<String>,
    pub icon: Option<String>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity_pct: Option<u64>,
    pub pressure_hpa: Option<u64>,
    pub wind_speed: Option<f64>,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
    pub observation_time: Option<DateTime<FixedOffset>>,
}

impl WeatherSummary {
    pub fn from_record(record: &WeatherRecord) -> Self {
        let p = &record.payload;
        let f64_at = |ptr: &str| p.pointer(ptr).and_then(Value::as_f64);
        let u64_at = |ptr: &str| p.pointer(ptr).and_then(Value::as_u64);
        let str_at = |ptr: &str| p.pointer(ptr).and_then(Value::as_str).map(str::to_owned);

        // OpenWeather reports the location's UTC shift in seconds.
        let offset = p
            .pointer("/timezone")
            .and_then(Value::as_i64)
            .and_then(|secs| i32::try_from(secs).ok())
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        let time_at = |ptr: &str| {
            p.pointer(ptr)
                .and_then(Value::as_i64)
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
                .map(|dt| dt.with_timezone(&offset))
        };

        Self {
            city: record.city.clone(),
            units: record.units,
            location_name: str_at("/name").filter(|s| !s.is_empty()),
            country: str_at("/sys/country"),
            condition: str_at("/weather/0/description"),
            icon: str_at("/weather/0/icon"),
            temperature: f64_at("/main/temp"),
            feels_like: f64_at("/main/feels_like"),
            temp_min: f64_at("/main/temp_min"),
            temp_max: f64_at("/main/temp_max"),
            humidity_pct: u64_at("/main/humidity"),
            pressure_hpa: u64_at("/main/pressure"),
            wind_speed: f64_at("/wind/speed"),
            sunrise: time_at("/sys/sunrise"),
            sunset: time_at("/sys/sunset"),
            observation_time: time_at("/dt"),
        }
    }

    /// Name to show as the heading: the API's location name, else the requested city.
    pub fn display_name(&self) -> String {
        let name = self.location_name.as_deref().unwrap_or(&self.city);
        match &self.country {
            Some(country) => format!("{name}, {country}"),
            None => name.to_string(),
        }
    }

    /// `true` when the icon code marks a night-time observation ("01n").
    pub fn is_night(&self) -> bool {
        self.icon.as_deref().is_some_and(|icon| icon.ends_with('n'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paris() -> WeatherRecord {
        WeatherRecord {
            city: "Paris".into(),
            units: Units::Metric,
            payload: json!({
                "name": "Paris",
                "dt": 1_700_000_000,
                "timezone": 3600,
                "sys": { "country": "FR", "sunrise": 1_699_944_000, "sunset": 1_699_978_000 },
                "weather": [{ "description": "light rain", "icon": "10n" }],
                "main": {
                    "temp": 11.5, "feels_like": 10.2, "temp_min": 9.0, "temp_max": 12.8,
                    "humidity": 87, "pressure": 1012
                },
                "wind": { "speed": 4.1 }
            }),
        }
    }

    #[test]
    fn summary_extracts_known_fields() {
        let summary = WeatherSummary::from_record(&paris());

        assert_eq!(summary.display_name(), "Paris, FR");
        assert_eq!(summary.condition.as_deref(), Some("light rain"));
        assert_eq!(summary.temperature, Some(11.5));
        assert_eq!(summary.humidity_pct, Some(87));
        assert_eq!(summary.pressure_hpa, Some(1012));
        assert_eq!(summary.wind_speed, Some(4.1));
        assert!(summary.is_night());

        let observed = summary
            .observation_time
            .expect("observation time must be parsed");
        assert_eq!(observed.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn summary_tolerates_unexpected_payload() {
        let record = WeatherRecord {
            city: "Atlantis".into(),
            units: Units::Imperial,
            payload: json!({ "cod": 200 }),
        };

        let summary = WeatherSummary::from_record(&record);

        assert_eq!(summary.display_name(), "Atlantis");
        assert_eq!(summary.temperature, None);
        assert_eq!(summary.sunrise, None);
        assert!(!summary.is_night());
    }

    #[test]
    fn units_roundtrip_and_suffixes() {
        for units in Units::all() {
            let parsed = Units::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }

        assert_eq!(Units::Imperial.temperature_suffix(), "°F");
        assert_eq!(Units::Imperial.speed_suffix(), "mph");
        assert_eq!(Units::Standard.temperature_suffix(), "K");
    }

    #[test]
    fn unknown_units_error() {
        let err = Units::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }
}
