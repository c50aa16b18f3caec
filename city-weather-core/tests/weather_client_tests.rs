//! Integration tests for the OpenWeather provider and the session built on it.

mod common;

use city_weather_core::{
    LookupError, OpenDataSoftDataset, OpenWeatherProvider, Session, Units, View, WeatherProvider,
    WeatherSummary,
};
use common::{DATASET, paris_weather};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer, units: Units) -> OpenWeatherProvider {
    OpenWeatherProvider::new("test-api-key".into(), units).with_base_url(server.uri())
}

#[tokio::test]
async fn fetch_sends_city_key_and_units() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "test-api-key"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
        .expect(1)
        .mount(&server)
        .await;

    let record = provider(&server, Units::Imperial)
        .fetch_weather("Paris")
        .await
        .expect("should succeed");

    assert_eq!(record.city, "Paris");
    assert_eq!(record.units, Units::Imperial);
    assert_eq!(record.payload, paris_weather());
}

#[tokio::test]
async fn payload_feeds_summary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
        .mount(&server)
        .await;

    let record = provider(&server, Units::Metric)
        .fetch_weather("paris")
        .await
        .expect("ok");
    let summary = WeatherSummary::from_record(&record);

    assert_eq!(summary.display_name(), "Paris, FR");
    assert_eq!(summary.condition.as_deref(), Some("clear sky"));
    assert_eq!(summary.temperature, Some(21.3));
    assert!(!summary.is_night());
}

#[tokio::test]
async fn unknown_city_maps_to_status() {
    let server = MockServer::start().await;

    let body = json!({ "cod": "404", "message": "city not found" });
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(body))
        .mount(&server)
        .await;

    let err = provider(&server, Units::Metric)
        .fetch_weather("Nowhereville")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LookupError::Status { status: 404, ref body } if body.contains("city not found")
    ));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = provider(&server, Units::Metric)
        .fetch_weather("Paris")
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Malformed { .. }));
}

fn session(dataset: &MockServer, weather: &MockServer) -> Session {
    Session::new(
        Box::new(OpenDataSoftDataset::new(dataset.uri(), DATASET)),
        Box::new(provider(weather, Units::Metric)),
        5,
    )
}

#[tokio::test]
async fn search_then_submit_shows_weather_detail() {
    let dataset = MockServer::start().await;
    let weather = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::city_page(0, 2)))
        .expect(1)
        .mount(&dataset)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
        .expect(1)
        .mount(&weather)
        .await;

    let mut session = session(&dataset, &weather);

    assert!(session.search("Paris ").await);
    assert_eq!(session.lookup().visible_rows().len(), 2);
    assert_eq!(session.view(), &View::Browsing);

    assert!(session.submit_search().await);
    let record = session.current_weather().expect("detail view after successful fetch");
    assert_eq!(record.city, "Paris");
}

#[tokio::test]
async fn failed_weather_fetch_keeps_browsing() {
    let dataset = MockServer::start().await;
    let weather = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "cod": 401 })))
        .mount(&weather)
        .await;

    let mut session = session(&dataset, &weather);

    assert!(!session.fetch_weather("Paris").await);
    assert_eq!(session.view(), &View::Browsing);
}
