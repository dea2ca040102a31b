//! Integration tests for the geocoding providers using wiremock.

use std::time::Duration;

use cabfare_geocode::{
    CoordinateResolver, GeocodeError, Geocoder, GoogleGeocoder, NominatimGeocoder,
};
use cabfare_pricing::Coordinate;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn google(server: &MockServer) -> GoogleGeocoder {
    GoogleGeocoder::new("test-key", Duration::from_secs(5))
        .unwrap()
        .with_base_url(&server.uri())
}

fn nominatim(server: &MockServer) -> NominatimGeocoder {
    NominatimGeocoder::new("cabfare-tests/1.0", Duration::from_secs(5))
        .unwrap()
        .with_base_url(&server.uri())
}

#[tokio::test]
async fn test_google_resolves_first_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "350 5th Ave, New York"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [
                {
                    "formatted_address": "350 5th Ave, New York, NY 10118, USA",
                    "geometry": { "location": { "lat": 40.7484405, "lng": -73.9856644 } }
                },
                {
                    "formatted_address": "Somewhere else",
                    "geometry": { "location": { "lat": 1.0, "lng": 2.0 } }
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolved = google(&mock_server)
        .resolve("  350 5th Ave, New York ")
        .await
        .unwrap();

    assert_eq!(resolved.coordinate, Coordinate::new(40.7484405, -73.9856644));
    assert_eq!(resolved.formatted_address, "350 5th Ave, New York, NY 10118, USA");
}

#[tokio::test]
async fn test_google_zero_results_not_resolved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&mock_server)
        .await;

    let err = google(&mock_server).resolve("nowhere at all").await.unwrap_err();
    assert!(
        matches!(
            &err,
            GeocodeError::NotResolved { address, status }
                if address == "nowhere at all" && status == "ZERO_RESULTS"
        ),
        "expected NotResolved, got {:?}",
        err
    );
}

#[tokio::test]
async fn test_google_request_denied_includes_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .mount(&mock_server)
        .await;

    let err = google(&mock_server).resolve("Times Square").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("REQUEST_DENIED"), "{}", msg);
    assert!(msg.contains("invalid"), "{}", msg);
}

#[tokio::test]
async fn test_google_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = google(&mock_server).resolve("Times Square").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Http(503)));
}

#[tokio::test]
async fn test_google_empty_address_skips_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = google(&mock_server).resolve("").await.unwrap_err();
    assert!(matches!(err, GeocodeError::EmptyAddress));
}

#[tokio::test]
async fn test_nominatim_resolves_with_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "JFK Airport"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(header("user-agent", "cabfare-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "lat": "40.6413111",
                "lon": "-73.7781391",
                "display_name": "John F. Kennedy International Airport, Queens, New York"
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolved = nominatim(&mock_server).resolve("JFK Airport").await.unwrap();
    assert_eq!(resolved.coordinate, Coordinate::new(40.6413111, -73.7781391));
    assert!(resolved.formatted_address.starts_with("John F. Kennedy"));
}

#[tokio::test]
async fn test_nominatim_empty_result_not_resolved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let err = nominatim(&mock_server).resolve("xyzzy").await.unwrap_err();
    assert!(matches!(err, GeocodeError::NotResolved { .. }));
}

#[tokio::test]
async fn test_nominatim_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&mock_server)
        .await;

    let err = nominatim(&mock_server).resolve("xyzzy").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Parse(_)));
}

#[tokio::test]
async fn test_geocoder_enum_dispatches_through_trait() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "40.77", "lon": "-73.87", "display_name": "LaGuardia Airport" }
        ])))
        .mount(&mock_server)
        .await;

    let geocoder: Geocoder = nominatim(&mock_server).into();
    assert_eq!(geocoder.provider_name(), "nominatim");

    let resolved = CoordinateResolver::resolve(&geocoder, "LGA").await.unwrap();
    assert_eq!(resolved.formatted_address, "LaGuardia Airport");
}
