use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    routing::{get, post},
};
use redat::{
    api::{ApiClient, Error},
    contribute::Contribution,
};
use serde_json::json;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

fn stations_body() -> serde_json::Value {
    json!([
        {"name": "Meskel Square", "location": {"coordinates": [38.7614, 9.0108]}},
        {"name": "Bole", "location": {"coordinates": [38.7894, 8.9936]}}
    ])
}

fn route_body() -> serde_json::Value {
    json!({
        "route": [
            {"name": "Meskel Square", "location": {"coordinates": [38.7614, 9.0108]}},
            {"name": "Bole", "location": {"coordinates": [38.7894, 8.9936]}}
        ],
        "total_price": 25,
        "legs": [{"from": "Meskel Square", "to": "Bole", "price": 25}]
    })
}

fn sample_contribution() -> Contribution {
    let mut contribution = Contribution::new();
    contribution.start_station = "Meskel Square".into();
    contribution.end_station = "Bole".into();
    contribution.price = 25.0;
    contribution
}

#[test]
fn bad_base_url_test() {
    assert!(ApiClient::new("not a url").is_err());
}

#[tokio::test]
async fn stations_bare_array_test() {
    let app = Router::new().route("/stations", get(|| async { Json(stations_body()) }));
    let client = ApiClient::new(&serve(app).await).unwrap();

    let stations = client.stations().await.unwrap();
    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].name, "Meskel Square");
    assert_eq!(stations[0].coordinate.latitude, 9.0108);
    assert_eq!(stations[0].coordinate.longitude, 38.7614);
}

#[tokio::test]
async fn stations_wrapped_test() {
    let app = Router::new().route(
        "/stations",
        get(|| async { Json(json!({"stations": stations_body()})) }),
    );
    let client = ApiClient::new(&serve(app).await).unwrap();

    let stations = client.stations().await.unwrap();
    assert_eq!(stations.len(), 2);
}

#[tokio::test]
async fn stations_invalid_format_test() {
    let app = Router::new().route("/stations", get(|| async { Json(json!({"count": 2})) }));
    let client = ApiClient::new(&serve(app).await).unwrap();

    let err = client.stations().await.unwrap_err();
    assert!(matches!(err, Error::StationFormat));
}

#[tokio::test]
async fn stations_error_status_test() {
    let app = Router::new().route(
        "/stations",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let client = ApiClient::new(&serve(app).await).unwrap();

    let err = client.stations().await.unwrap_err();
    assert!(matches!(err, Error::Status(_)));
    assert_eq!(err.to_string(), "HTTP error! status: 500");
}

#[tokio::test]
async fn route_map_appends_station_suffix_test() {
    let captured: Arc<Mutex<Option<HashMap<String, String>>>> = Arc::new(Mutex::new(None));
    let captured_in = captured.clone();
    let app = Router::new().route(
        "/route-map",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let captured = captured_in.clone();
            async move {
                *captured.lock().unwrap() = Some(params);
                Json(route_body())
            }
        }),
    );
    let client = ApiClient::new(&serve(app).await).unwrap();

    let route = client.route_map("Meskel Square", "Bole").await.unwrap();

    let params = captured.lock().unwrap().clone().unwrap();
    assert_eq!(params["from"], "Meskel Square Station");
    assert_eq!(params["to"], "Bole Station");
    assert_eq!(route.total_price, 25.0);
    assert_eq!(route.legs.len(), 1);
    assert_eq!(route.description(), "Meskel Square → Bole");
}

#[tokio::test]
async fn fare_view_fetches_stations_once_test() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in = hits.clone();
    let app = Router::new()
        .route(
            "/stations",
            get(move || {
                let hits = hits_in.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(stations_body())
                }
            }),
        )
        .route("/route-map", get(|| async { Json(route_body()) }));
    let client = ApiClient::new(&serve(app).await).unwrap();

    let view = client.fare_view("Meskel Square", "Bole").await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(view.stations.len(), 2);
    assert_eq!(view.route.total_price, 25.0);
}

#[tokio::test]
async fn fare_view_station_fetch_error_test() {
    let app = Router::new().route(
        "/stations",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let client = ApiClient::new(&serve(app).await).unwrap();

    let err = client.fare_view("A", "B").await.unwrap_err();
    assert_eq!(err.to_string(), "Unable to load station data - fetch failed");
}

#[tokio::test]
async fn fare_view_station_format_error_test() {
    let app = Router::new().route("/stations", get(|| async { Json(json!("nope")) }));
    let client = ApiClient::new(&serve(app).await).unwrap();

    let err = client.fare_view("A", "B").await.unwrap_err();
    assert_eq!(err.to_string(), "Unable to load station data - invalid format");
}

#[tokio::test]
async fn fare_view_route_error_test() {
    let app = Router::new()
        .route("/stations", get(|| async { Json(stations_body()) }))
        .route("/route-map", get(|| async { StatusCode::NOT_FOUND }));
    let client = ApiClient::new(&serve(app).await).unwrap();

    let err = client.fare_view("Meskel Square", "Bole").await.unwrap_err();
    assert_eq!(err.to_string(), "Error fetching route data");
}

#[tokio::test]
async fn contribute_accepted_test() {
    let app = Router::new().route("/api/contribute", post(|| async { StatusCode::OK }));
    let client = ApiClient::new(&serve(app).await).unwrap();

    client.contribute(&sample_contribution()).await.unwrap();
}

#[tokio::test]
async fn contribute_rejected_body_test() {
    let app = Router::new().route(
        "/api/contribute",
        post(|| async { (StatusCode::BAD_REQUEST, "Route already exists") }),
    );
    let client = ApiClient::new(&serve(app).await).unwrap();

    let err = client.contribute(&sample_contribution()).await.unwrap_err();
    assert_eq!(err.to_string(), "Route already exists");
}

#[tokio::test]
async fn contribute_rejected_empty_body_test() {
    let app = Router::new().route(
        "/api/contribute",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let client = ApiClient::new(&serve(app).await).unwrap();

    let err = client.contribute(&sample_contribution()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to submit form");
}
