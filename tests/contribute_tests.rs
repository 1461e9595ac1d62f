use std::sync::{Arc, Mutex};

use axum::{Router, extract::Multipart, http::StatusCode, routing::post};
use redat::{
    api::ApiClient,
    contribute::{Contribution, Error, ImageFile},
};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

/// Per field: name, file name, content type, raw bytes, in wire order.
type Fields = Vec<(String, Option<String>, Option<String>, Vec<u8>)>;

async fn collect(mut multipart: Multipart) -> Fields {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap().to_vec();
        fields.push((name, file_name, content_type, bytes));
    }
    fields
}

fn capture_app(captured: Arc<Mutex<Option<Fields>>>) -> Router {
    Router::new().route(
        "/api/contribute",
        post(move |multipart: Multipart| {
            let captured = captured.clone();
            async move {
                *captured.lock().unwrap() = Some(collect(multipart).await);
                StatusCode::OK
            }
        }),
    )
}

fn names(fields: &Fields) -> Vec<&str> {
    fields.iter().map(|(name, ..)| name.as_str()).collect()
}

fn text(fields: &Fields, name: &str) -> String {
    let (_, _, _, bytes) = fields
        .iter()
        .find(|(field, ..)| field == name)
        .unwrap_or_else(|| panic!("missing field {name}"));
    String::from_utf8(bytes.clone()).unwrap()
}

fn sample() -> Contribution {
    let mut contribution = Contribution::new();
    contribution.start_station = "Meskel Square".into();
    contribution.end_station = "Bole".into();
    contribution.price = 25.0;
    contribution
}

#[tokio::test]
async fn field_order_test() {
    let captured = Arc::new(Mutex::new(None));
    let client = ApiClient::new(&serve(capture_app(captured.clone())).await).unwrap();

    client.contribute(&sample()).await.unwrap();

    let fields = captured.lock().unwrap().clone().unwrap();
    assert_eq!(
        names(&fields),
        vec!["startStation", "endStation", "price", "notes"]
    );
    assert_eq!(text(&fields, "startStation"), "Meskel Square");
    assert_eq!(text(&fields, "price"), "25");
    assert_eq!(text(&fields, "notes"), "");
}

#[tokio::test]
async fn intermediates_submitted_only_while_shown_test() {
    let captured = Arc::new(Mutex::new(None));
    let client = ApiClient::new(&serve(capture_app(captured.clone())).await).unwrap();

    let mut contribution = sample();
    contribution.set_has_intermediates(true);
    contribution.set_intermediate(0, "Mexico");
    contribution.add_intermediate();
    contribution.set_intermediate(1, "Sarbet");

    client.contribute(&contribution).await.unwrap();
    let fields = captured.lock().unwrap().clone().unwrap();
    assert_eq!(
        names(&fields),
        vec![
            "startStation",
            "endStation",
            "intermediateStation1",
            "intermediateStation2",
            "price",
            "notes"
        ]
    );
    assert_eq!(text(&fields, "intermediateStation1"), "Mexico");
    assert_eq!(text(&fields, "intermediateStation2"), "Sarbet");

    // Toggling off keeps the entered names but drops them from the wire.
    contribution.set_has_intermediates(false);
    client.contribute(&contribution).await.unwrap();
    let fields = captured.lock().unwrap().clone().unwrap();
    assert_eq!(
        names(&fields),
        vec!["startStation", "endStation", "price", "notes"]
    );
    assert_eq!(contribution.intermediates(), ["Mexico", "Sarbet"]);
}

#[tokio::test]
async fn image_attachment_test() {
    let captured = Arc::new(Mutex::new(None));
    let client = ApiClient::new(&serve(capture_app(captured.clone())).await).unwrap();

    let mut contribution = sample();
    contribution.start_image = Some(ImageFile {
        name: "start.png".into(),
        mime: "image/png",
        bytes: vec![1, 2, 3],
    });

    client.contribute(&contribution).await.unwrap();

    let fields = captured.lock().unwrap().clone().unwrap();
    assert_eq!(
        names(&fields),
        vec![
            "startStation",
            "startStationImage",
            "endStation",
            "price",
            "notes"
        ]
    );
    let (_, file_name, content_type, bytes) = fields
        .iter()
        .find(|(name, ..)| name == "startStationImage")
        .unwrap();
    assert_eq!(file_name.as_deref(), Some("start.png"));
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(bytes, &[1, 2, 3]);
}

#[test]
fn fresh_form_test() {
    let contribution = Contribution::new();
    assert!(!contribution.has_intermediates());
    assert_eq!(contribution.intermediates(), [""]);
}

#[test]
fn slot_bounds_test() {
    let mut contribution = Contribution::new();
    contribution.set_intermediate(5, "nowhere");
    contribution.remove_intermediate(5);
    assert_eq!(contribution.intermediates(), [""]);

    contribution.add_intermediate();
    contribution.set_intermediate(1, "Mexico");
    contribution.remove_intermediate(0);
    assert_eq!(contribution.intermediates(), ["Mexico"]);
}

#[test]
fn validate_required_test() {
    let mut contribution = Contribution::new();
    assert!(matches!(contribution.validate(), Err(Error::MissingStart)));

    contribution.start_station = "Meskel Square".into();
    assert!(matches!(contribution.validate(), Err(Error::MissingEnd)));

    contribution.end_station = "Bole".into();
    contribution.validate().unwrap();
}

#[test]
fn validate_intermediate_test() {
    let mut contribution = sample();
    contribution.set_has_intermediates(true);
    let err = contribution.validate().unwrap_err();
    assert_eq!(err.to_string(), "Intermediate station 1 is required");

    contribution.set_has_intermediates(false);
    contribution.validate().unwrap();
}

#[test]
fn validate_price_test() {
    let mut contribution = sample();
    contribution.price = -1.0;
    assert!(matches!(contribution.validate(), Err(Error::NegativePrice)));

    contribution.price = 7.25;
    assert!(matches!(contribution.validate(), Err(Error::PriceStep)));

    contribution.price = 7.5;
    contribution.validate().unwrap();

    contribution.price = 0.0;
    contribution.validate().unwrap();
}

#[test]
fn reset_test() {
    let mut contribution = sample();
    contribution.notes = "steep fare".into();
    contribution.set_has_intermediates(true);
    contribution.add_intermediate();
    contribution.end_image = Some(ImageFile {
        name: "end.jpg".into(),
        mime: "image/jpeg",
        bytes: vec![9],
    });

    contribution.reset();
    assert_eq!(contribution.start_station, "");
    assert_eq!(contribution.price, 0.0);
    assert_eq!(contribution.notes, "");
    assert!(!contribution.has_intermediates());
    assert_eq!(contribution.intermediates(), [""]);
    assert!(contribution.end_image.is_none());
}

#[test]
fn image_load_test() {
    let path = std::env::temp_dir().join("redat_station.png");
    std::fs::write(&path, [137, 80, 78, 71]).unwrap();

    let image = ImageFile::load(&path).unwrap();
    assert_eq!(image.name, "redat_station.png");
    assert_eq!(image.mime, "image/png");
    assert_eq!(image.bytes, [137, 80, 78, 71]);

    let _ = std::fs::remove_file(&path);
}
