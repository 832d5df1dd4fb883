#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use quizgen_backend::{config::Config, routes, AppState};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

pub const BIOLOGY: &str = "The Mitochondria is the powerhouse of the cell and produces most of its energy. \
Photosynthesis happens inside chloroplasts found in plant cells and some algae. \
The Nucleus stores genetic material and controls the activities of the cell. \
Ribosomes are small structures that assemble proteins from amino acids. \
The Golgi apparatus packages proteins and lipids for transport around the cell. \
Lysosomes contain digestive enzymes that break down waste materials and debris.\n";

const BOUNDARY: &str = "quizgen-test-boundary";

pub fn app(config: Config) -> Router {
    let state = AppState::new(&config).expect("app state");
    routes::router().with_state(state)
}

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        openai_api_key: None,
        ..Config::default()
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
    let res = app.clone().oneshot(req).await.expect("response");
    let status = res.status();
    let headers = res.headers().clone();
    let body = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    (status, body.to_vec(), headers)
}

pub async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let (status, body, _) = send(app, req).await;
    let json = if body.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, json)
}

pub fn json_request(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Hand-built multipart/form-data upload with a `file` part and plain fields.
pub fn upload_request(uri: &str, file_name: &str, content: &[u8], fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn create_session(app: &Router) -> String {
    let (status, body) = send_json(app, empty_request("POST", "/api/sessions")).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().expect("session id").to_string()
}
