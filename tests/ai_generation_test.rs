mod common;

use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use common::*;
use quizgen_backend::config::Config;
use serde_json::{json, Value as JsonValue};

const COMPLETION_PATH: &str = "/v1/chat/completions";

/// Serves a chat-completion endpoint that answers every request with
/// `content`, or with `status` when it is not a success.
async fn spawn_completion_server(status: StatusCode, content: String) -> String {
    let handler = move |headers: HeaderMap, Json(payload): Json<JsonValue>| {
        let content = content.clone();
        async move {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(|v| v == "Bearer sk-test")
                .unwrap_or(false);
            if !authorized {
                return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
            }
            if payload["messages"][1]["content"].as_str().map_or(true, |p| !p.contains("Mitochondria")) {
                return (StatusCode::BAD_REQUEST, Json(json!({"error": "missing document"})));
            }
            if !status.is_success() {
                return (status, Json(json!({"error": "model overloaded"})));
            }
            (
                StatusCode::OK,
                Json(json!({"choices": [{"message": {"role": "assistant", "content": content}}]})),
            )
        }
    };

    let app = Router::new().route(COMPLETION_PATH, post(handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}{}", addr, COMPLETION_PATH)
}

fn ai_config(api_url: String) -> Config {
    Config {
        openai_api_url: api_url,
        ai_timeout_secs: 10,
        ..test_config()
    }
}

fn model_reply() -> String {
    let questions = json!([
        {
            "question": "What produces most of the cell's energy?",
            "options": ["Mitochondria", "Nucleus", "Ribosome", "Lysosome"],
            "correct_answer": "Mitochondria",
            "explanation": "The mitochondria is the powerhouse of the cell."
        },
        {
            "question": "Where does photosynthesis happen?",
            "options": ["Golgi apparatus", "Chloroplasts", "Nucleus", "Ribosomes"],
            "correct_answer": "B",
            "explanation": "Photosynthesis happens inside chloroplasts."
        }
    ]);
    format!("Here are your questions:\n```json\n{}\n```", questions)
}

#[tokio::test]
async fn ai_mode_installs_model_questions() {
    let url = spawn_completion_server(StatusCode::OK, model_reply()).await;
    let app = app(ai_config(url));
    let id = create_session(&app).await;

    let (status, body) = send_json(
        &app,
        upload_request(
            &format!("/api/sessions/{}/quiz", id),
            "notes.txt",
            BIOLOGY.as_bytes(),
            &[
                ("num_questions", "3"),
                ("mode", "ai"),
                ("difficulty", "hard"),
                ("api_key", "sk-test"),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["mode"], "ai");
    assert_eq!(body["generated"], 2);
    assert_eq!(
        body["warnings"],
        json!(["The question service returned 2 of 3 requested questions."])
    );

    let second = &body["questions"][1];
    assert_eq!(second["type"], "multiple_choice");
    assert_eq!(second["options"].as_array().unwrap().len(), 4);

    for (index, answer) in [(0, "Mitochondria"), (1, "Nucleus")] {
        let (status, _) = send_json(
            &app,
            json_request(
                "PUT",
                &format!("/api/sessions/{}/answers/{}", id, index),
                json!({"answer": answer}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, result) = send_json(&app, empty_request("POST", &format!("/api/sessions/{}/submit", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["score"], 1);
    assert_eq!(result["percentage"], 50.0);
    assert_eq!(result["tier"], "needs_improvement");
    assert_eq!(result["items"][1]["correct_answer"], "Chloroplasts");
}

#[tokio::test]
async fn ai_mode_requires_api_key() {
    let url = spawn_completion_server(StatusCode::OK, model_reply()).await;
    let app = app(ai_config(url));
    let id = create_session(&app).await;

    let (status, body) = send_json(
        &app,
        upload_request(
            &format!("/api/sessions/{}/quiz", id),
            "notes.txt",
            BIOLOGY.as_bytes(),
            &[("mode", "ai")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("API key"));
}

#[tokio::test]
async fn ai_mode_uses_configured_key() {
    let url = spawn_completion_server(StatusCode::OK, model_reply()).await;
    let app = app(Config {
        openai_api_key: Some("sk-test".to_string()),
        ..ai_config(url)
    });
    let id = create_session(&app).await;

    let (status, body) = send_json(
        &app,
        upload_request(
            &format!("/api/sessions/{}/quiz", id),
            "notes.txt",
            BIOLOGY.as_bytes(),
            &[("mode", "ai"), ("num_questions", "3")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["generated"], 2);
}

#[tokio::test]
async fn upstream_failures_map_to_bad_gateway() {
    let url = spawn_completion_server(StatusCode::SERVICE_UNAVAILABLE, String::new()).await;
    let app = app(ai_config(url));
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{}/quiz", id);

    let (status, body) = send_json(
        &app,
        upload_request(&uri, "notes.txt", BIOLOGY.as_bytes(), &[("mode", "ai"), ("api_key", "sk-test")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("503"));

    let (status, _) = send_json(
        &app,
        upload_request(&uri, "notes.txt", BIOLOGY.as_bytes(), &[("mode", "ai"), ("api_key", "sk-wrong")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (_, view) = send_json(&app, empty_request("GET", &format!("/api/sessions/{}", id))).await;
    assert_eq!(view["generated"], false);
}

#[tokio::test]
async fn unparseable_model_reply_is_rejected() {
    let url = spawn_completion_server(StatusCode::OK, "I cannot help with that.".to_string()).await;
    let app = app(ai_config(url));
    let id = create_session(&app).await;

    let (status, _) = send_json(
        &app,
        upload_request(
            &format!("/api/sessions/{}/quiz", id),
            "notes.txt",
            BIOLOGY.as_bytes(),
            &[("mode", "ai"), ("api_key", "sk-test")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
