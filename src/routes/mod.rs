pub mod export;
pub mod health;
pub mod quiz;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    let session_api = Router::new()
        .route("/api/sessions", post(quiz::create_session))
        .route(
            "/api/sessions/:id",
            get(quiz::get_session).delete(quiz::delete_session),
        )
        .route("/api/sessions/:id/quiz", post(quiz::generate_quiz))
        .route(
            "/api/sessions/:id/answers/:index",
            put(quiz::record_answer),
        )
        .route("/api/sessions/:id/submit", post(quiz::submit_quiz))
        .route("/api/sessions/:id/results", get(quiz::get_results))
        .route("/api/sessions/:id/reset", post(quiz::reset_session));

    let export_api = Router::new()
        .route("/api/sessions/:id/export/csv", get(export::export_csv))
        .route("/api/sessions/:id/export/json", get(export::export_json))
        .route("/api/sessions/:id/export/text", get(export::export_text));

    Router::new()
        .route("/health", get(health::health))
        .merge(session_api)
        .merge(export_api)
}
