// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{docs, handlers::quiz, state::AppState};

/// Assembles the main application router.
///
/// * Generation endpoint (POST only, JSON 405 otherwise).
/// * Read/delete routes for stored quizzes.
/// * OpenAPI document.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let generate = post(quiz::query_gemini).fallback(quiz::method_not_allowed);

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/{id}", get(quiz::get_quiz).delete(quiz::delete_quiz));

    Router::new()
        .route("/query-gemini", generate.clone())
        .route("/query-gemini/", generate)
        .nest("/api/quizzes", quiz_routes)
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
