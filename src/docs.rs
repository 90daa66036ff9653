// src/docs.rs

use axum::Json;
use utoipa::OpenApi;

use crate::{
    handlers::quiz,
    models::quiz::{OptionDetail, QuestionDetail, QuestionType, QuizDetail, QuizSummary},
};

/// OpenAPI description of the HTTP interface.
#[derive(OpenApi)]
#[openapi(
    paths(quiz::query_gemini, quiz::list_quizzes, quiz::get_quiz, quiz::delete_quiz),
    components(schemas(
        quiz::GenerateQuizRequest,
        quiz::GenerateQuizResponse,
        quiz::ErrorResponse,
        QuizSummary,
        QuizDetail,
        QuestionDetail,
        OptionDetail,
        QuestionType
    )),
    tags((name = "quiz", description = "Quiz generation and stored quizzes"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/query-gemini"));
        assert!(paths.contains_key("/api/quizzes"));
        assert!(paths["/api/quizzes/{id}"].get("delete").is_some());
    }
}
