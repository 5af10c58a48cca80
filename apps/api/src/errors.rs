use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::interview::generator::{GenerateError, GenerationFailure};
use crate::interview::sanitize::truncate_diagnostic;

/// Diagnostics attached when the questions response is not a usable array.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsDebug {
    pub extracted_text: Option<String>,
    pub questions_text: Option<String>,
    pub cleaned_questions: Option<String>,
    pub parsed_questions_type: Option<String>,
    pub parsed_questions_sample: Option<String>,
}

/// Diagnostics attached to every other server-side failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDebug {
    pub extracted_text: Option<String>,
    pub questions_text: Option<String>,
    pub parsed_questions_type: Option<String>,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{success: false, error, ...}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    InvalidQuestions {
        message: String,
        debug: Box<QuestionsDebug>,
    },

    #[error("{message}")]
    Internal { message: String, debug: FailureDebug },
}

impl From<GenerationFailure> for AppError {
    fn from(failure: GenerationFailure) -> Self {
        let GenerationFailure {
            stage,
            error,
            diagnostics,
        } = failure;
        tracing::debug!("Reporting failure from the {stage} stage");

        let extracted_text = truncate_diagnostic(diagnostics.extracted_text.as_deref());
        let questions_text = truncate_diagnostic(diagnostics.questions_text.as_deref());
        let parsed_questions_type = diagnostics
            .parsed_questions
            .as_ref()
            .map(|p| p.kind().to_string());

        match error {
            GenerateError::InvalidQuestions => {
                let parsed_questions_sample = diagnostics
                    .parsed_questions
                    .as_ref()
                    .and_then(|p| p.value())
                    .map(|v| v.to_string());
                AppError::InvalidQuestions {
                    message: error.to_string(),
                    debug: Box::new(QuestionsDebug {
                        extracted_text,
                        questions_text,
                        cleaned_questions: truncate_diagnostic(
                            diagnostics.cleaned_questions.as_deref(),
                        ),
                        parsed_questions_type,
                        parsed_questions_sample: truncate_diagnostic(
                            parsed_questions_sample.as_deref(),
                        ),
                    }),
                }
            }
            other => AppError::Internal {
                message: other.to_string(),
                debug: FailureDebug {
                    extracted_text,
                    questions_text,
                    parsed_questions_type,
                },
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": msg }),
            ),
            AppError::InvalidQuestions { message, debug } => {
                tracing::error!("Invalid questions response: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": message, "debug": debug }),
                )
            }
            AppError::Internal { message, debug } => {
                tracing::error!("Internal error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": message, "debug": debug }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::generator::{Diagnostics, Stage};
    use crate::interview::sanitize::LenientParse;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_renders_400() {
        let response = AppError::Validation("bad input".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "error": "bad input"})
        );
    }

    #[tokio::test]
    async fn test_invalid_questions_carries_rich_debug() {
        let failure = GenerationFailure {
            stage: Stage::Validating,
            error: GenerateError::InvalidQuestions,
            diagnostics: Diagnostics {
                extracted_text: Some("{\"role\":\"QA\"}".to_string()),
                questions_text: Some("{\"questions\": []}".to_string()),
                cleaned_questions: Some("{\"questions\": []}".to_string()),
                parsed_questions: Some(LenientParse::Parsed(json!({"questions": []}))),
            },
        };

        let response = AppError::from(failure).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["debug"]["parsedQuestionsType"], "object");
        assert_eq!(body["debug"]["parsedQuestionsSample"], "{\"questions\":[]}");
        assert_eq!(body["debug"]["extractedText"], "{\"role\":\"QA\"}");
    }

    #[tokio::test]
    async fn test_other_failures_use_catch_all_shape() {
        let failure = GenerationFailure {
            stage: Stage::Extracting,
            error: GenerateError::ExtractionParse,
            diagnostics: Diagnostics {
                extracted_text: Some("x".repeat(2100)),
                ..Diagnostics::default()
            },
        };

        let response = AppError::from(failure).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Failed to parse extraction response as a JSON object"
        );
        let extracted = body["debug"]["extractedText"].as_str().unwrap();
        assert!(extracted.ends_with("... [truncated 100 chars]"));
        assert_eq!(body["debug"]["questionsText"], Value::Null);
        assert_eq!(body["debug"]["parsedQuestionsType"], Value::Null);
        assert!(body["debug"].get("cleanedQuestions").is_none());
    }
}
