//! Axum route handlers for the interview generation endpoint.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::interview::extractor::coerce_to_string;
use crate::interview::generator::GenerateRequest;
use crate::state::AppState;

pub const INVALID_MESSAGES: &str = "Invalid or missing 'messages' array";
pub const MISSING_USER_ID: &str = "Missing 'userId' in request body";
pub const INVALID_BODY: &str = "Invalid JSON body";

/// GET /api/interviews/generate
///
/// Liveness probe for the generation endpoint.
pub async fn handle_probe() -> Json<Value> {
    Json(json!({ "success": true, "data": "Thank you!" }))
}

/// OPTIONS /api/interviews/generate
///
/// Cross-origin preflight; the CORS headers come from the router layer.
pub async fn handle_preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// POST /api/interviews/generate
///
/// Body: `{ messages: [...], userId }`. Extracts interview parameters from the
/// conversation, generates the questions and stores the interview.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected generate request with unparseable body: {e}");
        AppError::Validation(INVALID_BODY.to_string())
    })?;

    let request = validate_request(&body)?;
    state.generator.run(request).await?;

    Ok(Json(json!({ "success": true })))
}

/// Checks the request shape before any model call is made.
pub fn validate_request(body: &Value) -> Result<GenerateRequest, AppError> {
    let messages = body
        .get("messages")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Validation(INVALID_MESSAGES.to_string()))?;

    let user_id = body
        .get("userId")
        .filter(|v| is_truthy(v))
        .ok_or_else(|| AppError::Validation(MISSING_USER_ID.to_string()))?;

    Ok(GenerateRequest {
        messages: messages.clone(),
        user_id: coerce_to_string(user_id),
    })
}

/// `null`, `false`, `0` and `""` are falsy; everything else, including empty
/// arrays and objects, is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request},
        response::Response,
        Router,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::interview::generator::tests::{
        FixedCover, MemoryStore, ScriptedLlm, BACKEND_EXTRACTION, FIVE_QUESTIONS,
    };
    use crate::interview::generator::{InterviewGenerator, DEFAULT_COLLECTION};
    use crate::routes::build_router;

    const ENDPOINT: &str = "/api/interviews/generate";

    fn app(llm: Arc<ScriptedLlm>, store: Arc<MemoryStore>) -> Router {
        let generator =
            InterviewGenerator::new(llm, store, Arc::new(FixedCover), DEFAULT_COLLECTION);
        build_router(AppState { generator })
    }

    async fn send(app: Router, method: Method, body: Option<String>) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(ENDPOINT)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn post(app: Router, body: Value) -> Response {
        send(app, Method::POST, Some(body.to_string())).await
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn conversation() -> Value {
        json!([
            {"role": "assistant", "content": "Which role should we prepare for?"},
            {"role": "user", "content": "Senior Backend Engineer. Go and Postgres. Five technical questions."}
        ])
    }

    #[tokio::test]
    async fn test_non_array_messages_rejected_without_model_calls() {
        let bodies = [
            json!({"userId": "u1"}),
            json!({"messages": null, "userId": "u1"}),
            json!({"messages": {"role": "user"}, "userId": "u1"}),
            json!({"messages": "hello", "userId": "u1"}),
            json!({"messages": 3, "userId": "u1"}),
        ];

        for body in bodies {
            let llm = Arc::new(ScriptedLlm::new(vec![]));
            let store = Arc::new(MemoryStore::default());
            let response = post(app(llm.clone(), store.clone()), body.clone()).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(
                body_json(response).await,
                json!({"success": false, "error": INVALID_MESSAGES})
            );
            assert_eq!(llm.call_count(), 0);
            assert!(store.docs.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_falsy_user_id_rejected() {
        let user_ids = [None, Some(json!("")), Some(json!(null)), Some(json!(0)), Some(json!(false))];

        for user_id in user_ids {
            let mut body = json!({"messages": []});
            if let Some(id) = user_id.clone() {
                body["userId"] = id;
            }
            let llm = Arc::new(ScriptedLlm::new(vec![]));
            let response = post(app(llm.clone(), Arc::new(MemoryStore::default())), body).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "userId {user_id:?}");
            let body = body_json(response).await;
            assert_eq!(body["success"], false);
            assert!(body["error"].as_str().unwrap().contains("Missing 'userId'"));
            assert_eq!(llm.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let response = send(
            app(llm.clone(), Arc::new(MemoryStore::default())),
            Method::POST,
            Some("{not json".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], INVALID_BODY);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_success() {
        let llm = Arc::new(ScriptedLlm::new(vec![BACKEND_EXTRACTION, FIVE_QUESTIONS]));
        let store = Arc::new(MemoryStore::default());

        let response = post(
            app(llm, store.clone()),
            json!({"messages": conversation(), "userId": "user-42"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"success": true}));

        let docs = store.docs.lock().unwrap();
        assert_eq!(docs.len(), 1);
        let (collection, record) = &docs[0];
        assert_eq!(collection, "interviews");
        assert_eq!(record["questions"].as_array().unwrap().len(), 5);
        assert_eq!(record["techstack"], json!(["Go", "Postgres"]));
        assert_eq!(record["finalized"], true);
        assert_eq!(record["role"], "Backend Engineer");
        assert_eq!(record["level"], "Senior");
        assert_eq!(record["userId"], "user-42");
    }

    #[tokio::test]
    async fn test_end_to_end_refusal_reports_diagnostics() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            BACKEND_EXTRACTION,
            "Sorry, I cannot help with that.",
        ]));
        let store = Arc::new(MemoryStore::default());

        let response = post(
            app(llm, store.clone()),
            json!({"messages": conversation(), "userId": "user-42"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("invalid questions array"));
        assert_eq!(
            body["debug"]["questionsText"],
            "Sorry, I cannot help with that."
        );
        assert_eq!(body["debug"]["cleanedQuestions"], "Sorry, I cannot help with that.");
        assert_eq!(body["debug"]["parsedQuestionsType"], "none");
        assert_eq!(body["debug"]["parsedQuestionsSample"], Value::Null);
        assert!(store.docs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extraction_failure_uses_catch_all_shape() {
        let llm = Arc::new(ScriptedLlm::new(vec!["no idea"]));
        let response = post(
            app(llm, Arc::new(MemoryStore::default())),
            json!({"messages": [], "userId": "u1"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Failed to parse extraction response as a JSON object"
        );
        assert_eq!(body["debug"]["extractedText"], "no idea");
        assert_eq!(body["debug"]["questionsText"], Value::Null);
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let llm = Arc::new(ScriptedLlm::new(vec![BACKEND_EXTRACTION, FIVE_QUESTIONS]));
        let store = Arc::new(MemoryStore {
            fail: true,
            ..MemoryStore::default()
        });

        let response = post(app(llm, store), json!({"messages": [], "userId": "u1"})).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
        assert_eq!(body["debug"]["parsedQuestionsType"], "array");
    }

    #[tokio::test]
    async fn test_get_probe() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let response = send(
            app(llm, Arc::new(MemoryStore::default())),
            Method::GET,
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "data": "Thank you!"})
        );
    }

    #[tokio::test]
    async fn test_preflight_is_204_with_cors_headers() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let response = send(
            app(llm, Arc::new(MemoryStore::default())),
            Method::OPTIONS,
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_error_responses_carry_cors_headers() {
        let llm = Arc::new(ScriptedLlm::new(vec![]));
        let response = post(
            app(llm, Arc::new(MemoryStore::default())),
            json!({"userId": "u1"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_validate_request_accepts_truthy_non_string_user_id() {
        let request = validate_request(&json!({"messages": [], "userId": 42})).unwrap();
        assert_eq!(request.user_id, "42");
        assert!(request.messages.is_empty());
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(-1)));
    }
}
