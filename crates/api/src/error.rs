use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use stagecraft_core::error::CoreError;
use stagecraft_db::DbError;
use stagecraft_llm::LlmError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `stagecraft_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A repository error from `stagecraft_db`.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The upstream completion API failed or is not configured.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Repository errors ---
            AppError::Db(err) => match err {
                DbError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                DbError::MissingReference { .. } => {
                    (StatusCode::BAD_REQUEST, "MISSING_REFERENCE", err.to_string())
                }
                DbError::InvalidMessages => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                }
            },

            // --- Upstream completion errors ---
            AppError::Llm(err) => match err {
                LlmError::NotConfigured => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "LLM_NOT_CONFIGURED",
                    err.to_string(),
                ),
                LlmError::Api { status, body } => {
                    tracing::warn!(upstream_status = status, body = %body, "Upstream API error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_ERROR",
                        format!("Upstream completion API returned {status}"),
                    )
                }
                LlmError::Request(_) | LlmError::Stream(_) => {
                    tracing::warn!(error = %err, "Upstream request failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_ERROR",
                        "Upstream completion API is unreachable".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn repository_errors_map_to_client_errors() {
        assert_eq!(
            status_of(DbError::NotFound { entity: "Script", id: 9 }.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DbError::MissingReference { entity: "Character", id: 9 }.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(DbError::InvalidMessages.into()), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_errors_map_to_gateway_statuses() {
        assert_eq!(status_of(LlmError::NotConfigured.into()), StatusCode::SERVICE_UNAVAILABLE);
        let api = LlmError::Api {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(status_of(api.into()), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let response = AppError::InternalError("lock poisoned at store.rs".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
