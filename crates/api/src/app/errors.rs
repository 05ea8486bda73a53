//! Error-to-response translation, applied once at the request boundary.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ledger_core::DomainError;
use ledger_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::Validation(msg) | ServiceError::Conflict(msg) | ServiceError::NotFound(msg) => {
            json_error(StatusCode::BAD_REQUEST, msg)
        }
        ServiceError::Persistence(e) => {
            tracing::error!(error = %e, "persistence failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "database error")
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    service_error_to_response(err.into())
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_infra::RepositoryError;
    use serde_json::Value;

    async fn body_json(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn persistence_failure_is_a_generic_500() {
        let err = ServiceError::Persistence(RepositoryError::Storage("connection reset".into()));
        let res = service_error_to_response(err);

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await, json!({ "error": "database error" }));
    }

    #[tokio::test]
    async fn domain_failures_are_400_with_their_message() {
        let res = service_error_to_response(ServiceError::NotFound("account not found".into()));

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await, json!({ "error": "account not found" }));
    }
}
