use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(create_transaction))
}

pub async fn create_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::CreateTransactionRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match payload {
        Ok(p) => p,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services
        .transactions
        .create_transaction(body.account_id, body.operation_type_id, body.amount)
        .await
    {
        Ok(posted) => (StatusCode::OK, Json(dto::TransactionResponse::from(posted))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
