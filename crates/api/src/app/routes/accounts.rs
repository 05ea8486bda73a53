use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use ledger_core::AccountId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_account))
        .route("/:account_id", get(get_account))
}

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::CreateAccountRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match payload {
        Ok(p) => p,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.accounts.create_account(&body.document_number).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(account_id): Path<String>,
) -> axum::response::Response {
    let account_id: AccountId = match account_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.accounts.get_account(account_id).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
