use std::sync::Arc;

use axum::{Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::get};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(list_operation_types))
}

pub async fn list_operation_types(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.transactions.list_operation_types().await {
        Ok(items) => (StatusCode::OK, Json(dto::operation_types_to_json(items))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
