use axum::Router;

pub mod accounts;
pub mod operation_types;
pub mod system;
pub mod transactions;

/// Router for all resource endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/transactions", transactions::router())
        .nest("/operation-types", operation_types::router())
}
