//! Application services: request-level orchestration over the repositories.
//!
//! ```text
//! create_account:      validate document -> duplicate check -> insert
//! create_transaction:  operation type -> normalize -> account -> insert
//! ```
//!
//! Each service owns an injected store handle and contains no IO of its own.

pub mod accounts;
pub mod transactions;

use thiserror::Error;

use ledger_core::DomainError;

use crate::repository::RepositoryError;

pub use accounts::AccountService;
pub use transactions::{PostedTransaction, TransactionService};

/// Failure of a service operation, tagged by kind for the request boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed input or unknown reference data.
    #[error("{0}")]
    Validation(String),
    /// The resource already exists.
    #[error("{0}")]
    Conflict(String),
    /// A referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Storage failed; terminal for the request.
    #[error("persistence failure: {0}")]
    Persistence(#[from] RepositoryError),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => ServiceError::Validation(msg),
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
            DomainError::NotFound(msg) => ServiceError::NotFound(msg),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
