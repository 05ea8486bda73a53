//! `ledger-core`: shared primitives for the ledger service.
//!
//! Identifiers and the domain error model. No IO, no persistence concerns.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{AccountId, OperationTypeId, TransactionId};
