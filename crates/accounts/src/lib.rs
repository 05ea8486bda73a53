//! Accounts module (accounts, operation types, transactions).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod account;
pub mod amount;
pub mod operation_type;
pub mod transaction;

pub use account::{Account, DocumentNumber};
pub use amount::normalize_amount;
pub use operation_type::{OperationType, TransactionType};
pub use transaction::{NewTransaction, Transaction};
