//! Persistence boundary for accounts, operation types and transactions.
//!
//! Services depend on these traits only; the store handle is injected, so the
//! same orchestration runs against Postgres in production and the in-memory
//! store in tests/dev.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use ledger_accounts::{Account, DocumentNumber, NewTransaction, OperationType, Transaction};
use ledger_core::{AccountId, OperationTypeId};

pub use in_memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;

/// Storage operation error.
///
/// These are infrastructure failures, as opposed to domain errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness guarantee of the store rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Any other storage failure (connection, query, decoding).
    #[error("storage failure: {0}")]
    Storage(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account and assign its id.
    ///
    /// Implementations must reject a second account with the same document
    /// number with `RepositoryError::UniqueViolation`.
    async fn insert_account(&self, document_number: &DocumentNumber) -> RepositoryResult<Account>;

    async fn find_account(&self, account_id: AccountId) -> RepositoryResult<Option<Account>>;

    async fn find_account_by_document(
        &self,
        document_number: &DocumentNumber,
    ) -> RepositoryResult<Option<Account>>;
}

#[async_trait]
pub trait OperationTypeRepository: Send + Sync {
    async fn find_operation_type(
        &self,
        operation_type_id: OperationTypeId,
    ) -> RepositoryResult<Option<OperationType>>;

    /// All operation types, ordered by id.
    async fn list_operation_types(&self) -> RepositoryResult<Vec<OperationType>>;

    /// Insert or replace a reference record (seeding).
    async fn upsert_operation_type(&self, operation_type: &OperationType) -> RepositoryResult<()>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persist a transaction and assign its id.
    async fn insert_transaction(&self, transaction: NewTransaction) -> RepositoryResult<Transaction>;
}

/// Everything the HTTP application needs from a store.
pub trait LedgerStore: AccountRepository + OperationTypeRepository + TransactionRepository {}

impl<T> LedgerStore for T where T: AccountRepository + OperationTypeRepository + TransactionRepository {}

#[async_trait]
impl<S> AccountRepository for Arc<S>
where
    S: AccountRepository + ?Sized,
{
    async fn insert_account(&self, document_number: &DocumentNumber) -> RepositoryResult<Account> {
        (**self).insert_account(document_number).await
    }

    async fn find_account(&self, account_id: AccountId) -> RepositoryResult<Option<Account>> {
        (**self).find_account(account_id).await
    }

    async fn find_account_by_document(
        &self,
        document_number: &DocumentNumber,
    ) -> RepositoryResult<Option<Account>> {
        (**self).find_account_by_document(document_number).await
    }
}

#[async_trait]
impl<S> OperationTypeRepository for Arc<S>
where
    S: OperationTypeRepository + ?Sized,
{
    async fn find_operation_type(
        &self,
        operation_type_id: OperationTypeId,
    ) -> RepositoryResult<Option<OperationType>> {
        (**self).find_operation_type(operation_type_id).await
    }

    async fn list_operation_types(&self) -> RepositoryResult<Vec<OperationType>> {
        (**self).list_operation_types().await
    }

    async fn upsert_operation_type(&self, operation_type: &OperationType) -> RepositoryResult<()> {
        (**self).upsert_operation_type(operation_type).await
    }
}

#[async_trait]
impl<S> TransactionRepository for Arc<S>
where
    S: TransactionRepository + ?Sized,
{
    async fn insert_transaction(&self, transaction: NewTransaction) -> RepositoryResult<Transaction> {
        (**self).insert_transaction(transaction).await
    }
}

/// Seed the default operation type catalogue (idempotent).
pub async fn seed_operation_types<R>(repo: &R) -> RepositoryResult<usize>
where
    R: OperationTypeRepository + ?Sized,
{
    let defaults = OperationType::defaults();
    for op in &defaults {
        repo.upsert_operation_type(op).await?;
    }
    tracing::info!(count = defaults.len(), "seeded operation types");
    Ok(defaults.len())
}
