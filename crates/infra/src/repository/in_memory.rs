use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use ledger_accounts::{Account, DocumentNumber, NewTransaction, OperationType, Transaction};
use ledger_core::{AccountId, OperationTypeId, TransactionId};

use super::{
    AccountRepository, OperationTypeRepository, RepositoryError, RepositoryResult,
    TransactionRepository,
};

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    operation_types: BTreeMap<OperationTypeId, OperationType>,
    transactions: BTreeMap<TransactionId, Transaction>,
    next_account_id: i64,
    next_transaction_id: i64,
}

/// In-memory ledger store.
///
/// Intended for tests/dev. Ids are assigned sequentially from 1 and the
/// document number uniqueness check runs under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    tables: RwLock<Tables>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted transactions.
    pub fn transaction_count(&self) -> usize {
        self.tables.read().map(|t| t.transactions.len()).unwrap_or(0)
    }

    /// Snapshot of a persisted transaction, as stored.
    pub fn stored_transaction(&self, transaction_id: TransactionId) -> Option<Transaction> {
        self.tables
            .read()
            .ok()
            .and_then(|t| t.transactions.get(&transaction_id).cloned())
    }

    fn read(&self) -> RepositoryResult<std::sync::RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))
    }
}

#[async_trait]
impl AccountRepository for InMemoryLedgerStore {
    async fn insert_account(&self, document_number: &DocumentNumber) -> RepositoryResult<Account> {
        let mut tables = self.write()?;

        if tables
            .accounts
            .values()
            .any(|a| &a.document_number == document_number)
        {
            return Err(RepositoryError::UniqueViolation(format!(
                "document_number {document_number} already exists"
            )));
        }

        tables.next_account_id += 1;
        let account = Account {
            account_id: AccountId::new(tables.next_account_id),
            document_number: document_number.clone(),
        };
        tables.accounts.insert(account.account_id, account.clone());
        Ok(account)
    }

    async fn find_account(&self, account_id: AccountId) -> RepositoryResult<Option<Account>> {
        Ok(self.read()?.accounts.get(&account_id).cloned())
    }

    async fn find_account_by_document(
        &self,
        document_number: &DocumentNumber,
    ) -> RepositoryResult<Option<Account>> {
        Ok(self
            .read()?
            .accounts
            .values()
            .find(|a| &a.document_number == document_number)
            .cloned())
    }
}

#[async_trait]
impl OperationTypeRepository for InMemoryLedgerStore {
    async fn find_operation_type(
        &self,
        operation_type_id: OperationTypeId,
    ) -> RepositoryResult<Option<OperationType>> {
        Ok(self.read()?.operation_types.get(&operation_type_id).cloned())
    }

    async fn list_operation_types(&self) -> RepositoryResult<Vec<OperationType>> {
        Ok(self.read()?.operation_types.values().cloned().collect())
    }

    async fn upsert_operation_type(&self, operation_type: &OperationType) -> RepositoryResult<()> {
        self.write()?
            .operation_types
            .insert(operation_type.operation_type_id, operation_type.clone());
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for InMemoryLedgerStore {
    async fn insert_transaction(&self, transaction: NewTransaction) -> RepositoryResult<Transaction> {
        let mut tables = self.write()?;

        if !tables.accounts.contains_key(&transaction.account_id) {
            return Err(RepositoryError::Storage(format!(
                "foreign key violation: account {} does not exist",
                transaction.account_id
            )));
        }
        if !tables.operation_types.contains_key(&transaction.operation_type_id) {
            return Err(RepositoryError::Storage(format!(
                "foreign key violation: operation type {} does not exist",
                transaction.operation_type_id
            )));
        }

        tables.next_transaction_id += 1;
        let stored = transaction.into_transaction(TransactionId::new(tables.next_transaction_id));
        tables.transactions.insert(stored.transaction_id, stored.clone());
        Ok(stored)
    }
}
