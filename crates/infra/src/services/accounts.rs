use tracing::instrument;

use ledger_accounts::{Account, DocumentNumber};
use ledger_core::AccountId;

use super::{ServiceError, ServiceResult};
use crate::repository::{AccountRepository, RepositoryError};

pub(crate) const ACCOUNT_EXISTS: &str = "account already exists";
pub(crate) const ACCOUNT_NOT_FOUND: &str = "account not found";

/// Creates and reads accounts.
#[derive(Debug, Clone)]
pub struct AccountService<R> {
    repo: R,
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn create_account(&self, document_number: &str) -> ServiceResult<Account> {
        let document_number = DocumentNumber::parse(document_number)?;

        if self
            .repo
            .find_account_by_document(&document_number)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(ACCOUNT_EXISTS.to_string()));
        }

        // A concurrent create can pass the check above; the store's uniqueness
        // guarantee turns that into the same conflict.
        let account = match self.repo.insert_account(&document_number).await {
            Ok(account) => account,
            Err(RepositoryError::UniqueViolation(_)) => {
                return Err(ServiceError::Conflict(ACCOUNT_EXISTS.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(account_id = %account.account_id, "account created");
        Ok(account)
    }

    #[instrument(skip_all, fields(account_id = %account_id))]
    pub async fn get_account(&self, account_id: AccountId) -> ServiceResult<Account> {
        self.repo
            .find_account(account_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(ACCOUNT_NOT_FOUND.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::repository::{InMemoryLedgerStore, RepositoryResult};

    fn service() -> AccountService<Arc<InMemoryLedgerStore>> {
        AccountService::new(Arc::new(InMemoryLedgerStore::new()))
    }

    #[tokio::test]
    async fn creates_account_with_first_id() {
        let svc = service();
        let account = svc.create_account("123456765432").await.unwrap();
        assert_eq!(account.account_id, AccountId::new(1));
        assert_eq!(account.document_number.as_str(), "123456765432");
    }

    #[tokio::test]
    async fn rejects_non_numeric_document() {
        let svc = service();
        let err = svc.create_account("abcd").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "invalid document number"));
    }

    #[tokio::test]
    async fn second_account_with_same_document_conflicts() {
        let svc = service();
        svc.create_account("12345678911").await.unwrap();
        let err = svc.create_account("12345678911").await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "account already exists"));
    }

    #[tokio::test]
    async fn get_returns_created_account() {
        let svc = service();
        let created = svc.create_account("12345678900").await.unwrap();
        let fetched = svc.get_account(created.account_id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let svc = service();
        svc.create_account("12345678900").await.unwrap();
        let err = svc.get_account(AccountId::new(17)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "account not found"));
    }

    /// Store that loses the race: the pre-check sees nothing, the insert hits
    /// the uniqueness guarantee.
    struct RacingStore;

    #[async_trait]
    impl AccountRepository for RacingStore {
        async fn insert_account(&self, document_number: &DocumentNumber) -> RepositoryResult<Account> {
            Err(RepositoryError::UniqueViolation(format!(
                "document_number {document_number} already exists"
            )))
        }

        async fn find_account(&self, _: AccountId) -> RepositoryResult<Option<Account>> {
            Ok(None)
        }

        async fn find_account_by_document(&self, _: &DocumentNumber) -> RepositoryResult<Option<Account>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn unique_violation_on_insert_is_a_conflict() {
        let svc = AccountService::new(RacingStore);
        let err = svc.create_account("1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "account already exists"));
    }
}
