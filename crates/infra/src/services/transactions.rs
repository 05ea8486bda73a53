use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;

use ledger_accounts::{NewTransaction, OperationType, Transaction, normalize_amount};
use ledger_core::{AccountId, OperationTypeId};

use super::accounts::ACCOUNT_NOT_FOUND;
use super::{ServiceError, ServiceResult};
use crate::repository::{AccountRepository, OperationTypeRepository, TransactionRepository};

const INVALID_OPERATION_TYPE: &str = "invalid operation type";

/// A persisted transaction plus the amount exactly as the client submitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedTransaction {
    /// The stored record; `amount` is normalized.
    pub transaction: Transaction,
    pub submitted_amount: Decimal,
}

/// Records transactions against accounts.
#[derive(Debug, Clone)]
pub struct TransactionService<R> {
    repo: R,
}

impl<R> TransactionService<R>
where
    R: AccountRepository + OperationTypeRepository + TransactionRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validate references, normalize the amount and persist one transaction.
    ///
    /// The operation type is resolved before the account; an unknown
    /// operation type fails without touching accounts.
    #[instrument(
        skip_all,
        fields(account_id = %account_id, operation_type_id = %operation_type_id, amount = %amount)
    )]
    pub async fn create_transaction(
        &self,
        account_id: AccountId,
        operation_type_id: OperationTypeId,
        amount: Decimal,
    ) -> ServiceResult<PostedTransaction> {
        let operation_type = self
            .repo
            .find_operation_type(operation_type_id)
            .await?
            .ok_or_else(|| ServiceError::Validation(INVALID_OPERATION_TYPE.to_string()))?;

        let normalized = normalize_amount(amount, operation_type.transaction_type);

        if self.repo.find_account(account_id).await?.is_none() {
            return Err(ServiceError::NotFound(ACCOUNT_NOT_FOUND.to_string()));
        }

        let transaction = self
            .repo
            .insert_transaction(NewTransaction {
                account_id,
                operation_type_id,
                amount: normalized,
                event_date: Utc::now(),
            })
            .await?;

        tracing::info!(
            transaction_id = %transaction.transaction_id,
            amount = %transaction.amount,
            "transaction recorded"
        );

        Ok(PostedTransaction {
            transaction,
            submitted_amount: amount,
        })
    }

    pub async fn list_operation_types(&self) -> ServiceResult<Vec<OperationType>> {
        Ok(self.repo.list_operation_types().await?)
    }
}
