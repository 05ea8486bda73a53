use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledger_core::{AccountId, OperationTypeId, TransactionId};

/// A recorded, immutable monetary movement. `amount` is the normalized value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub operation_type_id: OperationTypeId,
    pub amount: Decimal,
    pub event_date: DateTime<Utc>,
}

/// A transaction ready to be persisted (id not yet assigned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub operation_type_id: OperationTypeId,
    pub amount: Decimal,
    pub event_date: DateTime<Utc>,
}

impl NewTransaction {
    pub fn into_transaction(self, transaction_id: TransactionId) -> Transaction {
        Transaction {
            transaction_id,
            account_id: self.account_id,
            operation_type_id: self.operation_type_id,
            amount: self.amount,
            event_date: self.event_date,
        }
    }
}
