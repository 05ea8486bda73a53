use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledger_accounts::OperationType;
use ledger_core::{AccountId, OperationTypeId, TransactionId};
use ledger_infra::PostedTransaction;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub document_number: String,
}

/// `amount` accepts a JSON number or a decimal string.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub account_id: AccountId,
    pub operation_type_id: OperationTypeId,
    pub amount: Decimal,
}

// -------------------------
// Response DTOs
// -------------------------

/// Transaction as returned to the client.
///
/// `amount` echoes the submitted value; the stored value is normalized.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub operation_type_id: OperationTypeId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub event_date: DateTime<Utc>,
}

impl From<PostedTransaction> for TransactionResponse {
    fn from(posted: PostedTransaction) -> Self {
        let tx = posted.transaction;
        Self {
            transaction_id: tx.transaction_id,
            account_id: tx.account_id,
            operation_type_id: tx.operation_type_id,
            amount: posted.submitted_amount,
            event_date: tx.event_date,
        }
    }
}

pub fn operation_types_to_json(items: Vec<OperationType>) -> serde_json::Value {
    serde_json::json!({ "items": items })
}
