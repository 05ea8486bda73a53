use serde::{Deserialize, Serialize};

use ledger_core::{DomainError, OperationTypeId};

/// Sign class of an operation. Stored and serialized as `0` (debit) / `1` (credit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    pub fn code(self) -> i16 {
        match self {
            TransactionType::Debit => 0,
            TransactionType::Credit => 1,
        }
    }
}

impl From<TransactionType> for i16 {
    fn from(value: TransactionType) -> Self {
        value.code()
    }
}

impl TryFrom<i16> for TransactionType {
    type Error = DomainError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TransactionType::Debit),
            1 => Ok(TransactionType::Credit),
            other => Err(DomainError::validation(format!("unknown transaction type code {other}"))),
        }
    }
}

/// Reference record describing a class of transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationType {
    pub operation_type_id: OperationTypeId,
    pub description: String,
    pub transaction_type: TransactionType,
}

impl OperationType {
    pub fn new(id: i64, description: impl Into<String>, transaction_type: TransactionType) -> Self {
        Self {
            operation_type_id: OperationTypeId::new(id),
            description: description.into(),
            transaction_type,
        }
    }

    /// Default catalogue seeded at startup.
    pub fn defaults() -> Vec<OperationType> {
        vec![
            OperationType::new(1, "Normal Purchase", TransactionType::Debit),
            OperationType::new(2, "Purchase with installments", TransactionType::Debit),
            OperationType::new(3, "Withdrawal", TransactionType::Debit),
            OperationType::new(4, "Credit Voucher", TransactionType::Credit),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_storage_convention() {
        assert_eq!(TransactionType::Debit.code(), 0);
        assert_eq!(TransactionType::Credit.code(), 1);
        assert_eq!(TransactionType::try_from(0).unwrap(), TransactionType::Debit);
        assert!(TransactionType::try_from(7).is_err());
    }

    #[test]
    fn serializes_as_integer_code() {
        let json = serde_json::to_value(OperationType::new(4, "Credit Voucher", TransactionType::Credit)).unwrap();
        assert_eq!(json["transaction_type"], 1);

        let debit: TransactionType = serde_json::from_str("0").unwrap();
        assert_eq!(debit, TransactionType::Debit);
        assert!(serde_json::from_str::<TransactionType>("2").is_err());
    }

    #[test]
    fn only_credit_voucher_is_a_credit() {
        let credits: Vec<_> = OperationType::defaults()
            .into_iter()
            .filter(|op| op.transaction_type == TransactionType::Credit)
            .map(|op| op.operation_type_id.get())
            .collect();
        assert_eq!(credits, vec![4]);
    }
}
