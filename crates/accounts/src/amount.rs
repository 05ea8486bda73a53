//! Transaction amount normalization.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::operation_type::TransactionType;

/// Cent granularity of stored amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Derive the stored amount from a submitted amount.
///
/// Debits are negated, credits keep their sign, then the result is floored
/// (rounded toward negative infinity) to two decimal places. Negation happens
/// before flooring, so `-100.001` as a debit becomes `100.00`, not `100.01`.
pub fn normalize_amount(raw: Decimal, transaction_type: TransactionType) -> Decimal {
    let signed = match transaction_type {
        TransactionType::Debit => -raw,
        TransactionType::Credit => raw,
    };
    signed.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::ToNegativeInfinity)
}
