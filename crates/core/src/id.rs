//! Strongly-typed identifiers used across the domain.
//!
//! Ids are positive integers assigned by the store (1, 2, 3, ...).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a customer account.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

/// Identifier of an operation type (reference data).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationTypeId(i64);

/// Identifier of a recorded transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $invalid:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            /// Parses a path segment; only positive integers are valid ids.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<i64>() {
                    Ok(v) if v > 0 => Ok(Self(v)),
                    _ => Err(DomainError::invalid_id($invalid)),
                }
            }
        }
    };
}

impl_int_newtype!(AccountId, "invalid account ID");
impl_int_newtype!(OperationTypeId, "invalid operation type ID");
impl_int_newtype!(TransactionId, "invalid transaction ID");

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_positive_integers() {
        assert_eq!("17".parse::<AccountId>().unwrap(), AccountId::new(17));
    }

    #[test]
    fn rejects_garbage_and_non_positive() {
        for input in ["abc", "", "0", "-3", "1.5"] {
            let err = input.parse::<AccountId>().unwrap_err();
            assert_eq!(err, DomainError::InvalidId("invalid account ID".to_string()));
        }
    }

    proptest! {
        #[test]
        fn any_non_numeric_segment_is_rejected(s in "[0-9]{0,4}[a-z_.][0-9a-z]{0,4}") {
            prop_assert!(s.parse::<TransactionId>().is_err());
        }
    }
}
