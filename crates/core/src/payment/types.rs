//! Payment domain types.

use serde::{Deserialize, Serialize};

/// Settlement status of a payment. Transitions only move forward:
/// PENDING -> PARTIAL -> COMPLETED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// Nothing applied yet; remaining equals total.
    Pending,
    /// Some amount applied, a real remainder is left.
    Partial,
    /// Remaining is within the settlement epsilon of zero.
    Completed,
}

impl PaymentStatus {
    /// Returns true if further payment applications are accepted.
    #[must_use]
    pub fn accepts_payment(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

/// Whether the shop owes or is owed under this payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentKind {
    /// Shop pays out (created for BUY transactions).
    Payable,
    /// Shop collects (created for SELL transactions).
    Receivable,
}

/// Method used for one payment application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Bank transfer; detail rows carry bank name, account holder, and
    /// reference number.
    BankTransfer,
    /// Credit card.
    CreditCard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering_is_forward() {
        assert!(PaymentStatus::Pending < PaymentStatus::Partial);
        assert!(PaymentStatus::Partial < PaymentStatus::Completed);
    }

    #[test]
    fn test_completed_accepts_no_payment() {
        assert!(PaymentStatus::Pending.accepts_payment());
        assert!(PaymentStatus::Partial.accepts_payment());
        assert!(!PaymentStatus::Completed.accepts_payment());
    }

    #[test]
    fn test_method_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"BANK_TRANSFER\""
        );
    }
}
