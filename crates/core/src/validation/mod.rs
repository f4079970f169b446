//! Pre-condition checks run before any ledger mutation.
//!
//! Every check here is pure and detected before a single write: a failed
//! validation means no downstream side effect of any kind. Errors are
//! field-keyed so the presentation layer can attach messages to form fields.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::trade::UnitKind;

/// Shortest accepted name for products and customers.
pub const NAME_MIN: usize = 2;
/// Longest accepted name for products and customers.
pub const NAME_MAX: usize = 100;

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending input field.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Aggregated validation failures for one request.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Validation failed: {}", self.summary())]
pub struct ValidationErrors {
    /// The individual field failures.
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Collects field errors and converts into a result.
#[derive(Debug, Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+90|0)?5\d{9}$").expect("phone regex is valid"));

/// Validates a mobile phone number (optional +90/0 prefix, then 5 and nine
/// digits). Whitespace is ignored.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_RE.is_match(&compact)
}

/// Validates an 11-digit national identity number checksum.
///
/// Rules: eleven digits, first digit nonzero; the tenth digit is
/// (7 x sum of odd-position digits - sum of even-position digits) mod 10;
/// the eleventh digit is the sum of the first ten mod 10.
#[must_use]
pub fn is_valid_national_id(id: &str) -> bool {
    if id.len() != 11 {
        return false;
    }
    let Some(digits) = id
        .chars()
        .map(|c| c.to_digit(10).map(|d| i64::from(d)))
        .collect::<Option<Vec<_>>>()
    else {
        return false;
    };
    if digits[0] == 0 {
        return false;
    }

    let sum10: i64 = digits[..10].iter().sum();
    if sum10 % 10 != digits[10] {
        return false;
    }

    let odd = digits[0] + digits[2] + digits[4] + digits[6] + digits[8];
    let even = digits[1] + digits[3] + digits[5] + digits[7];
    (odd * 7 - even).rem_euclid(10) == digits[9]
}

/// Validates product inputs: name length, purity ranges, and the
/// grams-per-piece requirement for piece-kind products.
pub fn validate_product(
    name: &str,
    buy_milyem: Decimal,
    sell_milyem: Decimal,
    unit_kind: UnitKind,
    grams_per_piece: Option<Decimal>,
) -> Result<(), ValidationErrors> {
    let mut c = Collector::default();

    let name = name.trim();
    if name.len() < NAME_MIN || name.len() > NAME_MAX {
        c.push(
            "name",
            format!("must be between {NAME_MIN} and {NAME_MAX} characters"),
        );
    }

    for (field, milyem) in [("buyMilyem", buy_milyem), ("sellMilyem", sell_milyem)] {
        if milyem <= Decimal::ZERO || milyem > Decimal::ONE {
            c.push(field, "must be in (0, 1]");
        }
    }

    if unit_kind == UnitKind::Piece {
        match grams_per_piece {
            Some(g) if g > Decimal::ZERO => {}
            Some(_) => c.push("gramsPerPiece", "must be positive"),
            None => c.push("gramsPerPiece", "required for piece-kind products"),
        }
    }

    c.finish()
}

/// Validates product transaction inputs.
pub fn validate_transaction(
    quantity: Decimal,
    buy_price: Decimal,
    sell_price: Decimal,
    adjustment: Decimal,
) -> Result<(), ValidationErrors> {
    let mut c = Collector::default();

    if quantity <= Decimal::ZERO {
        c.push("quantity", "must be positive");
    }
    if buy_price < Decimal::ZERO {
        c.push("buyPrice", "must not be negative");
    }
    if sell_price < Decimal::ZERO {
        c.push("sellPrice", "must not be negative");
    }
    if adjustment < Decimal::ZERO {
        c.push("adjustment", "must not be negative");
    }

    c.finish()
}

/// Validates customer inputs: name, phone format, and the optional national
/// ID checksum.
pub fn validate_customer(
    name: &str,
    phone: &str,
    national_id: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut c = Collector::default();

    let name = name.trim();
    if name.len() < NAME_MIN || name.len() > NAME_MAX {
        c.push(
            "name",
            format!("must be between {NAME_MIN} and {NAME_MAX} characters"),
        );
    }

    if !is_valid_phone(phone) {
        c.push("phone", "must be a valid mobile number (5XXXXXXXXX)");
    }

    if let Some(id) = national_id {
        let id = id.trim();
        if !id.is_empty() && !is_valid_national_id(id) {
            c.push("nationalId", "checksum is invalid");
        }
    }

    c.finish()
}

/// Validates a payment application: positive amount, and bank transfers must
/// name the bank and the account holder.
pub fn validate_payment(
    amount: Decimal,
    method: crate::payment::PaymentMethod,
    bank_name: Option<&str>,
    account_holder: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut c = Collector::default();

    if amount <= Decimal::ZERO {
        c.push("amount", "must be positive");
    }

    if method == crate::payment::PaymentMethod::BankTransfer {
        if bank_name.is_none_or(|s| s.trim().is_empty()) {
            c.push("bankName", "required for bank transfers");
        }
        if account_holder.is_none_or(|s| s.trim().is_empty()) {
            c.push("accountHolder", "required for bank transfers");
        }
    }

    c.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::PaymentMethod;
    use rust_decimal_macros::dec;

    #[test]
    fn test_phone_formats() {
        assert!(is_valid_phone("5321234567"));
        assert!(is_valid_phone("05321234567"));
        assert!(is_valid_phone("+905321234567"));
        assert!(is_valid_phone("0532 123 45 67"));

        assert!(!is_valid_phone("4321234567")); // not a mobile prefix
        assert!(!is_valid_phone("532123456")); // too short
        assert!(!is_valid_phone("053212345678")); // too long
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_national_id_checksum() {
        // d10 = (7*(1+3+5+7+9) - (2+4+6+8)) mod 10 = 5, d11 = 50 mod 10 = 0.
        assert!(is_valid_national_id("12345678950"));

        assert!(!is_valid_national_id("12345678951")); // wrong final digit
        assert!(!is_valid_national_id("02345678950")); // leading zero
        assert!(!is_valid_national_id("1234567895")); // too short
        assert!(!is_valid_national_id("1234567895a")); // non-digit
    }

    #[test]
    fn test_validate_product_accepts_well_formed() {
        assert!(
            validate_product("22k bracelet", dec!(0.916), dec!(0.920), UnitKind::Gram, None)
                .is_ok()
        );
        assert!(validate_product(
            "Quarter coin",
            dec!(0.916),
            dec!(0.920),
            UnitKind::Piece,
            Some(dec!(1.75)),
        )
        .is_ok());
    }

    #[test]
    fn test_validate_product_rejects_piece_without_factor() {
        let err = validate_product("Coin", dec!(0.916), dec!(0.920), UnitKind::Piece, None)
            .unwrap_err();
        assert!(err.errors.iter().any(|e| e.field == "gramsPerPiece"));
    }

    #[test]
    fn test_validate_product_rejects_bad_milyem() {
        let err =
            validate_product("Coin", dec!(0), dec!(1.5), UnitKind::Gram, None).unwrap_err();
        let fields: Vec<_> = err.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["buyMilyem", "sellMilyem"]);
    }

    #[test]
    fn test_validate_transaction_collects_all_failures() {
        let err = validate_transaction(dec!(0), dec!(-1), dec!(2000), dec!(-2)).unwrap_err();
        let fields: Vec<_> = err.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["quantity", "buyPrice", "adjustment"]);
    }

    #[test]
    fn test_validate_customer() {
        assert!(validate_customer("Ayse Yilmaz", "5321234567", None).is_ok());
        assert!(validate_customer("Ayse Yilmaz", "5321234567", Some("12345678950")).is_ok());
        // Blank national ID is treated as absent.
        assert!(validate_customer("Ayse Yilmaz", "5321234567", Some("  ")).is_ok());

        let err = validate_customer("A", "123", Some("11111111111")).unwrap_err();
        let fields: Vec<_> = err.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "phone", "nationalId"]);
    }

    #[test]
    fn test_validate_payment_bank_transfer_metadata() {
        assert!(validate_payment(dec!(100), PaymentMethod::Cash, None, None).is_ok());

        let err =
            validate_payment(dec!(100), PaymentMethod::BankTransfer, None, Some("A. Yilmaz"))
                .unwrap_err();
        assert!(err.errors.iter().any(|e| e.field == "bankName"));

        assert!(validate_payment(
            dec!(100),
            PaymentMethod::BankTransfer,
            Some("Ziraat"),
            Some("A. Yilmaz"),
        )
        .is_ok());
    }
}
