//! Money parsing and formatting
//!
//! Every monetary quantity in the crate is a `rust_decimal::Decimal`. This
//! module is the single place where client-supplied strings become decimals
//! and where decimals become client-facing strings.
//!
//! ## Accepted input format
//! - Plain decimal notation: `"40"`, `"40.00"`, `"0.5"`, `"-5"`
//! - Rejected: empty, `".5"`, `"5."`, `"+5"`, `"1e3"`, whitespace
//!
//! A leading `-` is accepted here. Sign checks belong to
//! [`PositiveAmount`], so `"-5"` fails as a non-positive amount rather than
//! as a format error.

use rust_decimal::Decimal;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount cannot be empty")]
    Empty,

    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("Amount must be greater than zero")]
    NotPositive,
}

// ============================================================================
// Parse: Client → Decimal
// ============================================================================

/// Parse a client decimal string with strict format rules
pub fn parse_decimal(s: &str) -> Result<Decimal, MoneyError> {
    if s.is_empty() {
        return Err(MoneyError::Empty);
    }

    let digits = s.strip_prefix('-').unwrap_or(s);

    if digits.starts_with('.') {
        return Err(MoneyError::InvalidFormat("use 0.5 not .5".to_string()));
    }
    if digits.ends_with('.') {
        return Err(MoneyError::InvalidFormat("use 5.0 not 5.".to_string()));
    }
    if digits.contains(['e', 'E']) {
        return Err(MoneyError::InvalidFormat(
            "scientific notation not allowed".to_string(),
        ));
    }
    if !digits.chars().all(|c| c.is_ascii_digit() || c == '.') || digits.is_empty() {
        return Err(MoneyError::InvalidFormat(s.to_string()));
    }

    // Exact: input past 28 significant digits is an error, never rounded
    Decimal::from_str_exact(s).map_err(|e| MoneyError::InvalidFormat(e.to_string()))
}

// ============================================================================
// PositiveAmount
// ============================================================================

/// A strictly positive monetary amount.
///
/// The only way to hand an amount to the atomic transfer primitive, so the
/// `amount > 0` invariant of ledger entries holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PositiveAmount(Decimal);

impl PositiveAmount {
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value <= Decimal::ZERO {
            return Err(MoneyError::NotPositive);
        }
        Ok(Self(value))
    }

    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        Self::new(parse_decimal(s)?)
    }

    pub fn get(self) -> Decimal {
        self.0
    }
}

// ============================================================================
// Format: Decimal → Client
// ============================================================================

/// Format a stored amount for API output.
///
/// Keeps the stored scale (`100.00` stays `"100.00"`), always a string so no
/// JSON number round-trip can lose precision.
pub fn format_amount(value: Decimal) -> String {
    value.to_string()
}
