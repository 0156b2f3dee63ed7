use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use retailops_core::{DomainError, DomainResult, ValueObject};

/// Quantity of a product held at a warehouse.
///
/// Always `>= 0`. Decimal rather than integer: stock is counted in units,
/// kilograms and litres alike.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct StockQuantity(Decimal);

impl StockQuantity {
    pub const ZERO: StockQuantity = StockQuantity(Decimal::ZERO);

    /// Build a quantity, rejecting negative values.
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::validation(format!(
                "stock quantity cannot be negative (got {value})"
            )));
        }
        Ok(Self(value.normalize()))
    }

    /// Build a quantity, flooring negative values at zero.
    pub fn clamped(value: Decimal) -> Self {
        if value.is_sign_negative() {
            Self::ZERO
        } else {
            Self(value.normalize())
        }
    }

    /// Coerce raw operator input into a quantity.
    ///
    /// Blank, non-numeric and negative input all become zero. A single decimal
    /// comma is accepted when the text has no dot (`"2,5"` is 2.5).
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::ZERO;
        }

        let normalized;
        let text = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
            normalized = trimmed.replace(',', ".");
            normalized.as_str()
        } else {
            trimmed
        };

        match Decimal::from_str(text) {
            Ok(value) => Self::clamped(value),
            Err(_) => Self::ZERO,
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl ValueObject for StockQuantity {}

impl TryFrom<Decimal> for StockQuantity {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StockQuantity> for Decimal {
    fn from(value: StockQuantity) -> Self {
        value.0
    }
}

impl From<u32> for StockQuantity {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl core::fmt::Display for StockQuantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
