use serde::{Deserialize, Serialize};

use retailops_core::{DomainError, DomainResult, ValueObject};

use crate::direction::AdjustmentDirection;

/// Reason/category code attached to an adjustment (e.g. `merma_vencimiento`).
///
/// Stored trimmed and lowercased; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReasonCode(String);

/// Broad family a reason code belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    /// Count corrections (ajuste).
    Correction,
    /// Shrinkage/loss (merma).
    Shrinkage,
    /// Loading opening stock (inventario inicial).
    InitialCount,
    Other,
}

impl ReasonKind {
    /// Whether a movement of this kind may go in `direction`.
    ///
    /// Merma only takes stock out and an initial count only brings it in.
    pub fn allows(self, direction: AdjustmentDirection) -> bool {
        match self {
            ReasonKind::Shrinkage => direction == AdjustmentDirection::Salida,
            ReasonKind::InitialCount => direction == AdjustmentDirection::Entrada,
            ReasonKind::Correction | ReasonKind::Other => true,
        }
    }
}

impl ReasonCode {
    pub fn new(code: impl AsRef<str>) -> DomainResult<Self> {
        let code = code.as_ref().trim().to_lowercase();
        if code.is_empty() {
            return Err(DomainError::validation("a reason must be selected"));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> ReasonKind {
        let code = self.0.as_str();
        if code.starts_with("merma") || code.starts_with("shrinkage") {
            ReasonKind::Shrinkage
        } else if code == "inventario_inicial" || code.starts_with("initial") {
            ReasonKind::InitialCount
        } else if code.starts_with("ajuste") || code.starts_with("correction") {
            ReasonKind::Correction
        } else {
            ReasonKind::Other
        }
    }

    pub fn is_shrinkage(&self) -> bool {
        self.kind() == ReasonKind::Shrinkage
    }

    /// Reject a direction the reason's kind does not allow.
    pub fn check_direction(&self, direction: AdjustmentDirection) -> DomainResult<()> {
        if self.kind().allows(direction) {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "reason '{}' cannot be used with a {} movement",
                self.0, direction
            )))
        }
    }
}

impl ValueObject for ReasonCode {}

impl TryFrom<String> for ReasonCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReasonCode> for String {
    fn from(value: ReasonCode) -> Self {
        value.0
    }
}

impl core::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
