use serde::Serialize;

use retailops_core::{DomainError, DomainResult, StockId};

use crate::direction::AdjustmentDirection;
use crate::quantity::StockQuantity;
use crate::reason::ReasonCode;

/// A validated request to move `delta` units of one stock row in `direction`.
///
/// The delta is always a positive magnitude; the direction carries the sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustmentRequest {
    stock_id: StockId,
    delta: StockQuantity,
    direction: AdjustmentDirection,
    reason: ReasonCode,
    note: Option<String>,
}

impl AdjustmentRequest {
    pub fn new(
        stock_id: StockId,
        delta: StockQuantity,
        direction: AdjustmentDirection,
        reason: ReasonCode,
        note: Option<String>,
    ) -> DomainResult<Self> {
        if delta.is_zero() {
            return Err(DomainError::validation("delta must be greater than zero"));
        }
        reason.check_direction(direction)?;

        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(Self {
            stock_id,
            delta,
            direction,
            reason,
            note,
        })
    }

    pub fn stock_id(&self) -> StockId {
        self.stock_id
    }

    pub fn delta(&self) -> StockQuantity {
        self.delta
    }

    pub fn direction(&self) -> AdjustmentDirection {
        self.direction
    }

    pub fn reason(&self) -> &ReasonCode {
        &self.reason
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// Form state for an adjustment that has not been validated yet.
///
/// Every selection may still be missing and the delta is whatever the
/// operator typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustmentDraft {
    pub stock_id: Option<StockId>,
    pub direction: AdjustmentDirection,
    pub delta: String,
    pub reason: Option<String>,
    pub note: String,
}

impl AdjustmentDraft {
    /// The delta as the calculator will see it (garbage coerced to zero).
    pub fn delta_quantity(&self) -> StockQuantity {
        StockQuantity::from_input(&self.delta)
    }

    /// Validate the draft, reporting the first missing piece.
    pub fn into_request(self) -> DomainResult<AdjustmentRequest> {
        let stock_id = self
            .stock_id
            .ok_or_else(|| DomainError::validation("a stock item must be selected"))?;

        let reason = match self.reason.as_deref() {
            Some(code) => ReasonCode::new(code)?,
            None => return Err(DomainError::validation("a reason must be selected")),
        };

        let delta = StockQuantity::from_input(&self.delta);

        AdjustmentRequest::new(stock_id, delta, self.direction, reason, Some(self.note))
    }
}
