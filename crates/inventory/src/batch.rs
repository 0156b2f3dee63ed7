//! Pending adjustments held by one operator session until submission.

use serde::{Deserialize, Serialize};

use retailops_core::{DomainError, DomainResult, StockId};

use crate::direction::AdjustmentDirection;
use crate::quantity::StockQuantity;
use crate::reason::ReasonCode;
use crate::request::AdjustmentRequest;
use crate::stock::StockLevel;

/// One staged line: the request plus the quantities it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentLine {
    pub stock_id: StockId,
    pub product_name: String,
    pub previous: StockQuantity,
    pub resulting: StockQuantity,
    pub direction: AdjustmentDirection,
    pub delta: StockQuantity,
    pub reason: ReasonCode,
    pub note: Option<String>,
}

impl AdjustmentLine {
    /// Part of a salida that exceeded the stock held and was dropped by the zero floor.
    pub fn shortfall(&self) -> StockQuantity {
        match self.direction {
            AdjustmentDirection::Entrada => StockQuantity::ZERO,
            AdjustmentDirection::Salida => {
                StockQuantity::clamped(self.delta.value() - self.previous.value())
            }
        }
    }
}

/// Ordered list of pending lines, at most one per stock row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustmentBatch {
    lines: Vec<AdjustmentLine>,
}

impl AdjustmentBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute and stage a line for `stock`.
    ///
    /// The resulting quantity is always computed from the fetched quantity, so
    /// staging the same row again replaces the earlier line (keeping its
    /// position) rather than compounding on it.
    pub fn stage(&mut self, stock: &StockLevel, request: AdjustmentRequest) -> DomainResult<&AdjustmentLine> {
        if request.stock_id() != stock.stock_id {
            return Err(DomainError::invariant(format!(
                "request targets stock {} but was staged against {}",
                request.stock_id(),
                stock.stock_id
            )));
        }

        let outcome = stock.preview(request.direction(), request.delta());
        if outcome.was_clamped() {
            tracing::warn!(
                stock_id = %stock.stock_id,
                current = %stock.quantity,
                delta = %request.delta(),
                shortfall = %outcome.shortfall,
                "salida exceeds stock on hand; resulting quantity floored at zero"
            );
        }

        let line = AdjustmentLine {
            stock_id: stock.stock_id,
            product_name: stock.product_name.clone(),
            previous: stock.quantity,
            resulting: outcome.resulting,
            direction: request.direction(),
            delta: request.delta(),
            reason: request.reason().clone(),
            note: request.note().map(str::to_string),
        };

        let idx = match self.lines.iter().position(|l| l.stock_id == stock.stock_id) {
            Some(idx) => {
                tracing::debug!(stock_id = %stock.stock_id, "replacing staged adjustment line");
                self.lines[idx] = line;
                idx
            }
            None => {
                self.lines.push(line);
                self.lines.len() - 1
            }
        };

        Ok(&self.lines[idx])
    }

    /// Drop the line for `stock_id`, returning it if one was staged.
    pub fn remove(&mut self, stock_id: StockId) -> Option<AdjustmentLine> {
        let idx = self.lines.iter().position(|l| l.stock_id == stock_id)?;
        Some(self.lines.remove(idx))
    }

    pub fn get(&self, stock_id: StockId) -> Option<&AdjustmentLine> {
        self.lines.iter().find(|l| l.stock_id == stock_id)
    }

    pub fn lines(&self) -> &[AdjustmentLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Fail unless there is something to send.
    pub fn ensure_submittable(&self) -> DomainResult<()> {
        if self.lines.is_empty() {
            return Err(DomainError::validation("no adjustments to submit"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retailops_core::{ProductId, WarehouseId};

    fn stock(name: &str, qty: u32) -> StockLevel {
        StockLevel {
            stock_id: StockId::new(),
            product_id: ProductId::new(),
            warehouse_id: WarehouseId::new(),
            product_name: name.to_string(),
            quantity: StockQuantity::from(qty),
        }
    }

    fn request(stock: &StockLevel, direction: AdjustmentDirection, delta: u32, reason: &str) -> AdjustmentRequest {
        AdjustmentRequest::new(
            stock.stock_id,
            StockQuantity::from(delta),
            direction,
            ReasonCode::new(reason).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn stage_computes_resulting_quantity() {
        let mut batch = AdjustmentBatch::new();
        let s = stock("Aceite 1L", 10);

        let line = batch.stage(&s, request(&s, AdjustmentDirection::Entrada, 7, "ajuste")).unwrap();
        assert_eq!(line.previous, StockQuantity::from(10));
        assert_eq!(line.resulting, StockQuantity::from(17));
        assert_eq!(line.product_name, "Aceite 1L");
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn over_deduction_is_floored_and_shortfall_kept() {
        let mut batch = AdjustmentBatch::new();
        let s = stock("Leche", 10);

        let line = batch.stage(&s, request(&s, AdjustmentDirection::Salida, 15, "merma")).unwrap();
        assert_eq!(line.resulting, StockQuantity::ZERO);
        assert_eq!(line.shortfall(), StockQuantity::from(5));
    }

    #[test]
    fn restaging_replaces_in_place() {
        let mut batch = AdjustmentBatch::new();
        let a = stock("A", 10);
        let b = stock("B", 4);

        batch.stage(&a, request(&a, AdjustmentDirection::Salida, 3, "ajuste")).unwrap();
        batch.stage(&b, request(&b, AdjustmentDirection::Entrada, 1, "ajuste")).unwrap();
        batch.stage(&a, request(&a, AdjustmentDirection::Salida, 4, "ajuste")).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.lines()[0].stock_id, a.stock_id);
        assert_eq!(batch.lines()[0].resulting, StockQuantity::from(6));
        assert_eq!(batch.lines()[1].stock_id, b.stock_id);
    }

    #[test]
    fn stage_rejects_mismatched_stock_row() {
        let mut batch = AdjustmentBatch::new();
        let a = stock("A", 10);
        let b = stock("B", 10);

        let err = batch
            .stage(&b, request(&a, AdjustmentDirection::Entrada, 1, "ajuste"))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert!(batch.is_empty());
    }

    #[test]
    fn remove_and_submittable() {
        let mut batch = AdjustmentBatch::new();
        assert!(batch.ensure_submittable().is_err());

        let a = stock("A", 1);
        batch.stage(&a, request(&a, AdjustmentDirection::Entrada, 2, "ajuste")).unwrap();
        assert!(batch.ensure_submittable().is_ok());
        assert!(batch.get(a.stock_id).is_some());

        let removed = batch.remove(a.stock_id).unwrap();
        assert_eq!(removed.resulting, StockQuantity::from(3));
        assert!(batch.remove(a.stock_id).is_none());
        assert!(batch.is_empty());
    }
}
