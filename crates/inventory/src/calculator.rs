//! Stock adjustment calculator.
//!
//! Pure arithmetic: given the quantity currently held, a direction and a
//! non-negative delta, produce the resulting quantity. Salida floors at zero
//! instead of failing; `adjust_detailed` reports how much the floor discarded.

use crate::direction::AdjustmentDirection;
use crate::quantity::StockQuantity;

/// Result of a detailed adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AdjustmentOutcome {
    pub resulting: StockQuantity,
    /// Amount requested beyond what was held (zero unless a salida was clamped).
    pub shortfall: StockQuantity,
}

impl AdjustmentOutcome {
    pub fn was_clamped(&self) -> bool {
        !self.shortfall.is_zero()
    }
}

/// Compute the quantity left after applying `delta` in `direction`.
///
/// - entrada: `current + delta`
/// - salida: `max(0, current - delta)`
pub fn adjust(
    current: StockQuantity,
    direction: AdjustmentDirection,
    delta: StockQuantity,
) -> StockQuantity {
    adjust_detailed(current, direction, delta).resulting
}

/// Same as [`adjust`], also reporting the shortfall dropped by the zero floor.
pub fn adjust_detailed(
    current: StockQuantity,
    direction: AdjustmentDirection,
    delta: StockQuantity,
) -> AdjustmentOutcome {
    let current_value = current.value();
    let delta_value = delta.value();

    match direction {
        AdjustmentDirection::Entrada => AdjustmentOutcome {
            resulting: StockQuantity::clamped(current_value.saturating_add(delta_value)),
            shortfall: StockQuantity::ZERO,
        },
        AdjustmentDirection::Salida => {
            let raw = current_value.saturating_sub(delta_value);
            AdjustmentOutcome {
                resulting: StockQuantity::clamped(raw),
                shortfall: StockQuantity::clamped(-raw),
            }
        }
    }
}
