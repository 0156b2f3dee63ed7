use serde::{Deserialize, Serialize};

use retailops_core::{Entity, ProductId, StockId, WarehouseId};

use crate::calculator::{AdjustmentOutcome, adjust_detailed};
use crate::direction::AdjustmentDirection;
use crate::quantity::StockQuantity;

/// A product's stock at one warehouse, as last fetched from the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub stock_id: StockId,
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub product_name: String,
    pub quantity: StockQuantity,
}

impl StockLevel {
    /// What this row would hold after the adjustment. Does not modify the row.
    pub fn preview(&self, direction: AdjustmentDirection, delta: StockQuantity) -> AdjustmentOutcome {
        adjust_detailed(self.quantity, direction, delta)
    }
}

impl Entity for StockLevel {
    type Id = StockId;

    fn id(&self) -> &Self::Id {
        &self.stock_id
    }
}
