//! Inventory adjustment domain module.
//!
//! This crate contains the business rules for adjusting stock held at a
//! warehouse, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage). The client crate fetches stock rows and submits the
//! batches built here.

pub mod batch;
pub mod calculator;
pub mod direction;
pub mod quantity;
pub mod reason;
pub mod request;
pub mod stock;

pub use batch::{AdjustmentBatch, AdjustmentLine};
pub use calculator::{AdjustmentOutcome, adjust, adjust_detailed};
pub use direction::AdjustmentDirection;
pub use quantity::StockQuantity;
pub use reason::{ReasonCode, ReasonKind};
pub use request::{AdjustmentDraft, AdjustmentRequest};
pub use stock::StockLevel;
