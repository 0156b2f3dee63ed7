use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use retailops_core::{DomainResult, ProductId, StockId, WarehouseId};
use retailops_inventory::{AdjustmentBatch, AdjustmentDirection, AdjustmentLine, StockLevel, StockQuantity};

// -------------------------
// Response DTOs
// -------------------------

/// Stock row as returned by `GET /inventory/stock/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevelDto {
    pub id: StockId,
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    #[serde(default)]
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
}

impl StockLevelDto {
    pub fn into_domain(self) -> DomainResult<StockLevel> {
        Ok(StockLevel {
            stock_id: self.id,
            product_id: self.product_id,
            warehouse_id: self.warehouse_id,
            product_name: self.product_name,
            quantity: StockQuantity::new(self.quantity)?,
        })
    }
}

impl From<&StockLevel> for StockLevelDto {
    fn from(level: &StockLevel) -> Self {
        Self {
            id: level.stock_id,
            product_id: level.product_id,
            warehouse_id: level.warehouse_id,
            product_name: level.product_name.clone(),
            quantity: level.quantity.value(),
        }
    }
}

/// Body of `GET /inventory/stock?q=...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSearchResponse {
    pub items: Vec<StockLevelDto>,
}

/// Acknowledgement of an accepted adjustment batch.
///
/// The service may send any JSON object; every field is kept as-is and read
/// through the accessors, so an unexpected type never fails decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjustmentAck {
    pub fields: BTreeMap<String, Value>,
}

impl AdjustmentAck {
    /// Decode a 2xx body. An empty body is an empty acknowledgement.
    pub fn from_body(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text)
    }

    /// Acknowledgement carrying only a message.
    pub fn with_message(message: impl Into<String>) -> Self {
        let mut ack = Self::default();
        ack.fields.insert("message".to_string(), Value::String(message.into()));
        ack
    }

    /// Number of lines the service reports as accepted, when it sends a count.
    pub fn accepted(&self) -> Option<u64> {
        self.fields.get("accepted")?.as_u64()
    }

    pub fn message(&self) -> Option<String> {
        match self.fields.get("message")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::String(_) | Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Identifier the service assigned to the batch, if it sent one.
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Error body sent with non-2xx responses.
///
/// Covers both `{ "error": code, "message": text }` and field-level
/// validation maps (`{ "errors": { "field": ["text"] } }`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    /// Best human-readable summary of the body.
    pub fn summary(&self) -> Option<String> {
        let field_errors: Vec<&str> = self
            .errors
            .values()
            .filter_map(|msgs| msgs.first())
            .map(String::as_str)
            .collect();

        match (&self.message, field_errors.is_empty()) {
            (Some(msg), true) => Some(msg.clone()),
            (Some(msg), false) => Some(format!("{msg}: {}", field_errors.join("; "))),
            (None, false) => Some(field_errors.join("; ")),
            (None, true) => self.error.clone(),
        }
    }
}

// -------------------------
// Request DTOs
// -------------------------

/// One line of `POST /inventory/adjustments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentLineDto {
    pub stock_id: StockId,
    pub direction: AdjustmentDirection,
    #[serde(with = "rust_decimal::serde::float")]
    pub delta: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub resulting_quantity: Decimal,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&AdjustmentLine> for AdjustmentLineDto {
    fn from(line: &AdjustmentLine) -> Self {
        Self {
            stock_id: line.stock_id,
            direction: line.direction,
            delta: line.delta.value(),
            resulting_quantity: line.resulting.value(),
            reason: line.reason.as_str().to_string(),
            note: line.note.clone(),
        }
    }
}

/// Body of `POST /inventory/adjustments`: the whole pending batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitAdjustmentsRequest {
    pub submitted_at: DateTime<Utc>,
    pub lines: Vec<AdjustmentLineDto>,
}

impl SubmitAdjustmentsRequest {
    pub fn from_batch(batch: &AdjustmentBatch, submitted_at: DateTime<Utc>) -> Self {
        Self {
            submitted_at,
            lines: batch.lines().iter().map(AdjustmentLineDto::from).collect(),
        }
    }
}
