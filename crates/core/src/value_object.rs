//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. A stock quantity of `12.5` is the same quantity wherever
//! it appears, while a stock row is an entity keyed by its `StockId`.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one (e.g. the calculator returns a fresh quantity rather than
/// mutating the current one).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct ReasonCode(String);
///
/// impl ValueObject for ReasonCode {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
