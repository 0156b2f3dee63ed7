//! `retailops-client`
//!
//! **Responsibility:** operator-side access to the remote inventory service.
//!
//! This crate provides:
//! - Configuration from the environment
//! - An HTTP gateway for fetching stock rows and submitting adjustment batches
//! - An adjustment session owning the pending batch of one operator screen
//! - The `retailops` command-line front end
//!
//! The remote service remains the authority: nothing is persisted locally and
//! a rejected batch is left in place for the operator to fix and resubmit.

pub mod api;
pub mod cli;
pub mod config;
pub mod dto;
pub mod session;

pub use api::{ApiError, HttpInventoryGateway, InventoryGateway};
pub use config::{ClientConfig, ConfigError};
pub use dto::AdjustmentAck;
pub use session::{AdjustmentSession, Notification, NotificationLevel, SearchTicket, SessionError};
