//! Adjustment session: the state behind one operator screen.
//!
//! A session owns its pending batch and its latest stock search. Nothing is
//! shared between sessions and nothing is persisted; a failed submission leaves
//! the batch exactly as it was so the operator can correct it and resubmit.

use thiserror::Error;

use retailops_core::{DomainError, StockId};
use retailops_inventory::{AdjustmentBatch, AdjustmentDraft, AdjustmentLine, StockLevel};

use crate::api::{ApiError, InventoryGateway};
use crate::dto::AdjustmentAck;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Domain(DomainError::Validation(msg)) => capitalize(msg),
            SessionError::Domain(e) => capitalize(&e.to_string()),
            SessionError::Api(e) => e.user_message(),
        }
    }
}

fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// Message to show the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn submitted(ack: &AdjustmentAck, lines: usize) -> Self {
        let message = match (ack.message(), ack.id()) {
            (Some(msg), _) => msg,
            (None, Some(id)) => format!("{lines} adjustment(s) recorded (batch {id})"),
            (None, None) => format!("{lines} adjustment(s) recorded"),
        };
        Self {
            level: NotificationLevel::Success,
            message,
        }
    }

    pub fn from_error(err: &SessionError) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: err.user_message(),
        }
    }

    /// Warning for a salida that asked for more than was on hand.
    pub fn for_line(line: &AdjustmentLine) -> Option<Self> {
        let shortfall = line.shortfall();
        if shortfall.is_zero() {
            return None;
        }
        Some(Self {
            level: NotificationLevel::Warning,
            message: format!(
                "{}: only {} on hand; {} more than available was requested and the new quantity is 0",
                line.product_name, line.previous, shortfall
            ),
        })
    }
}

/// Handle for one issued search; only the latest ticket may update results.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
}

pub struct AdjustmentSession<G> {
    gateway: G,
    batch: AdjustmentBatch,
    results: Vec<StockLevel>,
    search_generation: u64,
}

impl<G: InventoryGateway> AdjustmentSession<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            batch: AdjustmentBatch::new(),
            results: Vec::new(),
            search_generation: 0,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn batch(&self) -> &AdjustmentBatch {
        &self.batch
    }

    pub fn results(&self) -> &[StockLevel] {
        &self.results
    }

    /// Start a search; any earlier ticket becomes stale.
    pub fn begin_search(&mut self) -> SearchTicket {
        self.search_generation += 1;
        SearchTicket {
            generation: self.search_generation,
        }
    }

    /// Apply a search outcome if `ticket` is still the latest one.
    ///
    /// Returns whether the results were applied.
    pub fn finish_search(&mut self, ticket: SearchTicket, results: Vec<StockLevel>) -> bool {
        if ticket.generation != self.search_generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.search_generation,
                "ignoring stale search results"
            );
            return false;
        }
        self.results = results;
        true
    }

    /// Search stock rows and make them the current results.
    pub async fn search(&mut self, query: &str) -> Result<&[StockLevel], SessionError> {
        let ticket = self.begin_search();
        let found = self.gateway.search_stock(query.trim()).await?;
        self.finish_search(ticket, found);
        Ok(&self.results)
    }

    /// Validate a draft and stage it in the pending batch.
    ///
    /// The stock row comes from the current search results when present,
    /// otherwise it is fetched so the resulting quantity is computed from the
    /// service's figure.
    pub async fn stage(&mut self, draft: AdjustmentDraft) -> Result<&AdjustmentLine, SessionError> {
        let request = draft.into_request()?;

        let stock = match self.results.iter().find(|s| s.stock_id == request.stock_id()) {
            Some(stock) => stock.clone(),
            None => self.gateway.fetch_stock(request.stock_id()).await?,
        };

        Ok(self.batch.stage(&stock, request)?)
    }

    pub fn remove(&mut self, stock_id: StockId) -> Option<AdjustmentLine> {
        self.batch.remove(stock_id)
    }

    /// Send the pending batch in one request.
    ///
    /// On success the batch is cleared; on failure it is left untouched.
    pub async fn submit(&mut self) -> Result<AdjustmentAck, SessionError> {
        self.batch.ensure_submittable()?;

        let ack = self.gateway.submit_adjustments(&self.batch).await?;
        tracing::info!(lines = self.batch.len(), "adjustment batch submitted");
        self.batch.clear();
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use retailops_core::{ProductId, WarehouseId};
    use retailops_inventory::{AdjustmentDirection, StockQuantity};

    #[derive(Default)]
    struct FakeGateway {
        stock: Vec<StockLevel>,
        reject_with: Option<u16>,
        fetches: Mutex<usize>,
        submitted: Mutex<Vec<AdjustmentBatch>>,
    }

    #[async_trait]
    impl InventoryGateway for FakeGateway {
        async fn fetch_stock(&self, stock_id: StockId) -> Result<StockLevel, ApiError> {
            *self.fetches.lock().unwrap() += 1;
            self.stock
                .iter()
                .find(|s| s.stock_id == stock_id)
                .cloned()
                .ok_or(ApiError::NotFound)
        }

        async fn search_stock(&self, query: &str) -> Result<Vec<StockLevel>, ApiError> {
            Ok(self
                .stock
                .iter()
                .filter(|s| s.product_name.to_lowercase().contains(&query.to_lowercase()))
                .cloned()
                .collect())
        }

        async fn submit_adjustments(&self, batch: &AdjustmentBatch) -> Result<AdjustmentAck, ApiError> {
            if let Some(status) = self.reject_with {
                return Err(ApiError::Rejected {
                    status,
                    message: "rejected".to_string(),
                });
            }
            self.submitted.lock().unwrap().push(batch.clone());
            let mut ack = AdjustmentAck::default();
            ack.fields
                .insert("accepted".to_string(), serde_json::json!(batch.len()));
            Ok(ack)
        }
    }

    fn level(name: &str, qty: u32) -> StockLevel {
        StockLevel {
            stock_id: StockId::new(),
            product_id: ProductId::new(),
            warehouse_id: WarehouseId::new(),
            product_name: name.to_string(),
            quantity: StockQuantity::from(qty),
        }
    }

    fn draft(stock: &StockLevel, direction: AdjustmentDirection, delta: &str) -> AdjustmentDraft {
        AdjustmentDraft {
            stock_id: Some(stock.stock_id),
            direction,
            delta: delta.to_string(),
            reason: Some("ajuste".to_string()),
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn stage_uses_search_results_without_fetching() {
        let arroz = level("Arroz", 10);
        let gateway = FakeGateway {
            stock: vec![arroz.clone(), level("Frijol", 3)],
            ..FakeGateway::default()
        };
        let mut session = AdjustmentSession::new(gateway);

        let found = session.search("arr").await.unwrap();
        assert_eq!(found.len(), 1);

        let line = session
            .stage(draft(&arroz, AdjustmentDirection::Salida, "3"))
            .await
            .unwrap();
        assert_eq!(line.resulting, StockQuantity::from(7));
        assert_eq!(*session.gateway().fetches.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn stage_fetches_unknown_rows() {
        let sal = level("Sal", 2);
        let gateway = FakeGateway {
            stock: vec![sal.clone()],
            ..FakeGateway::default()
        };
        let mut session = AdjustmentSession::new(gateway);

        let line = session
            .stage(draft(&sal, AdjustmentDirection::Salida, "5"))
            .await
            .unwrap();
        assert_eq!(line.resulting, StockQuantity::ZERO);

        let warning = Notification::for_line(line).unwrap();
        assert_eq!(warning.level, NotificationLevel::Warning);
        assert_eq!(*session.gateway().fetches.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_is_not_staged() {
        let sal = level("Sal", 2);
        let mut session = AdjustmentSession::new(FakeGateway {
            stock: vec![sal.clone()],
            ..FakeGateway::default()
        });

        let err = session
            .stage(draft(&sal, AdjustmentDirection::Entrada, "abc"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Delta must be greater than zero");
        assert!(session.batch().is_empty());
    }

    #[tokio::test]
    async fn unknown_stock_surfaces_not_found() {
        let ghost = level("Fantasma", 1);
        let mut session = AdjustmentSession::new(FakeGateway::default());

        let err = session
            .stage(draft(&ghost, AdjustmentDirection::Entrada, "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Api(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn successful_submit_clears_batch() {
        let a = level("A", 1);
        let mut session = AdjustmentSession::new(FakeGateway {
            stock: vec![a.clone()],
            ..FakeGateway::default()
        });
        session.stage(draft(&a, AdjustmentDirection::Entrada, "4")).await.unwrap();

        let ack = session.submit().await.unwrap();
        assert_eq!(ack.accepted(), Some(1));
        assert!(session.batch().is_empty());

        let submitted = session.gateway().submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].lines()[0].resulting, StockQuantity::from(5));
    }

    #[tokio::test]
    async fn rejected_submit_keeps_batch_for_resubmission() {
        let a = level("A", 1);
        let mut session = AdjustmentSession::new(FakeGateway {
            stock: vec![a.clone()],
            reject_with: Some(422),
            ..FakeGateway::default()
        });
        session.stage(draft(&a, AdjustmentDirection::Entrada, "4")).await.unwrap();

        let err = session.submit().await.unwrap_err();
        let note = Notification::from_error(&err);
        assert_eq!(note.level, NotificationLevel::Error);
        assert_eq!(note.message, "The adjustment was rejected: rejected");
        assert_eq!(session.batch().len(), 1);
    }

    #[tokio::test]
    async fn empty_batch_is_not_sent() {
        let mut session = AdjustmentSession::new(FakeGateway::default());
        let err = session.submit().await.unwrap_err();
        assert!(matches!(err, SessionError::Domain(DomainError::Validation(_))));
        assert!(session.gateway().submitted.lock().unwrap().is_empty());
    }

    #[test]
    fn stale_search_results_are_ignored() {
        let mut session = AdjustmentSession::new(FakeGateway::default());

        let first = session.begin_search();
        let second = session.begin_search();

        assert!(session.finish_search(second, vec![level("Nuevo", 1)]));
        assert!(!session.finish_search(first, vec![level("Viejo", 1)]));
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].product_name, "Nuevo");
    }

    #[test]
    fn submitted_notification_mentions_batch() {
        let mut ack = AdjustmentAck::default();
        ack.fields.insert("id".to_string(), serde_json::json!("B-7"));
        assert_eq!(
            Notification::submitted(&ack, 2).message,
            "2 adjustment(s) recorded (batch B-7)"
        );
    }
}
