//! HTTP access to the remote inventory service.
//!
//! One request per call: a rejected or failed submission is returned to the
//! caller as-is, never retried here.

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use retailops_core::StockId;
use retailops_inventory::{AdjustmentBatch, StockLevel};

use crate::config::ClientConfig;
use crate::dto::{AdjustmentAck, ErrorBody, StockLevelDto, StockSearchResponse, SubmitAdjustmentsRequest};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("not found")]
    NotFound,
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Text suitable for an operator-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Could not reach the inventory service. Check the connection and try again.".to_string()
            }
            ApiError::Rejected { status, message } if *status == 401 || *status == 403 => {
                format!("Not allowed to perform this adjustment: {message}")
            }
            ApiError::Rejected { status, message } if (400..500).contains(status) => {
                format!("The adjustment was rejected: {message}")
            }
            ApiError::Rejected { message, .. } => {
                format!("The inventory service failed to process the adjustment: {message}")
            }
            ApiError::NotFound => "The selected stock item no longer exists.".to_string(),
            ApiError::Parse(_) => "The inventory service sent an unexpected response.".to_string(),
        }
    }
}

/// Operations the adjustment session needs from the inventory service.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    async fn fetch_stock(&self, stock_id: StockId) -> Result<StockLevel, ApiError>;

    async fn search_stock(&self, query: &str) -> Result<Vec<StockLevel>, ApiError>;

    /// Send the whole batch in one request. Any non-2xx rejects every line.
    async fn submit_adjustments(&self, batch: &AdjustmentBatch) -> Result<AdjustmentAck, ApiError>;
}

/// `reqwest`-backed gateway.
#[derive(Debug, Clone)]
pub struct HttpInventoryGateway {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl HttpInventoryGateway {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url().to_string(),
            token: config.token.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = self
            .authorize(req)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        Err(rejection(resp).await)
    }
}

/// Turn a non-2xx response into `ApiError::Rejected`, decoding the error body when possible.
async fn rejection(resp: reqwest::Response) -> ApiError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.summary())
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text.trim().to_string()
            }
        });

    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl InventoryGateway for HttpInventoryGateway {
    async fn fetch_stock(&self, stock_id: StockId) -> Result<StockLevel, ApiError> {
        let url = format!("{}/inventory/stock/{}", self.api_url, stock_id);
        let resp = match self.send(self.client.get(&url)).await {
            Err(ApiError::Rejected { status: 404, .. }) => return Err(ApiError::NotFound),
            other => other?,
        };

        let dto: StockLevelDto = resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))?;
        dto.into_domain().map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn search_stock(&self, query: &str) -> Result<Vec<StockLevel>, ApiError> {
        let url = format!("{}/inventory/stock", self.api_url);
        let resp = self.send(self.client.get(&url).query(&[("q", query)])).await?;

        let body: StockSearchResponse = resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))?;
        body.items
            .into_iter()
            .map(|dto| dto.into_domain().map_err(|e| ApiError::Parse(e.to_string())))
            .collect()
    }

    async fn submit_adjustments(&self, batch: &AdjustmentBatch) -> Result<AdjustmentAck, ApiError> {
        let url = format!("{}/inventory/adjustments", self.api_url);
        let body = SubmitAdjustmentsRequest::from_batch(batch, Utc::now());

        tracing::info!(lines = body.lines.len(), "submitting adjustment batch");

        let resp = match self.send(self.client.post(&url).json(&body)).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "adjustment batch not accepted");
                return Err(e);
            }
        };

        // The service has accepted the batch once it answers 2xx, whatever the body says.
        let status = resp.status().as_u16();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(status, error = %e, "could not read acknowledgement body; batch was accepted");
                String::new()
            }
        };

        let ack = match AdjustmentAck::from_body(&text) {
            Ok(ack) => ack,
            Err(e) => {
                tracing::warn!(status, error = %e, "acknowledgement is not a JSON object; batch was accepted");
                AdjustmentAck::with_message(text.trim())
            }
        };
        tracing::info!(batch_id = ?ack.id(), "adjustment batch acknowledged");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_by_failure_kind() {
        let network = ApiError::Network("connection refused".to_string());
        assert!(network.user_message().contains("Could not reach"));

        let forbidden = ApiError::Rejected {
            status: 403,
            message: "missing permission".to_string(),
        };
        assert_eq!(
            forbidden.user_message(),
            "Not allowed to perform this adjustment: missing permission"
        );

        let invalid = ApiError::Rejected {
            status: 422,
            message: "reason is required".to_string(),
        };
        assert_eq!(invalid.user_message(), "The adjustment was rejected: reason is required");

        let server = ApiError::Rejected {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(server.user_message().starts_with("The inventory service failed"));
    }

    #[test]
    fn gateway_uses_configured_url() {
        let cfg = ClientConfig::new("http://127.0.0.1:9/").unwrap();
        let gw = HttpInventoryGateway::new(&cfg).unwrap();
        assert_eq!(gw.api_url(), "http://127.0.0.1:9");
    }
}
