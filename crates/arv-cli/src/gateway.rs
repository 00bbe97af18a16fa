//! # Gateway receipt retrieval
//!
//! Thin HTTP client for the one gateway endpoint this tool consumes:
//! `GET {base}/receipts/{id}`. The gateway issues and stores receipts;
//! nothing here implements or trusts any of its endpoints beyond
//! decoding the returned JSON into a [`Receipt`]. Trust comes from the
//! verification pipeline, never from transport.

use std::time::Duration;

use arv_core::Receipt;
use thiserror::Error;

/// Bound on a single gateway request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error while retrieving a receipt from the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("gateway returned {status} for {url}")]
    Status {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The requested URL.
        url: String,
    },

    /// The response body is not a receipt document.
    #[error("gateway response is not a receipt: {0}")]
    Decode(String),
}

/// Blocking client for the gateway's receipt endpoint.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl GatewayClient {
    /// Build a client against a gateway base address.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Retrieve a receipt by id.
    pub fn receipt(&self, receipt_id: &str) -> Result<Receipt, GatewayError> {
        let url = self.receipt_url(receipt_id);
        tracing::debug!(%url, "fetching receipt from gateway");
        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status { status, url });
        }
        let value: serde_json::Value = response.json()?;
        Receipt::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn receipt_url(&self, receipt_id: &str) -> String {
        format!(
            "{}/receipts/{receipt_id}",
            self.base_url.trim_end_matches('/')
        )
    }
}
