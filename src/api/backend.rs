use serde_json::Value;
use std::sync::Arc;

use super::fetcher::ResilientFetcher;
use super::transport::HttpRequest;
use super::types::CanonicalOrderPayload;

#[derive(Debug, Clone, PartialEq)]
pub enum ForwardOutcome {
    Accepted,
    /// Backend answered without `"success": true`; holds the full acknowledgment.
    Rejected(Value),
    /// Backend answered with a body that is not JSON.
    Malformed,
    /// The request never got a usable response.
    Dropped,
}

pub struct OrderForwarder {
    fetcher: Arc<ResilientFetcher>,
    endpoint: String,
}

impl OrderForwarder {
    pub fn new(fetcher: Arc<ResilientFetcher>, backend_url: &str) -> Self {
        Self {
            fetcher,
            endpoint: format!("{}/order", backend_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn forward(&self, payload: &CanonicalOrderPayload) -> ForwardOutcome {
        let body = match serde_json::to_value(payload) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("❌ Failed to encode order {}: {}", payload.order_hash, e);
                return ForwardOutcome::Dropped;
            }
        };

        let response = match self.fetcher.fetch(&HttpRequest::post_json(&self.endpoint, body)).await {
            Ok(response) => response,
            Err(_) => return ForwardOutcome::Dropped,
        };

        match response.json::<Value>() {
            Ok(ack) if ack.get("success").and_then(Value::as_bool) == Some(true) => {
                tracing::info!(
                    "✅ Saved token {} ({} ETH)",
                    payload.token_id,
                    payload.price
                );
                ForwardOutcome::Accepted
            }
            Ok(ack) => {
                tracing::warn!("⛔ Backend rejected order {}: {}", payload.order_hash, ack);
                ForwardOutcome::Rejected(ack)
            }
            Err(e) => {
                tracing::error!("❌ Backend JSON error for order {}: {}", payload.order_hash, e);
                ForwardOutcome::Malformed
            }
        }
    }
}
