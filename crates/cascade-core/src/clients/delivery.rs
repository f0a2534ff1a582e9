//! Outbound HTTP sender used for webhook deliveries

use crate::error::{CascadeError, Result};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Response to one delivery attempt that reached the endpoint.
/// Non-2xx statuses are returned here, not as errors; only transport
/// failures surface as `CascadeError::Delivery`.
#[derive(Debug, Clone)]
pub struct DeliveryResponse {
    pub status: u16,
    pub body: String,
    pub duration: Duration,
}

impl DeliveryResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam for webhook delivery so tests can substitute a mock sender
#[async_trait]
pub trait DeliverySender: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        payload: &Value,
    ) -> Result<DeliveryResponse>;
}

pub struct HttpDeliverySender {
    http_client: HttpClient,
}

impl HttpDeliverySender {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CascadeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl DeliverySender for HttpDeliverySender {
    async fn post_json(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        payload: &Value,
    ) -> Result<DeliveryResponse> {
        let started = Instant::now();

        let mut request = self
            .http_client
            .post(url)
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .json(payload)
            .send()
            .await
            .map_err(|e| CascadeError::Delivery(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(DeliveryResponse {
            status,
            body,
            duration: started.elapsed(),
        })
    }
}
