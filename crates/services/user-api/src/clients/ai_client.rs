//! HTTP client for the AI server's mental-state endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use common::{AppError, AppResult};

/// Mental-state generation delegated to the AI server.
#[async_trait]
pub trait MentalAnalysis: Send + Sync {
    /// Today's mental status of the family's main user
    async fn mental_status(&self, family_id: &str) -> AppResult<Value>;

    /// Report over the recent period of mental status rows
    async fn mental_report(&self, family_id: &str) -> AppResult<Value>;
}

/// reqwest implementation of [`MentalAnalysis`].
pub struct AiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build AI client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, path: &str, what: &str) -> AppResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Requesting AI server");

        let response = self.http_client.post(&url).send().await.map_err(|e| {
            tracing::warn!("AI server unreachable: {}", e);
            AppError::server(format!("Failed to request {} from AI server", what))
        })?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::NOT_FOUND => Err(AppError::not_found(upstream_message(
                &body,
                &format!("No data to generate {}", what),
            ))),
            s => {
                tracing::warn!(status = %s, "AI server returned an error: {}", body);
                Err(AppError::server(format!(
                    "Failed to request {} from AI server",
                    what
                )))
            }
        }
    }
}

/// Message carried by the AI server's error body, if any.
fn upstream_message(body: &Value, fallback: &str) -> String {
    body.pointer("/detail/message")
        .or_else(|| body.get("detail"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

#[async_trait]
impl MentalAnalysis for AiClient {
    async fn mental_status(&self, family_id: &str) -> AppResult<Value> {
        self.post(
            &format!("/generate-emotional-report/{}", family_id),
            "mental status",
        )
        .await
    }

    async fn mental_report(&self, family_id: &str) -> AppResult<Value> {
        self.post(
            &format!("/generate-mental-period-report/{}", family_id),
            "mental report",
        )
        .await
    }
}
