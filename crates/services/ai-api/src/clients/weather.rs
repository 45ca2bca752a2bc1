//! KMA ultra-short-term forecast client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Semaphore;

use common::{retry_with_backoff, AppError, AppResult, RetryPolicy};
use domain::weather::{forecast_base, kst_now};
use domain::{GridPoint, WeatherCodes};

/// Concurrent forecast requests allowed against the KMA API
pub const MAX_CONCURRENT_REQUESTS: usize = 10;

/// Rows requested per forecast (every category for six hours)
const ROWS_PER_FORECAST: &str = "60";

/// Forecast lookup by KMA grid coordinates.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn forecast(&self, grid: GridPoint) -> AppResult<WeatherCodes>;
}

#[derive(Debug, Deserialize)]
struct ForecastEnvelope {
    response: ForecastResponse,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    body: Option<ForecastBody>,
}

#[derive(Debug, Deserialize)]
struct ForecastBody {
    items: ForecastItems,
}

#[derive(Debug, Deserialize)]
struct ForecastItems {
    #[serde(default)]
    item: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    category: String,
    #[serde(rename = "fcstValue")]
    value: String,
}

/// Parse a forecast response body into weather codes.
pub fn parse_forecast(body: &str) -> AppResult<WeatherCodes> {
    let envelope: ForecastEnvelope = serde_json::from_str(body)
        .map_err(|e| AppError::upstream(format!("Unexpected forecast response: {}", e)))?;
    let items = envelope
        .response
        .body
        .map(|b| b.items.item)
        .unwrap_or_default();
    if items.is_empty() {
        return Err(AppError::upstream("Forecast response has no items"));
    }

    Ok(WeatherCodes::from_items(
        items.iter().map(|i| (i.category.as_str(), i.value.as_str())),
    ))
}

/// reqwest implementation of [`WeatherSource`].
pub struct KmaClient {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
    permits: Arc<Semaphore>,
    retry: RetryPolicy,
}

impl KmaClient {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build weather client: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.into(),
            api_key: api_key.into(),
            permits: Arc::new(Semaphore::new(MAX_CONCURRENT_REQUESTS)),
            retry: RetryPolicy::default(),
        })
    }

    async fn request(
        &self,
        grid: GridPoint,
        base_date: &str,
        base_time: &str,
    ) -> Result<String, reqwest::Error> {
        let nx = grid.x.to_string();
        let ny = grid.y.to_string();
        self.http_client
            .get(&self.url)
            .query(&[
                ("serviceKey", self.api_key.as_str()),
                ("pageNo", "1"),
                ("numOfRows", ROWS_PER_FORECAST),
                ("dataType", "JSON"),
                ("base_date", base_date),
                ("base_time", base_time),
                ("nx", nx.as_str()),
                ("ny", ny.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl WeatherSource for KmaClient {
    async fn forecast(&self, grid: GridPoint) -> AppResult<WeatherCodes> {
        let (base_date, base_time) = forecast_base(kst_now());
        tracing::debug!(x = grid.x, y = grid.y, %base_date, %base_time, "Requesting forecast");

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AppError::internal(format!("Weather semaphore closed: {}", e)))?;

        let body = retry_with_backoff(
            &self.retry,
            "weather_forecast",
            |e: &reqwest::Error| e.is_timeout(),
            || self.request(grid, &base_date, &base_time),
        )
        .await
        .map_err(|e| AppError::upstream(format!("Weather API request failed: {}", e)))?;

        parse_forecast(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forecast_items() {
        let body = r#"{"response": {"header": {"resultCode": "00"}, "body": {"items": {"item": [
            {"category": "LGT", "fcstValue": "0"},
            {"category": "PTY", "fcstValue": "0"},
            {"category": "REH", "fcstValue": "55"},
            {"category": "SKY", "fcstValue": "3"},
            {"category": "T1H", "fcstValue": "-2"},
            {"category": "T1H", "fcstValue": "-1"}
        ]}}}}"#;
        let codes = parse_forecast(body).unwrap();

        assert_eq!(codes.temperature, "-2");
        assert_eq!(codes.sky, "3");
        assert_eq!(codes.precipitation, "0");
        assert_eq!(codes.humidity, "55");
    }

    #[test]
    fn test_parse_forecast_error_response() {
        let body = r#"{"response": {"header": {"resultCode": "03", "resultMsg": "NO_DATA"}}}"#;
        assert!(parse_forecast(body).is_err());
        assert!(parse_forecast("<OpenAPI_ServiceResponse/>").is_err());
    }
}
