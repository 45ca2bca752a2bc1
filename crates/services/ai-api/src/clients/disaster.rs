//! Safety data portal client for disaster text messages.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use common::{AppError, AppResult};

/// Messages requested per lookup
const ROWS_PER_LOOKUP: &str = "5";

/// Disaster messages issued for a region, as the portal publishes them.
#[async_trait]
pub trait DisasterSource: Send + Sync {
    /// Message items for `region` created on `date`
    async fn messages(&self, region: &str, date: NaiveDate) -> AppResult<Vec<Value>>;
}

/// Message items of a portal response, found under `response.body.items`,
/// `body.items` or a bare `body` array. Items are returned untouched; only
/// non-objects are dropped.
pub fn extract_items(body: &Value) -> Vec<Value> {
    let items = ["/response/body/items", "/body/items", "/body"]
        .iter()
        .find_map(|path| body.pointer(path).filter(|v| !v.is_null()));

    let list = match items {
        Some(Value::Array(list)) => list.clone(),
        Some(Value::Object(obj)) => match obj.get("item") {
            Some(Value::Array(list)) => list.clone(),
            Some(single @ Value::Object(_)) => vec![single.clone()],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    list.into_iter().filter(Value::is_object).collect()
}

/// reqwest implementation of [`DisasterSource`].
pub struct SafetyDataClient {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
}

impl SafetyDataClient {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build disaster client: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl DisasterSource for SafetyDataClient {
    async fn messages(&self, region: &str, date: NaiveDate) -> AppResult<Vec<Value>> {
        let created = date.format("%Y%m%d").to_string();
        let response = self
            .http_client
            .get(&self.url)
            .query(&[
                ("serviceKey", self.api_key.as_str()),
                ("returnType", "json"),
                ("pageNo", "1"),
                ("numOfRows", ROWS_PER_LOOKUP),
                ("rgnNm", region),
                ("crtDt", created.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::upstream(format!("Disaster API request failed: {}", e)))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Unexpected disaster response: {}", e)))?;

        Ok(extract_items(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_items_array_kept_verbatim() {
        let body = json!({"response": {"body": {"items": [
            {"SN": "1001", "MSG_CN": "호우경보", "REG_YMD": "2025-02-10"},
            "noise"
        ]}}});
        let items = extract_items(&body);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["REG_YMD"], "2025-02-10");
        assert_eq!(items[0]["SN"], "1001");
    }

    #[test]
    fn test_bare_body_array() {
        let body = json!({
            "header": {"resultCode": "00"},
            "body": [{"SN": 1002, "MSG_CN": "한파주의보", "DST_SE_NM": "한파"}]
        });

        assert_eq!(extract_items(&body).len(), 1);
    }

    #[test]
    fn test_single_item_object() {
        let body = json!({"body": {"items": {"item": {"SN": 3, "MSG_CN": "안내"}}}});

        assert_eq!(extract_items(&body), vec![json!({"SN": 3, "MSG_CN": "안내"})]);
    }

    #[test]
    fn test_without_items() {
        assert!(extract_items(&json!({"response": {"body": {}}})).is_empty());
        assert!(extract_items(&Value::Null).is_empty());
    }
}
