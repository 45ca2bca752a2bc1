//! Public disaster messages (재난문자) from the safety data portal.

use serde::{Deserialize, Deserializer, Serialize};

use crate::notification::NotificationGrade;

/// One disaster text message as published by the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DisasterMessage {
    /// Serial number, unique per message
    #[serde(rename = "SN", deserialize_with = "number_or_string")]
    pub serial: i64,
    #[serde(rename = "MSG_CN", default)]
    pub content: String,
    #[serde(rename = "EMRG_STEP_NM", default)]
    pub emergency_step: Option<String>,
    #[serde(rename = "DST_SE_NM", default)]
    pub disaster_type: Option<String>,
    #[serde(rename = "RCPTN_RGN_NM", default)]
    pub region: Option<String>,
    #[serde(rename = "CRT_DT", default)]
    pub created_at: Option<String>,
}

impl DisasterMessage {
    pub fn grade(&self) -> NotificationGrade {
        self.emergency_step
            .as_deref()
            .map(NotificationGrade::from_disaster_step)
            .unwrap_or(NotificationGrade::Info)
    }

    /// Text stored in a family notification.
    pub fn describe(&self) -> String {
        match &self.disaster_type {
            Some(kind) if !kind.is_empty() => format!("[{}] {}", kind, self.content),
            _ => self.content.clone(),
        }
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_portal_item() {
        let raw = r#"{
            "SN": "218004",
            "MSG_CN": "한파주의보 발효 중",
            "EMRG_STEP_NM": "긴급재난",
            "DST_SE_NM": "한파",
            "RCPTN_RGN_NM": "서울특별시 전체",
            "CRT_DT": "2025/02/03 07:10:00",
            "REG_YMD": "2025-02-03"
        }"#;
        let message: DisasterMessage = serde_json::from_str(raw).unwrap();

        assert_eq!(message.serial, 218004);
        assert_eq!(message.grade(), NotificationGrade::Warn);
        assert_eq!(message.describe(), "[한파] 한파주의보 발효 중");
    }

    #[test]
    fn test_numeric_serial_and_missing_step() {
        let message: DisasterMessage =
            serde_json::from_str(r#"{"SN": 7, "MSG_CN": "안내"}"#).unwrap();
        assert_eq!(message.serial, 7);
        assert_eq!(message.grade(), NotificationGrade::Info);
    }
}
