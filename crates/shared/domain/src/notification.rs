//! Family notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationGrade {
    Info,
    Warn,
    Crit,
    #[default]
    None,
}

impl NotificationGrade {
    pub fn parse(value: &str) -> DomainResult<Self> {
        match value.to_ascii_uppercase().as_str() {
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "CRIT" => Ok(Self::Crit),
            "NONE" => Ok(Self::None),
            _ => Err(DomainError::invalid(
                "Invalid value provided for notification grade",
            )),
        }
    }

    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Crit => "CRIT",
            Self::None => "NONE",
        }
    }

    /// Grade for a public disaster message, keyed by its emergency step name.
    pub fn from_disaster_step(step: &str) -> Self {
        match step.trim() {
            "위급재난" => Self::Crit,
            "긴급재난" => Self::Warn,
            _ => Self::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Notification {
    pub index: i32,
    pub family_id: String,
    pub created_at: DateTime<Utc>,
    pub notification_grade: NotificationGrade,
    pub description: String,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_sn: Option<i64>,
}

/// A notification about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub family_id: String,
    pub notification_grade: NotificationGrade,
    pub description: String,
    pub message_sn: Option<i64>,
}

/// Time order of list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_parse() {
        assert_eq!(NotificationGrade::parse("crit").unwrap(), NotificationGrade::Crit);
        assert_eq!(NotificationGrade::parse("NONE").unwrap(), NotificationGrade::None);
        assert!(NotificationGrade::parse("urgent").is_err());
        assert_eq!(NotificationGrade::default(), NotificationGrade::None);
    }

    #[test]
    fn test_disaster_step_mapping() {
        assert_eq!(NotificationGrade::from_disaster_step("위급재난"), NotificationGrade::Crit);
        assert_eq!(NotificationGrade::from_disaster_step("긴급재난"), NotificationGrade::Warn);
        assert_eq!(NotificationGrade::from_disaster_step("안전안내"), NotificationGrade::Info);
    }

    #[test]
    fn test_sort_order_from_query_value() {
        let order: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, SortOrder::Desc);
    }
}
