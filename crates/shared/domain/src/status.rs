//! Status reports collected from the care-bot device and the AI server.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::weather::kst;

/// Indoor environment readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HomeStatus {
    pub index: i32,
    pub family_id: String,
    pub reported_at: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub dust_level: Option<f64>,
    pub ethanol: Option<f64>,
    pub others: Option<String>,
}

/// Vital signs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthStatus {
    pub index: i32,
    pub family_id: String,
    pub reported_at: DateTime<Utc>,
    pub heart_rate: Option<f64>,
}

/// Activity summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ActiveStatus {
    pub index: i32,
    pub family_id: String,
    pub reported_at: DateTime<Utc>,
    pub score: Option<i32>,
    pub action: Option<String>,
    pub is_critical: Option<bool>,
    pub description: Option<String>,
}

/// Daily mental state derived from conversations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MentalStatus {
    pub index: i32,
    pub family_id: String,
    pub reported_at: DateTime<Utc>,
    pub score: i32,
    pub is_critical: bool,
    pub description: String,
}

impl MentalStatus {
    /// Calendar day of the reading in Korea.
    pub fn kst_date(&self) -> NaiveDate {
        self.reported_at.with_timezone(&kst()).date_naive()
    }
}

/// Aggregate over a period of mental status rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MentalReport {
    pub index: i32,
    pub family_id: String,
    pub reported_at: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub average_score: f64,
    pub critical_days: i32,
    pub best_day: Option<NaiveDate>,
    pub worst_day: Option<NaiveDate>,
    pub improvement_needed: bool,
    pub summary: String,
}

/// Average score below which a report flags the need for improvement
pub const MENTAL_SCORE_CONCERN: f64 = 50.0;

/// Numbers computed from the mental status rows of a period.
#[derive(Debug, Clone, PartialEq)]
pub struct MentalAggregate {
    pub average_score: f64,
    pub critical_days: i32,
    pub best_day: Option<NaiveDate>,
    pub worst_day: Option<NaiveDate>,
    pub improvement_needed: bool,
}

impl MentalAggregate {
    /// Aggregate rows. Returns `None` when there is nothing to aggregate.
    ///
    /// Ties for best and worst day resolve to the earliest row.
    pub fn from_statuses(rows: &[MentalStatus]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let total: i64 = rows.iter().map(|r| i64::from(r.score)).sum();
        let average_score = total as f64 / rows.len() as f64;

        let mut critical: Vec<NaiveDate> = rows
            .iter()
            .filter(|r| r.is_critical)
            .map(MentalStatus::kst_date)
            .collect();
        critical.sort();
        critical.dedup();
        let critical_days = critical.len() as i32;

        let mut best = &rows[0];
        let mut worst = &rows[0];
        for row in rows {
            if row.score > best.score {
                best = row;
            }
            if row.score < worst.score {
                worst = row;
            }
        }

        Some(Self {
            average_score,
            critical_days,
            best_day: Some(best.kst_date()),
            worst_day: Some(worst.kst_date()),
            improvement_needed: average_score < MENTAL_SCORE_CONCERN || critical_days > 0,
        })
    }
}

/// Mental state judged from one day of conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalAssessment {
    pub score: i32,
    pub is_critical: bool,
    pub description: String,
}

impl MentalAssessment {
    /// Read the JSON object embedded in a model answer. The score is
    /// clamped to 0..=100.
    pub fn parse(text: &str) -> Option<Self> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end < start {
            return None;
        }
        let mut assessment: Self = serde_json::from_str(&text[start..=end]).ok()?;
        assessment.score = assessment.score.clamp(0, 100);
        Some(assessment)
    }
}

/// The kinds of status data, used for list and lookup messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Home,
    Health,
    Active,
    Mental,
    MentalReport,
}

impl StatusKind {
    pub fn label(&self) -> &'static str {
        match self {
            StatusKind::Home => "home status",
            StatusKind::Health => "health status",
            StatusKind::Active => "active status",
            StatusKind::Mental => "mental status",
            StatusKind::MentalReport => "mental reports",
        }
    }

    /// Message for a non-empty list, e.g. "Home status retrieved successfully"
    pub fn retrieved_message(&self) -> String {
        format!("{} retrieved successfully", capitalize(self.label()))
    }

    /// Message for an empty list, e.g. "No home status found"
    pub fn empty_message(&self) -> String {
        format!("No {} found", self.label())
    }

    pub fn not_found_message(&self) -> String {
        format!("{} not found", capitalize(self.label()))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mental(day: u32, score: i32, is_critical: bool) -> MentalStatus {
        MentalStatus {
            index: day as i32,
            family_id: "F1".into(),
            reported_at: Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap(),
            score,
            is_critical,
            description: String::new(),
        }
    }

    #[test]
    fn test_aggregate_empty_is_none() {
        assert!(MentalAggregate::from_statuses(&[]).is_none());
    }

    #[test]
    fn test_aggregate_healthy_week() {
        let rows = vec![mental(1, 70, false), mental(2, 90, false), mental(3, 80, false)];
        let agg = MentalAggregate::from_statuses(&rows).unwrap();

        assert_eq!(agg.average_score, 80.0);
        assert_eq!(agg.critical_days, 0);
        assert_eq!(agg.best_day, NaiveDate::from_ymd_opt(2025, 1, 2));
        assert_eq!(agg.worst_day, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert!(!agg.improvement_needed);
    }

    #[test]
    fn test_aggregate_flags_critical_days() {
        let rows = vec![mental(1, 90, false), mental(2, 85, true)];
        let agg = MentalAggregate::from_statuses(&rows).unwrap();

        assert_eq!(agg.critical_days, 1);
        assert!(agg.improvement_needed);
    }

    #[test]
    fn test_aggregate_groups_days_in_kst() {
        let evening = MentalStatus {
            reported_at: Utc.with_ymd_and_hms(2025, 2, 3, 20, 0, 0).unwrap(),
            ..mental(1, 40, true)
        };
        let morning = MentalStatus {
            reported_at: Utc.with_ymd_and_hms(2025, 2, 4, 1, 0, 0).unwrap(),
            ..mental(2, 60, true)
        };
        let agg = MentalAggregate::from_statuses(&[evening, morning]).unwrap();

        assert_eq!(agg.critical_days, 1);
        assert_eq!(agg.best_day, NaiveDate::from_ymd_opt(2025, 2, 4));
        assert_eq!(agg.worst_day, NaiveDate::from_ymd_opt(2025, 2, 4));
    }

    #[test]
    fn test_aggregate_flags_low_average() {
        let rows = vec![mental(1, 30, false), mental(2, 40, false)];
        assert!(MentalAggregate::from_statuses(&rows).unwrap().improvement_needed);
    }

    #[test]
    fn test_assessment_from_wrapped_json() {
        let text = "분석 결과입니다.\n{\"score\": 135, \"is_critical\": false, \"description\": \"밝은 하루\"}";
        let assessment = MentalAssessment::parse(text).unwrap();
        assert_eq!(assessment.score, 100);
        assert!(!assessment.is_critical);
        assert_eq!(assessment.description, "밝은 하루");
    }

    #[test]
    fn test_assessment_rejects_prose() {
        assert!(MentalAssessment::parse("점수를 매길 수 없습니다").is_none());
        assert!(MentalAssessment::parse("} {").is_none());
    }

    #[test]
    fn test_kind_messages() {
        assert_eq!(StatusKind::Home.retrieved_message(), "Home status retrieved successfully");
        assert_eq!(StatusKind::MentalReport.empty_message(), "No mental reports found");
        assert_eq!(StatusKind::Health.not_found_message(), "Health status not found");
    }
}
