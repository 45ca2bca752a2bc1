//! Mental service - daily mental status and period reports of a family's
//! main user.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::{info, warn};

use common::{AppError, AppResult, OptionExt};
use domain::chat::transcript;
use domain::weather::{kst_day_bounds, kst_today};
use domain::{
    Family, MentalAggregate, MentalAssessment, MentalReport, MentalStatus, PromptMessage,
};
use storage::{
    ChatRepository, FamilyRepository, NewMentalReport, NewMentalStatus, StatusRepository,
    TimeRange,
};

use crate::clients::{CompletionRequest, LanguageModel};

/// Days covered by a period report
pub const REPORT_PERIOD_DAYS: i64 = 7;

const ASSESSMENT_PROMPT: &str = "당신은 노인 정신건강 전문가입니다. 독거노인과 AI 도우미의 하루 대화를 읽고 \
정신 건강 상태를 평가하세요. 반드시 다음 JSON 한 개로만 답하세요: \
{\"score\": 0에서 100 사이 정수(높을수록 건강), \"is_critical\": 즉시 보호자 확인이 필요하면 true, \
\"description\": 보호자에게 전할 두세 문장 요약}";

const SUMMARY_PROMPT: &str = "당신은 노인 정신건강 전문가입니다. 일주일 동안의 일별 정신 상태 기록을 보고 \
보호자가 읽을 수 있도록 전반적인 흐름과 주의할 점을 세 문장 이내로 요약하세요.";

#[async_trait]
pub trait MentalService: Send + Sync {
    /// Assess today's conversations of the main user and store the result.
    async fn generate_status(&self, family_id: &str) -> AppResult<MentalStatus>;

    /// Aggregate the last week of mental status and store the report.
    async fn generate_report(&self, family_id: &str) -> AppResult<MentalReport>;
}

pub struct MentalManager {
    families: Arc<dyn FamilyRepository>,
    chats: Arc<dyn ChatRepository>,
    status: Arc<dyn StatusRepository>,
    llm: Arc<dyn LanguageModel>,
    model: String,
}

impl MentalManager {
    pub fn new(
        families: Arc<dyn FamilyRepository>,
        chats: Arc<dyn ChatRepository>,
        status: Arc<dyn StatusRepository>,
        llm: Arc<dyn LanguageModel>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            families,
            chats,
            status,
            llm,
            model: model.into(),
        }
    }

    async fn family(&self, family_id: &str) -> AppResult<Family> {
        self.families
            .find_by_id(family_id)
            .await?
            .ok_or_not_found("Family not found")
    }
}

/// One line per status row for the summary prompt.
fn status_lines(rows: &[MentalStatus]) -> String {
    rows.iter()
        .map(|r| {
            format!(
                "{} 점수 {}{}: {}",
                r.kst_date(),
                r.score,
                if r.is_critical { " (위험)" } else { "" },
                r.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl MentalService for MentalManager {
    async fn generate_status(&self, family_id: &str) -> AppResult<MentalStatus> {
        let family = self.family(family_id).await?;

        let (start, end) = kst_day_bounds(kst_today());
        let turns = self.chats.turns_between(&family.main_user, start, end).await?;
        if turns.is_empty() {
            return Err(AppError::not_found("No conversations found for today"));
        }

        let messages = vec![
            PromptMessage::system(ASSESSMENT_PROMPT),
            PromptMessage::user(transcript(&turns)),
        ];
        let answer = self
            .llm
            .complete(CompletionRequest::new(self.model.clone(), messages))
            .await?;
        let assessment = MentalAssessment::parse(&answer).ok_or_else(|| {
            warn!(family_id, "Unreadable mental assessment: {}", answer);
            AppError::upstream("Mental assessment was not valid JSON")
        })?;

        let status = self
            .status
            .create_mental(NewMentalStatus {
                family_id: family.id,
                score: assessment.score,
                is_critical: assessment.is_critical,
                description: assessment.description,
            })
            .await?;
        info!(family_id, score = status.score, "Mental status generated");
        Ok(status)
    }

    async fn generate_report(&self, family_id: &str) -> AppResult<MentalReport> {
        let family = self.family(family_id).await?;

        let end = Utc::now();
        let start = end - Duration::days(REPORT_PERIOD_DAYS);
        let rows = self
            .status
            .list_mental(&family.id, TimeRange::new(Some(start), Some(end)))
            .await?;
        let aggregate =
            MentalAggregate::from_statuses(&rows).ok_or_not_found("No mental status found")?;

        let messages = vec![
            PromptMessage::system(SUMMARY_PROMPT),
            PromptMessage::user(status_lines(&rows)),
        ];
        let summary = self
            .llm
            .complete(CompletionRequest::new(self.model.clone(), messages))
            .await?;

        let report = self
            .status
            .create_mental_report(NewMentalReport {
                family_id: family.id,
                start_time: start,
                end_time: end,
                average_score: aggregate.average_score,
                critical_days: aggregate.critical_days,
                best_day: aggregate.best_day,
                worst_day: aggregate.worst_day,
                improvement_needed: aggregate.improvement_needed,
                summary,
            })
            .await?;
        info!(family_id, average = report.average_score, "Mental report generated");
        Ok(report)
    }
}
