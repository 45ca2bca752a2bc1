//! Status service - device and AI reported status of a family.
//!
//! Every operation first runs the family access policy.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use common::{AppError, AppResult};
use domain::{ActiveStatus, HealthStatus, HomeStatus, MentalReport, MentalStatus, StatusKind};
use storage::{NewActiveStatus, NewHealthStatus, NewHomeStatus, StatusRepository, TimeRange};

use super::AccessPolicy;
use crate::clients::MentalAnalysis;
use crate::middleware::CurrentUser;

/// Rows of one status kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatusRecords {
    Home(Vec<HomeStatus>),
    Health(Vec<HealthStatus>),
    Active(Vec<ActiveStatus>),
    Mental(Vec<MentalStatus>),
    MentalReport(Vec<MentalReport>),
}

impl StatusRecords {
    pub fn is_empty(&self) -> bool {
        match self {
            StatusRecords::Home(rows) => rows.is_empty(),
            StatusRecords::Health(rows) => rows.is_empty(),
            StatusRecords::Active(rows) => rows.is_empty(),
            StatusRecords::Mental(rows) => rows.is_empty(),
            StatusRecords::MentalReport(rows) => rows.is_empty(),
        }
    }
}

/// A single row of any status kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatusRecord {
    Home(HomeStatus),
    Health(HealthStatus),
    Active(ActiveStatus),
    Mental(MentalStatus),
    MentalReport(MentalReport),
}

#[async_trait]
pub trait StatusService: Send + Sync {
    async fn record_home(&self, requester: &CurrentUser, input: NewHomeStatus)
        -> AppResult<HomeStatus>;

    async fn record_health(
        &self,
        requester: &CurrentUser,
        input: NewHealthStatus,
    ) -> AppResult<HealthStatus>;

    async fn record_active(
        &self,
        requester: &CurrentUser,
        input: NewActiveStatus,
    ) -> AppResult<ActiveStatus>;

    async fn list(
        &self,
        requester: &CurrentUser,
        kind: StatusKind,
        family_id: &str,
        range: TimeRange,
    ) -> AppResult<StatusRecords>;

    /// Most recent row, 404 when there is none
    async fn latest(
        &self,
        requester: &CurrentUser,
        kind: StatusKind,
        family_id: &str,
    ) -> AppResult<StatusRecord>;

    async fn delete_latest(
        &self,
        requester: &CurrentUser,
        kind: StatusKind,
        family_id: &str,
    ) -> AppResult<()>;

    /// Ask the AI server for today's mental status
    async fn generate_mental_status(
        &self,
        requester: &CurrentUser,
        family_id: &str,
    ) -> AppResult<Value>;

    /// Ask the AI server for a mental report over the recent period
    async fn generate_mental_report(
        &self,
        requester: &CurrentUser,
        family_id: &str,
    ) -> AppResult<Value>;
}

pub struct StatusManager {
    repo: Arc<dyn StatusRepository>,
    access: AccessPolicy,
    ai: Arc<dyn MentalAnalysis>,
}

impl StatusManager {
    pub fn new(
        repo: Arc<dyn StatusRepository>,
        access: AccessPolicy,
        ai: Arc<dyn MentalAnalysis>,
    ) -> Self {
        Self { repo, access, ai }
    }
}

fn not_found(kind: StatusKind, family_id: &str) -> AppError {
    AppError::not_found(kind.not_found_message()).with_input(json!({"family_id": family_id}))
}

#[async_trait]
impl StatusService for StatusManager {
    async fn record_home(
        &self,
        requester: &CurrentUser,
        input: NewHomeStatus,
    ) -> AppResult<HomeStatus> {
        self.access
            .ensure_family_access(requester, &input.family_id)
            .await?;
        self.repo.create_home(input).await
    }

    async fn record_health(
        &self,
        requester: &CurrentUser,
        input: NewHealthStatus,
    ) -> AppResult<HealthStatus> {
        self.access
            .ensure_family_access(requester, &input.family_id)
            .await?;
        self.repo.create_health(input).await
    }

    async fn record_active(
        &self,
        requester: &CurrentUser,
        input: NewActiveStatus,
    ) -> AppResult<ActiveStatus> {
        self.access
            .ensure_family_access(requester, &input.family_id)
            .await?;
        self.repo.create_active(input).await
    }

    async fn list(
        &self,
        requester: &CurrentUser,
        kind: StatusKind,
        family_id: &str,
        range: TimeRange,
    ) -> AppResult<StatusRecords> {
        self.access.ensure_family_access(requester, family_id).await?;

        let records = match kind {
            StatusKind::Home => StatusRecords::Home(self.repo.list_home(family_id, range).await?),
            StatusKind::Health => {
                StatusRecords::Health(self.repo.list_health(family_id, range).await?)
            }
            StatusKind::Active => {
                StatusRecords::Active(self.repo.list_active(family_id, range).await?)
            }
            StatusKind::Mental => {
                StatusRecords::Mental(self.repo.list_mental(family_id, range).await?)
            }
            StatusKind::MentalReport => {
                StatusRecords::MentalReport(self.repo.list_mental_reports(family_id, range).await?)
            }
        };
        Ok(records)
    }

    async fn latest(
        &self,
        requester: &CurrentUser,
        kind: StatusKind,
        family_id: &str,
    ) -> AppResult<StatusRecord> {
        self.access.ensure_family_access(requester, family_id).await?;

        let record = match kind {
            StatusKind::Home => self.repo.latest_home(family_id).await?.map(StatusRecord::Home),
            StatusKind::Health => self
                .repo
                .latest_health(family_id)
                .await?
                .map(StatusRecord::Health),
            StatusKind::Active => self
                .repo
                .latest_active(family_id)
                .await?
                .map(StatusRecord::Active),
            StatusKind::Mental => self
                .repo
                .latest_mental(family_id)
                .await?
                .map(StatusRecord::Mental),
            StatusKind::MentalReport => self
                .repo
                .latest_mental_report(family_id)
                .await?
                .map(StatusRecord::MentalReport),
        };
        record.ok_or_else(|| not_found(kind, family_id))
    }

    async fn delete_latest(
        &self,
        requester: &CurrentUser,
        kind: StatusKind,
        family_id: &str,
    ) -> AppResult<()> {
        self.access.ensure_family_access(requester, family_id).await?;

        let deleted = match kind {
            StatusKind::Home => self.repo.delete_latest_home(family_id).await?,
            StatusKind::Health => self.repo.delete_latest_health(family_id).await?,
            StatusKind::Active => self.repo.delete_latest_active(family_id).await?,
            StatusKind::Mental => self.repo.delete_latest_mental(family_id).await?,
            StatusKind::MentalReport => self.repo.delete_latest_mental_report(family_id).await?,
        };
        if !deleted {
            return Err(not_found(kind, family_id));
        }
        Ok(())
    }

    async fn generate_mental_status(
        &self,
        requester: &CurrentUser,
        family_id: &str,
    ) -> AppResult<Value> {
        self.access.ensure_family_access(requester, family_id).await?;
        self.ai.mental_status(family_id).await
    }

    async fn generate_mental_report(
        &self,
        requester: &CurrentUser,
        family_id: &str,
    ) -> AppResult<Value> {
        self.access.ensure_family_access(requester, family_id).await?;
        self.ai.mental_report(family_id).await
    }
}
