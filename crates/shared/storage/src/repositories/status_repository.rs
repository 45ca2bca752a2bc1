//! Status repository.
//!
//! Home, health, active and mental rows share the same shape on the read
//! side (family, report time, index), so listing, "latest" and "delete
//! latest" go through the generic helpers at the bottom of this file.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{active_status, health_status, home_status, mental_report, mental_status};
use common::{AppError, AppResult};
use domain::{ActiveStatus, HealthStatus, HomeStatus, MentalReport, MentalStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Optional bounds on `reported_at`, both inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHomeStatus {
    pub family_id: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub dust_level: Option<f64>,
    pub ethanol: Option<f64>,
    pub others: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHealthStatus {
    pub family_id: String,
    pub heart_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewActiveStatus {
    pub family_id: String,
    pub score: Option<i32>,
    pub action: Option<String>,
    pub is_critical: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMentalStatus {
    pub family_id: String,
    pub score: i32,
    pub is_critical: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMentalReport {
    pub family_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub average_score: f64,
    pub critical_days: i32,
    pub best_day: Option<NaiveDate>,
    pub worst_day: Option<NaiveDate>,
    pub improvement_needed: bool,
    pub summary: String,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StatusRepository: Send + Sync {
    async fn create_home(&self, input: NewHomeStatus) -> AppResult<HomeStatus>;
    async fn list_home(&self, family_id: &str, range: TimeRange) -> AppResult<Vec<HomeStatus>>;
    async fn latest_home(&self, family_id: &str) -> AppResult<Option<HomeStatus>>;
    async fn delete_latest_home(&self, family_id: &str) -> AppResult<bool>;

    async fn create_health(&self, input: NewHealthStatus) -> AppResult<HealthStatus>;
    async fn list_health(&self, family_id: &str, range: TimeRange)
        -> AppResult<Vec<HealthStatus>>;
    async fn latest_health(&self, family_id: &str) -> AppResult<Option<HealthStatus>>;
    async fn delete_latest_health(&self, family_id: &str) -> AppResult<bool>;

    async fn create_active(&self, input: NewActiveStatus) -> AppResult<ActiveStatus>;
    async fn list_active(&self, family_id: &str, range: TimeRange)
        -> AppResult<Vec<ActiveStatus>>;
    async fn latest_active(&self, family_id: &str) -> AppResult<Option<ActiveStatus>>;
    async fn delete_latest_active(&self, family_id: &str) -> AppResult<bool>;

    async fn create_mental(&self, input: NewMentalStatus) -> AppResult<MentalStatus>;
    async fn list_mental(&self, family_id: &str, range: TimeRange)
        -> AppResult<Vec<MentalStatus>>;
    async fn latest_mental(&self, family_id: &str) -> AppResult<Option<MentalStatus>>;
    async fn delete_latest_mental(&self, family_id: &str) -> AppResult<bool>;

    async fn create_mental_report(&self, input: NewMentalReport) -> AppResult<MentalReport>;
    async fn list_mental_reports(
        &self,
        family_id: &str,
        range: TimeRange,
    ) -> AppResult<Vec<MentalReport>>;
    async fn latest_mental_report(&self, family_id: &str) -> AppResult<Option<MentalReport>>;
    async fn delete_latest_mental_report(&self, family_id: &str) -> AppResult<bool>;
}

pub struct StatusStore {
    db: DatabaseConnection,
}

impl StatusStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatusRepository for StatusStore {
    async fn create_home(&self, input: NewHomeStatus) -> AppResult<HomeStatus> {
        let active = home_status::ActiveModel {
            family_id: Set(input.family_id),
            reported_at: Set(Utc::now()),
            temperature: Set(input.temperature),
            humidity: Set(input.humidity),
            dust_level: Set(input.dust_level),
            ethanol: Set(input.ethanol),
            others: Set(input.others),
            ..Default::default()
        };
        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(model.into())
    }

    async fn list_home(&self, family_id: &str, range: TimeRange) -> AppResult<Vec<HomeStatus>> {
        let rows = list_rows::<home_status::Entity>(
            &self.db,
            home_status::Column::FamilyId,
            home_status::Column::ReportedAt,
            family_id,
            range,
        )
        .await?;
        Ok(rows.into_iter().map(HomeStatus::from).collect())
    }

    async fn latest_home(&self, family_id: &str) -> AppResult<Option<HomeStatus>> {
        let row = latest_row::<home_status::Entity>(
            &self.db,
            home_status::Column::FamilyId,
            home_status::Column::ReportedAt,
            home_status::Column::Index,
            family_id,
        )
        .await?;
        Ok(row.map(HomeStatus::from))
    }

    async fn delete_latest_home(&self, family_id: &str) -> AppResult<bool> {
        Ok(delete_latest_row::<home_status::Entity>(
            &self.db,
            home_status::Column::FamilyId,
            home_status::Column::ReportedAt,
            home_status::Column::Index,
            family_id,
        )
        .await?)
    }

    async fn create_health(&self, input: NewHealthStatus) -> AppResult<HealthStatus> {
        let active = health_status::ActiveModel {
            family_id: Set(input.family_id),
            reported_at: Set(Utc::now()),
            heart_rate: Set(input.heart_rate),
            ..Default::default()
        };
        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(model.into())
    }

    async fn list_health(
        &self,
        family_id: &str,
        range: TimeRange,
    ) -> AppResult<Vec<HealthStatus>> {
        let rows = list_rows::<health_status::Entity>(
            &self.db,
            health_status::Column::FamilyId,
            health_status::Column::ReportedAt,
            family_id,
            range,
        )
        .await?;
        Ok(rows.into_iter().map(HealthStatus::from).collect())
    }

    async fn latest_health(&self, family_id: &str) -> AppResult<Option<HealthStatus>> {
        let row = latest_row::<health_status::Entity>(
            &self.db,
            health_status::Column::FamilyId,
            health_status::Column::ReportedAt,
            health_status::Column::Index,
            family_id,
        )
        .await?;
        Ok(row.map(HealthStatus::from))
    }

    async fn delete_latest_health(&self, family_id: &str) -> AppResult<bool> {
        Ok(delete_latest_row::<health_status::Entity>(
            &self.db,
            health_status::Column::FamilyId,
            health_status::Column::ReportedAt,
            health_status::Column::Index,
            family_id,
        )
        .await?)
    }

    async fn create_active(&self, input: NewActiveStatus) -> AppResult<ActiveStatus> {
        let active = active_status::ActiveModel {
            family_id: Set(input.family_id),
            reported_at: Set(Utc::now()),
            score: Set(input.score),
            action: Set(input.action),
            is_critical: Set(input.is_critical),
            description: Set(input.description),
            ..Default::default()
        };
        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(model.into())
    }

    async fn list_active(
        &self,
        family_id: &str,
        range: TimeRange,
    ) -> AppResult<Vec<ActiveStatus>> {
        let rows = list_rows::<active_status::Entity>(
            &self.db,
            active_status::Column::FamilyId,
            active_status::Column::ReportedAt,
            family_id,
            range,
        )
        .await?;
        Ok(rows.into_iter().map(ActiveStatus::from).collect())
    }

    async fn latest_active(&self, family_id: &str) -> AppResult<Option<ActiveStatus>> {
        let row = latest_row::<active_status::Entity>(
            &self.db,
            active_status::Column::FamilyId,
            active_status::Column::ReportedAt,
            active_status::Column::Index,
            family_id,
        )
        .await?;
        Ok(row.map(ActiveStatus::from))
    }

    async fn delete_latest_active(&self, family_id: &str) -> AppResult<bool> {
        Ok(delete_latest_row::<active_status::Entity>(
            &self.db,
            active_status::Column::FamilyId,
            active_status::Column::ReportedAt,
            active_status::Column::Index,
            family_id,
        )
        .await?)
    }

    async fn create_mental(&self, input: NewMentalStatus) -> AppResult<MentalStatus> {
        let active = mental_status::ActiveModel {
            family_id: Set(input.family_id),
            reported_at: Set(Utc::now()),
            score: Set(input.score),
            is_critical: Set(input.is_critical),
            description: Set(input.description),
            ..Default::default()
        };
        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(model.into())
    }

    async fn list_mental(
        &self,
        family_id: &str,
        range: TimeRange,
    ) -> AppResult<Vec<MentalStatus>> {
        let rows = list_rows::<mental_status::Entity>(
            &self.db,
            mental_status::Column::FamilyId,
            mental_status::Column::ReportedAt,
            family_id,
            range,
        )
        .await?;
        Ok(rows.into_iter().map(MentalStatus::from).collect())
    }

    async fn latest_mental(&self, family_id: &str) -> AppResult<Option<MentalStatus>> {
        let row = latest_row::<mental_status::Entity>(
            &self.db,
            mental_status::Column::FamilyId,
            mental_status::Column::ReportedAt,
            mental_status::Column::Index,
            family_id,
        )
        .await?;
        Ok(row.map(MentalStatus::from))
    }

    async fn delete_latest_mental(&self, family_id: &str) -> AppResult<bool> {
        Ok(delete_latest_row::<mental_status::Entity>(
            &self.db,
            mental_status::Column::FamilyId,
            mental_status::Column::ReportedAt,
            mental_status::Column::Index,
            family_id,
        )
        .await?)
    }

    async fn create_mental_report(&self, input: NewMentalReport) -> AppResult<MentalReport> {
        let active = mental_report::ActiveModel {
            family_id: Set(input.family_id),
            reported_at: Set(Utc::now()),
            start_time: Set(input.start_time),
            end_time: Set(input.end_time),
            average_score: Set(input.average_score),
            critical_days: Set(input.critical_days),
            best_day: Set(input.best_day),
            worst_day: Set(input.worst_day),
            improvement_needed: Set(input.improvement_needed),
            summary: Set(input.summary),
            ..Default::default()
        };
        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(model.into())
    }

    async fn list_mental_reports(
        &self,
        family_id: &str,
        range: TimeRange,
    ) -> AppResult<Vec<MentalReport>> {
        let rows = list_rows::<mental_report::Entity>(
            &self.db,
            mental_report::Column::FamilyId,
            mental_report::Column::ReportedAt,
            family_id,
            range,
        )
        .await?;
        Ok(rows.into_iter().map(MentalReport::from).collect())
    }

    async fn latest_mental_report(&self, family_id: &str) -> AppResult<Option<MentalReport>> {
        let row = latest_row::<mental_report::Entity>(
            &self.db,
            mental_report::Column::FamilyId,
            mental_report::Column::ReportedAt,
            mental_report::Column::Index,
            family_id,
        )
        .await?;
        Ok(row.map(MentalReport::from))
    }

    async fn delete_latest_mental_report(&self, family_id: &str) -> AppResult<bool> {
        Ok(delete_latest_row::<mental_report::Entity>(
            &self.db,
            mental_report::Column::FamilyId,
            mental_report::Column::ReportedAt,
            mental_report::Column::Index,
            family_id,
        )
        .await?)
    }
}

async fn list_rows<E: EntityTrait>(
    db: &DatabaseConnection,
    family_col: E::Column,
    time_col: E::Column,
    family_id: &str,
    range: TimeRange,
) -> Result<Vec<E::Model>, DbErr> {
    let mut query = E::find().filter(family_col.eq(family_id));
    if let Some(start) = range.start {
        query = query.filter(time_col.gte(start));
    }
    if let Some(end) = range.end {
        query = query.filter(time_col.lte(end));
    }
    query.order_by_asc(time_col).all(db).await
}

async fn latest_row<E: EntityTrait>(
    db: &DatabaseConnection,
    family_col: E::Column,
    time_col: E::Column,
    index_col: E::Column,
    family_id: &str,
) -> Result<Option<E::Model>, DbErr> {
    E::find()
        .filter(family_col.eq(family_id))
        .order_by_desc(time_col)
        .order_by_desc(index_col)
        .one(db)
        .await
}

async fn delete_latest_row<E: EntityTrait>(
    db: &DatabaseConnection,
    family_col: E::Column,
    time_col: E::Column,
    index_col: E::Column,
    family_id: &str,
) -> Result<bool, DbErr> {
    let Some(latest) = latest_row::<E>(db, family_col, time_col, index_col, family_id).await?
    else {
        return Ok(false);
    };

    let result = E::delete_many()
        .filter(index_col.eq(latest.get(index_col)))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}
