use sea_orm::entity::prelude::*;

use domain::MentalReport;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "mental_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub index: i32,
    pub family_id: String,
    pub reported_at: DateTimeUtc,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    pub average_score: f64,
    pub critical_days: i32,
    pub best_day: Option<Date>,
    pub worst_day: Option<Date>,
    pub improvement_needed: bool,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MentalReport {
    fn from(model: Model) -> Self {
        MentalReport {
            index: model.index,
            family_id: model.family_id,
            reported_at: model.reported_at,
            start_time: model.start_time,
            end_time: model.end_time,
            average_score: model.average_score,
            critical_days: model.critical_days,
            best_day: model.best_day,
            worst_day: model.worst_day,
            improvement_needed: model.improvement_needed,
            summary: model.summary,
        }
    }
}
