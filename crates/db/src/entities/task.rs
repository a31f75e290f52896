use sea_orm::entity::prelude::*;

use crate::types::{TaskPriority, TaskStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub uuid: Uuid,
    pub project_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sector_id: Option<i64>,
    pub task_type_id: Option<i64>,
    pub executor_ids: Json,
    pub validator_ids: Json,
    pub informed_ids: Json,
    pub start_date: Option<Date>,
    pub due_date_original: Option<Date>,
    pub due_date_current: Option<Date>,
    pub estimated_minutes: Option<i64>,
    pub actual_minutes: i64,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub display_order: i64,
    pub created_by: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
