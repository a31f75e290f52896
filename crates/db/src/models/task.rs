use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::sea_query::{Expr, ExprTrait};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    entities::task,
    models::ids,
    types::{TaskPriority, TaskStatus},
};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Task not found")]
    NotFound,
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Sector not found")]
    SectorNotFound,
    #[error("Task type not found")]
    TaskTypeNotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sector_id: Option<Uuid>,
    pub task_type_id: Option<Uuid>,
    pub executor_ids: Vec<Uuid>,
    pub validator_ids: Vec<Uuid>,
    pub informed_ids: Vec<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub due_date_original: Option<NaiveDate>,
    pub due_date_current: Option<NaiveDate>,
    pub estimated_minutes: Option<i64>,
    pub actual_minutes: i64,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub display_order: i64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateTask {
    pub name: String,
    pub description: Option<String>,
    pub sector_id: Option<Uuid>,
    pub task_type_id: Option<Uuid>,
    pub executor_ids: Option<Vec<Uuid>>,
    pub validator_ids: Option<Vec<Uuid>>,
    pub informed_ids: Option<Vec<Uuid>>,
    pub start_date: Option<NaiveDate>,
    pub due_date_original: Option<NaiveDate>,
    pub estimated_minutes: Option<i64>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub display_order: Option<i64>,
}

impl CreateTask {
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            sector_id: None,
            task_type_id: None,
            executor_ids: None,
            validator_ids: None,
            informed_ids: None,
            start_date: None,
            due_date_original: None,
            estimated_minutes: None,
            priority: None,
            status: None,
            display_order: None,
        }
    }
}

/// Field-level partial update. Absent fields are untouched; due dates are
/// deliberately excluded since they change through the due-date-change log.
#[derive(Debug, Clone, Default, Deserialize, TS)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sector_id: Option<Uuid>,
    pub task_type_id: Option<Uuid>,
    pub executor_ids: Option<Vec<Uuid>>,
    pub validator_ids: Option<Vec<Uuid>>,
    pub informed_ids: Option<Vec<Uuid>>,
    pub start_date: Option<NaiveDate>,
    pub estimated_minutes: Option<i64>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub display_order: Option<i64>,
}

fn uuid_list_from_json(value: &Json) -> Result<Vec<Uuid>, DbErr> {
    serde_json::from_value(value.clone()).map_err(|err| DbErr::Custom(err.to_string()))
}

fn uuid_list_to_json(ids: &[Uuid]) -> Result<Json, DbErr> {
    serde_json::to_value(ids).map_err(|err| DbErr::Custom(err.to_string()))
}

impl Task {
    async fn from_model<C: ConnectionTrait>(db: &C, model: task::Model) -> Result<Self, DbErr> {
        let project_id = ids::project_uuid_by_id(db, model.project_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Project not found".to_string()))?;
        let sector_id = match model.sector_id {
            Some(id) => ids::sector_uuid_by_id(db, id)
                .await?
                .ok_or(DbErr::RecordNotFound("Sector not found".to_string()))
                .map(Some)?,
            None => None,
        };
        let task_type_id = match model.task_type_id {
            Some(id) => ids::task_type_uuid_by_id(db, id)
                .await?
                .ok_or(DbErr::RecordNotFound("Task type not found".to_string()))
                .map(Some)?,
            None => None,
        };
        let created_by = ids::user_uuid_by_id(db, model.created_by)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        Ok(Self {
            id: model.uuid,
            project_id,
            name: model.name,
            description: model.description,
            sector_id,
            task_type_id,
            executor_ids: uuid_list_from_json(&model.executor_ids)?,
            validator_ids: uuid_list_from_json(&model.validator_ids)?,
            informed_ids: uuid_list_from_json(&model.informed_ids)?,
            start_date: model.start_date,
            due_date_original: model.due_date_original,
            due_date_current: model.due_date_current,
            estimated_minutes: model.estimated_minutes,
            actual_minutes: model.actual_minutes,
            priority: model.priority,
            status: model.status,
            display_order: model.display_order,
            created_by,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    /// Tasks of a project grouped by status lane, manual order within each.
    pub async fn find_by_project_id<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let project_row_id = ids::project_id_by_uuid(db, project_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Project not found".to_string()))?;

        let models = task::Entity::find()
            .filter(task::Column::ProjectId.eq(project_row_id))
            .order_by_asc(task::Column::Status)
            .order_by_asc(task::Column::DisplayOrder)
            .all(db)
            .await?;

        let mut tasks = Vec::with_capacity(models.len());
        for model in models {
            tasks.push(Self::from_model(db, model).await?);
        }
        Ok(tasks)
    }

    async fn next_display_order<C: ConnectionTrait>(
        db: &C,
        project_row_id: i64,
        status: TaskStatus,
    ) -> Result<i64, DbErr> {
        let max: Option<Option<i64>> = task::Entity::find()
            .select_only()
            .column_as(
                Expr::col(task::Column::DisplayOrder).max(),
                "max_display_order",
            )
            .filter(task::Column::ProjectId.eq(project_row_id))
            .filter(task::Column::Status.eq(status))
            .into_tuple()
            .one(db)
            .await?;
        Ok(max.flatten().map_or(0, |value| value + 1))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        data: &CreateTask,
        task_id: Uuid,
        creator: Uuid,
    ) -> Result<Self, TaskError> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(TaskError::ValidationError(
                "Task name is required".to_string(),
            ));
        }
        let project_row_id = ids::project_id_by_uuid(db, project_id)
            .await?
            .ok_or(TaskError::ProjectNotFound)?;
        let creator_row_id = ids::user_id_by_uuid(db, creator)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;
        let sector_row_id = match data.sector_id {
            Some(id) => Some(
                ids::sector_id_by_uuid(db, id)
                    .await?
                    .ok_or(TaskError::SectorNotFound)?,
            ),
            None => None,
        };
        let task_type_row_id = match data.task_type_id {
            Some(id) => Some(
                ids::task_type_id_by_uuid(db, id)
                    .await?
                    .ok_or(TaskError::TaskTypeNotFound)?,
            ),
            None => None,
        };

        let status = data.status.unwrap_or_default();
        let display_order = match data.display_order {
            Some(order) => order,
            None => Self::next_display_order(db, project_row_id, status).await?,
        };

        let now = Utc::now();
        let active = task::ActiveModel {
            uuid: Set(task_id),
            project_id: Set(project_row_id),
            name: Set(name),
            description: Set(data.description.clone()),
            sector_id: Set(sector_row_id),
            task_type_id: Set(task_type_row_id),
            executor_ids: Set(uuid_list_to_json(
                data.executor_ids.as_deref().unwrap_or_default(),
            )?),
            validator_ids: Set(uuid_list_to_json(
                data.validator_ids.as_deref().unwrap_or_default(),
            )?),
            informed_ids: Set(uuid_list_to_json(
                data.informed_ids.as_deref().unwrap_or_default(),
            )?),
            start_date: Set(data.start_date),
            due_date_original: Set(data.due_date_original),
            // The current due date starts out equal to the original.
            due_date_current: Set(data.due_date_original),
            estimated_minutes: Set(data.estimated_minutes),
            actual_minutes: Set(0),
            priority: Set(data.priority.unwrap_or_default()),
            status: Set(status),
            display_order: Set(display_order),
            created_by: Set(creator_row_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Self::from_model(db, model).await.map_err(Into::into)
    }

    /// Apply the partial update. Auditing is the caller's concern; this only
    /// persists the new field values.
    pub async fn apply_update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateTask,
    ) -> Result<Self, TaskError> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(TaskError::NotFound)?;

        let mut active: task::ActiveModel = record.into();
        if let Some(name) = data.name.as_deref() {
            let name = name.trim();
            if name.is_empty() {
                return Err(TaskError::ValidationError(
                    "Task name is required".to_string(),
                ));
            }
            active.name = Set(name.to_string());
        }
        if let Some(description) = data.description.clone() {
            active.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
        }
        if let Some(sector_id) = data.sector_id {
            let sector_row_id = ids::sector_id_by_uuid(db, sector_id)
                .await?
                .ok_or(TaskError::SectorNotFound)?;
            active.sector_id = Set(Some(sector_row_id));
        }
        if let Some(task_type_id) = data.task_type_id {
            let task_type_row_id = ids::task_type_id_by_uuid(db, task_type_id)
                .await?
                .ok_or(TaskError::TaskTypeNotFound)?;
            active.task_type_id = Set(Some(task_type_row_id));
        }
        if let Some(executor_ids) = data.executor_ids.as_deref() {
            active.executor_ids = Set(uuid_list_to_json(executor_ids)?);
        }
        if let Some(validator_ids) = data.validator_ids.as_deref() {
            active.validator_ids = Set(uuid_list_to_json(validator_ids)?);
        }
        if let Some(informed_ids) = data.informed_ids.as_deref() {
            active.informed_ids = Set(uuid_list_to_json(informed_ids)?);
        }
        if let Some(start_date) = data.start_date {
            active.start_date = Set(Some(start_date));
        }
        if let Some(estimated_minutes) = data.estimated_minutes {
            active.estimated_minutes = Set(Some(estimated_minutes));
        }
        if let Some(priority) = data.priority {
            active.priority = Set(priority);
        }
        if let Some(status) = data.status {
            active.status = Set(status);
        }
        if let Some(display_order) = data.display_order {
            active.display_order = Set(display_order);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Self::from_model(db, updated).await.map_err(Into::into)
    }

    /// Adjust the tracked total, flooring at zero.
    pub async fn add_actual_minutes<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        delta_minutes: i64,
    ) -> Result<i64, TaskError> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(TaskError::NotFound)?;

        let new_total = Ord::max(record.actual_minutes + delta_minutes, 0);
        let mut active: task::ActiveModel = record.into();
        active.actual_minutes = Set(new_total);
        active.updated_at = Set(Utc::now().into());
        active.update(db).await?;
        Ok(new_total)
    }

    pub async fn set_due_date_current<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        date: NaiveDate,
    ) -> Result<(), TaskError> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(TaskError::NotFound)?;

        let mut active: task::ActiveModel = record.into();
        active.due_date_current = Set(Some(date));
        active.updated_at = Set(Utc::now().into());
        active.update(db).await?;
        Ok(())
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = task::Entity::delete_many()
            .filter(task::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
