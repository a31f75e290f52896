use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::task_time_entry, models::ids, types::TimeEntrySource};

#[derive(Debug, Error)]
pub enum TimeEntryError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Task not found")]
    TaskNotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Immutable time-tracking log row.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TaskTimeEntry {
    pub id: Uuid,
    pub task_id: Uuid,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_minutes: i64,
    pub source: TimeEntrySource,
    pub note: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateTimeEntry {
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_minutes: i64,
    pub source: TimeEntrySource,
    pub note: Option<String>,
}

impl TaskTimeEntry {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: task_time_entry::Model,
    ) -> Result<Self, DbErr> {
        let task_id = ids::task_uuid_by_id(db, model.task_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Task not found".to_string()))?;
        let created_by = ids::user_uuid_by_id(db, model.created_by)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            task_id,
            started_at: model.started_at.map(Into::into),
            ended_at: model.ended_at.map(Into::into),
            duration_minutes: model.duration_minutes,
            source: model.source,
            note: model.note,
            created_by,
            created_at: model.created_at.into(),
        })
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        task_id: Uuid,
        data: &CreateTimeEntry,
        author: Uuid,
    ) -> Result<Self, TimeEntryError> {
        if data.duration_minutes == 0 {
            return Err(TimeEntryError::ValidationError(
                "Duration must be non-zero".to_string(),
            ));
        }
        let task_row_id = ids::task_id_by_uuid(db, task_id)
            .await?
            .ok_or(TimeEntryError::TaskNotFound)?;
        let author_row_id = ids::user_id_by_uuid(db, author)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let active = task_time_entry::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            task_id: Set(task_row_id),
            started_at: Set(data.started_at.map(Into::into)),
            ended_at: Set(data.ended_at.map(Into::into)),
            duration_minutes: Set(data.duration_minutes),
            source: Set(data.source),
            note: Set(data.note.clone()),
            created_by: Set(author_row_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Self::from_model(db, model).await.map_err(Into::into)
    }

    pub async fn find_by_task_id<C: ConnectionTrait>(
        db: &C,
        task_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(task_row_id) = ids::task_id_by_uuid(db, task_id).await? else {
            return Ok(Vec::new());
        };
        let models = task_time_entry::Entity::find()
            .filter(task_time_entry::Column::TaskId.eq(task_row_id))
            .order_by_desc(task_time_entry::Column::CreatedAt)
            .all(db)
            .await?;

        let mut entries = Vec::with_capacity(models.len());
        for model in models {
            entries.push(Self::from_model(db, model).await?);
        }
        Ok(entries)
    }

    /// Entries recorded in `[from, to)` for any task under the workspace.
    pub async fn find_window_for_workspace<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Self>, DbErr> {
        let task_row_ids = ids::task_row_ids_for_workspace(db, workspace_id).await?;
        if task_row_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = task_time_entry::Entity::find()
            .filter(task_time_entry::Column::TaskId.is_in(task_row_ids))
            .filter(task_time_entry::Column::CreatedAt.gte(from))
            .filter(task_time_entry::Column::CreatedAt.lt(to))
            .order_by_asc(task_time_entry::Column::CreatedAt)
            .all(db)
            .await?;

        let mut entries = Vec::with_capacity(models.len());
        for model in models {
            entries.push(Self::from_model(db, model).await?);
        }
        Ok(entries)
    }
}
