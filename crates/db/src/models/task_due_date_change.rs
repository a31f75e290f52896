use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::task_due_date_change, models::ids};

/// Immutable due-date history row.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TaskDueDateChange {
    pub id: Uuid,
    pub task_id: Uuid,
    pub previous_date: Option<NaiveDate>,
    pub new_date: NaiveDate,
    pub reason: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TaskDueDateChange {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: task_due_date_change::Model,
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
            previous_date: model.previous_date,
            new_date: model.new_date,
            reason: model.reason,
            created_by,
            created_at: model.created_at.into(),
        })
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        task_id: Uuid,
        previous_date: Option<NaiveDate>,
        new_date: NaiveDate,
        reason: &str,
        author: Uuid,
    ) -> Result<Self, DbErr> {
        let task_row_id = ids::task_id_by_uuid(db, task_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Task not found".to_string()))?;
        let author_row_id = ids::user_id_by_uuid(db, author)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let active = task_due_date_change::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            task_id: Set(task_row_id),
            previous_date: Set(previous_date),
            new_date: Set(new_date),
            reason: Set(reason.to_string()),
            created_by: Set(author_row_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Self::from_model(db, model).await
    }

    pub async fn find_by_task_id<C: ConnectionTrait>(
        db: &C,
        task_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(task_row_id) = ids::task_id_by_uuid(db, task_id).await? else {
            return Ok(Vec::new());
        };
        let models = task_due_date_change::Entity::find()
            .filter(task_due_date_change::Column::TaskId.eq(task_row_id))
            .order_by_desc(task_due_date_change::Column::CreatedAt)
            .all(db)
            .await?;

        let mut changes = Vec::with_capacity(models.len());
        for model in models {
            changes.push(Self::from_model(db, model).await?);
        }
        Ok(changes)
    }

    /// Changes recorded in `[from, to)` for any task under the workspace.
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
        let models = task_due_date_change::Entity::find()
            .filter(task_due_date_change::Column::TaskId.is_in(task_row_ids))
            .filter(task_due_date_change::Column::CreatedAt.gte(from))
            .filter(task_due_date_change::Column::CreatedAt.lt(to))
            .order_by_asc(task_due_date_change::Column::CreatedAt)
            .all(db)
            .await?;

        let mut changes = Vec::with_capacity(models.len());
        for model in models {
            changes.push(Self::from_model(db, model).await?);
        }
        Ok(changes)
    }
}
