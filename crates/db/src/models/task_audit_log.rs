use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::task_audit_log, models::ids};

/// Immutable record of one field's before/after value on a task mutation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TaskAuditLog {
    pub id: Uuid,
    pub task_id: Uuid,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A staged audit entry, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct AuditEntry {
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl TaskAuditLog {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: task_audit_log::Model,
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
            field_name: model.field_name,
            old_value: model.old_value,
            new_value: model.new_value,
            created_by,
            created_at: model.created_at.into(),
        })
    }

    /// Persist one row per staged entry.
    pub async fn create_many<C: ConnectionTrait>(
        db: &C,
        task_id: Uuid,
        entries: &[AuditEntry],
        author: Uuid,
    ) -> Result<u64, DbErr> {
        if entries.is_empty() {
            return Ok(0);
        }
        let task_row_id = ids::task_id_by_uuid(db, task_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Task not found".to_string()))?;
        let author_row_id = ids::user_id_by_uuid(db, author)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let now = Utc::now();
        for entry in entries {
            let active = task_audit_log::ActiveModel {
                uuid: Set(Uuid::new_v4()),
                task_id: Set(task_row_id),
                field_name: Set(entry.field_name.clone()),
                old_value: Set(entry.old_value.clone()),
                new_value: Set(entry.new_value.clone()),
                created_by: Set(author_row_id),
                created_at: Set(now.into()),
                ..Default::default()
            };
            active.insert(db).await?;
        }
        Ok(entries.len() as u64)
    }

    pub async fn find_by_task_id<C: ConnectionTrait>(
        db: &C,
        task_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(task_row_id) = ids::task_id_by_uuid(db, task_id).await? else {
            return Ok(Vec::new());
        };
        let models = task_audit_log::Entity::find()
            .filter(task_audit_log::Column::TaskId.eq(task_row_id))
            .order_by_desc(task_audit_log::Column::CreatedAt)
            .all(db)
            .await?;

        let mut logs = Vec::with_capacity(models.len());
        for model in models {
            logs.push(Self::from_model(db, model).await?);
        }
        Ok(logs)
    }

    /// Audit rows recorded in `[from, to)` for any task under the workspace.
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
        let models = task_audit_log::Entity::find()
            .filter(task_audit_log::Column::TaskId.is_in(task_row_ids))
            .filter(task_audit_log::Column::CreatedAt.gte(from))
            .filter(task_audit_log::Column::CreatedAt.lt(to))
            .order_by_asc(task_audit_log::Column::CreatedAt)
            .all(db)
            .await?;

        let mut logs = Vec::with_capacity(models.len());
        for model in models {
            logs.push(Self::from_model(db, model).await?);
        }
        Ok(logs)
    }
}
