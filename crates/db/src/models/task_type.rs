use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::task_type, models::ids};

#[derive(Debug, Error)]
pub enum TaskTypeError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Task type not found")]
    NotFound,
    #[error("Workspace not found")]
    WorkspaceNotFound,
    #[error("A task type with this name already exists in the workspace")]
    DuplicateName,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TaskType {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateTaskType {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateTaskType {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl TaskType {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: task_type::Model,
    ) -> Result<Self, DbErr> {
        let workspace_id = ids::workspace_uuid_by_id(db, model.workspace_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Workspace not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            workspace_id,
            name: model.name,
            color: model.color,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = task_type::Entity::find()
            .filter(task_type::Column::Uuid.eq(id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_workspace_id<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(workspace_row_id) = ids::workspace_id_by_uuid(db, workspace_id).await? else {
            return Ok(Vec::new());
        };
        let models = task_type::Entity::find()
            .filter(task_type::Column::WorkspaceId.eq(workspace_row_id))
            .order_by_asc(task_type::Column::Name)
            .all(db)
            .await?;

        let mut task_types = Vec::with_capacity(models.len());
        for model in models {
            task_types.push(Self::from_model(db, model).await?);
        }
        Ok(task_types)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
        data: &CreateTaskType,
    ) -> Result<Self, TaskTypeError> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(TaskTypeError::ValidationError(
                "Task type name is required".to_string(),
            ));
        }
        let workspace_row_id = ids::workspace_id_by_uuid(db, workspace_id)
            .await?
            .ok_or(TaskTypeError::WorkspaceNotFound)?;

        let existing = task_type::Entity::find()
            .filter(task_type::Column::WorkspaceId.eq(workspace_row_id))
            .filter(task_type::Column::Name.eq(name.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(TaskTypeError::DuplicateName);
        }

        let now = Utc::now();
        let active = task_type::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            workspace_id: Set(workspace_row_id),
            name: Set(name),
            color: Set(data.color.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Self::from_model(db, model).await.map_err(Into::into)
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateTaskType,
    ) -> Result<Self, TaskTypeError> {
        let record = task_type::Entity::find()
            .filter(task_type::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(TaskTypeError::NotFound)?;

        let mut active: task_type::ActiveModel = record.clone().into();
        if let Some(name) = data.name.as_deref() {
            let name = name.trim();
            if name.is_empty() {
                return Err(TaskTypeError::ValidationError(
                    "Task type name is required".to_string(),
                ));
            }
            if name != record.name {
                let duplicate = task_type::Entity::find()
                    .filter(task_type::Column::WorkspaceId.eq(record.workspace_id))
                    .filter(task_type::Column::Name.eq(name))
                    .one(db)
                    .await?;
                if duplicate.is_some() {
                    return Err(TaskTypeError::DuplicateName);
                }
            }
            active.name = Set(name.to_string());
        }
        if let Some(color) = data.color.clone() {
            active.color = Set(color);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Self::from_model(db, updated).await.map_err(Into::into)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = task_type::Entity::delete_many()
            .filter(task_type::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
