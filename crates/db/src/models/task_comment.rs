use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::task_comment, models::ids};

#[derive(Debug, Error)]
pub enum TaskCommentError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Comment not found")]
    NotFound,
    #[error("Task not found")]
    TaskNotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TaskComment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub content: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskComment {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: task_comment::Model,
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
            content: model.content,
            created_by,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = task_comment::Entity::find()
            .filter(task_comment::Column::Uuid.eq(id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_task_id<C: ConnectionTrait>(
        db: &C,
        task_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(task_row_id) = ids::task_id_by_uuid(db, task_id).await? else {
            return Ok(Vec::new());
        };
        let models = task_comment::Entity::find()
            .filter(task_comment::Column::TaskId.eq(task_row_id))
            .order_by_asc(task_comment::Column::CreatedAt)
            .all(db)
            .await?;

        let mut comments = Vec::with_capacity(models.len());
        for model in models {
            comments.push(Self::from_model(db, model).await?);
        }
        Ok(comments)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        task_id: Uuid,
        content: &str,
        author: Uuid,
    ) -> Result<Self, TaskCommentError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(TaskCommentError::ValidationError(
                "Comment content is required".to_string(),
            ));
        }
        let task_row_id = ids::task_id_by_uuid(db, task_id)
            .await?
            .ok_or(TaskCommentError::TaskNotFound)?;
        let author_row_id = ids::user_id_by_uuid(db, author)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let now = Utc::now();
        let active = task_comment::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            task_id: Set(task_row_id),
            content: Set(content.to_string()),
            created_by: Set(author_row_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Self::from_model(db, model).await.map_err(Into::into)
    }

    pub async fn update_content<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        content: &str,
    ) -> Result<Self, TaskCommentError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(TaskCommentError::ValidationError(
                "Comment content is required".to_string(),
            ));
        }
        let record = task_comment::Entity::find()
            .filter(task_comment::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(TaskCommentError::NotFound)?;

        let mut active: task_comment::ActiveModel = record.into();
        active.content = Set(content.to_string());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(db).await?;
        Self::from_model(db, updated).await.map_err(Into::into)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = task_comment::Entity::delete_many()
            .filter(task_comment::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
