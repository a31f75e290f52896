use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::feed_post, models::ids};

#[derive(Debug, Error)]
pub enum FeedPostError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Feed post not found")]
    NotFound,
    #[error("Workspace not found")]
    WorkspaceNotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct FeedPost {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub content: String,
    pub task_ids: Vec<Uuid>,
    pub mentioned_user_ids: Vec<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateFeedPost {
    pub content: String,
    pub task_ids: Option<Vec<Uuid>>,
    pub mentioned_user_ids: Option<Vec<Uuid>>,
}

fn uuid_list_from_json(value: &Json) -> Result<Vec<Uuid>, DbErr> {
    serde_json::from_value(value.clone()).map_err(|err| DbErr::Custom(err.to_string()))
}

fn uuid_list_to_json(ids: &[Uuid]) -> Result<Json, DbErr> {
    serde_json::to_value(ids).map_err(|err| DbErr::Custom(err.to_string()))
}

impl FeedPost {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: feed_post::Model,
    ) -> Result<Self, DbErr> {
        let workspace_id = ids::workspace_uuid_by_id(db, model.workspace_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Workspace not found".to_string()))?;
        let created_by = ids::user_uuid_by_id(db, model.created_by)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            workspace_id,
            content: model.content,
            task_ids: uuid_list_from_json(&model.task_ids)?,
            mentioned_user_ids: uuid_list_from_json(&model.mentioned_user_ids)?,
            created_by,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = feed_post::Entity::find()
            .filter(feed_post::Column::Uuid.eq(id))
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
        let models = feed_post::Entity::find()
            .filter(feed_post::Column::WorkspaceId.eq(workspace_row_id))
            .order_by_desc(feed_post::Column::CreatedAt)
            .all(db)
            .await?;

        let mut posts = Vec::with_capacity(models.len());
        for model in models {
            posts.push(Self::from_model(db, model).await?);
        }
        Ok(posts)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
        data: &CreateFeedPost,
        post_id: Uuid,
        author: Uuid,
    ) -> Result<Self, FeedPostError> {
        let content = data.content.trim().to_string();
        if content.is_empty() {
            return Err(FeedPostError::ValidationError(
                "Post content is required".to_string(),
            ));
        }
        let workspace_row_id = ids::workspace_id_by_uuid(db, workspace_id)
            .await?
            .ok_or(FeedPostError::WorkspaceNotFound)?;
        let author_row_id = ids::user_id_by_uuid(db, author)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let now = Utc::now();
        let active = feed_post::ActiveModel {
            uuid: Set(post_id),
            workspace_id: Set(workspace_row_id),
            content: Set(content),
            task_ids: Set(uuid_list_to_json(data.task_ids.as_deref().unwrap_or_default())?),
            mentioned_user_ids: Set(uuid_list_to_json(
                data.mentioned_user_ids.as_deref().unwrap_or_default(),
            )?),
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
    ) -> Result<Self, FeedPostError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(FeedPostError::ValidationError(
                "Post content is required".to_string(),
            ));
        }
        let record = feed_post::Entity::find()
            .filter(feed_post::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(FeedPostError::NotFound)?;

        let mut active: feed_post::ActiveModel = record.into();
        active.content = Set(content.to_string());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(db).await?;
        Self::from_model(db, updated).await.map_err(Into::into)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = feed_post::Entity::delete_many()
            .filter(feed_post::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
