use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    entities::{workspace, workspace_member},
    models::ids,
    types::MemberRole,
};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Workspace not found")]
    NotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateWorkspace {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateWorkspace {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Workspace {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: workspace::Model,
    ) -> Result<Self, DbErr> {
        let created_by = ids::user_uuid_by_id(db, model.created_by)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            name: model.name,
            description: model.description,
            created_by,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = workspace::Entity::find()
            .filter(workspace::Column::Uuid.eq(id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    /// Workspaces the user belongs to, newest first.
    pub async fn find_for_member<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(user_row_id) = ids::user_id_by_uuid(db, user_id).await? else {
            return Ok(Vec::new());
        };

        let member_workspace_ids: Vec<i64> = workspace_member::Entity::find()
            .select_only()
            .column(workspace_member::Column::WorkspaceId)
            .filter(workspace_member::Column::UserId.eq(user_row_id))
            .into_tuple()
            .all(db)
            .await?;

        let models = workspace::Entity::find()
            .filter(workspace::Column::Id.is_in(member_workspace_ids))
            .order_by_desc(workspace::Column::CreatedAt)
            .all(db)
            .await?;

        let mut workspaces = Vec::with_capacity(models.len());
        for model in models {
            workspaces.push(Self::from_model(db, model).await?);
        }
        Ok(workspaces)
    }

    /// Create a workspace. The creator always becomes a manager-role member
    /// in the same call, so the membership invariant cannot be skipped.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateWorkspace,
        workspace_id: Uuid,
        creator: Uuid,
    ) -> Result<Self, WorkspaceError> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(WorkspaceError::ValidationError(
                "Workspace name is required".to_string(),
            ));
        }
        let creator_row_id = ids::user_id_by_uuid(db, creator)
            .await?
            .ok_or(WorkspaceError::UserNotFound)?;

        let now = Utc::now();
        let active = workspace::ActiveModel {
            uuid: Set(workspace_id),
            name: Set(name),
            description: Set(data.description.clone()),
            created_by: Set(creator_row_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;

        let membership = workspace_member::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            workspace_id: Set(model.id),
            user_id: Set(creator_row_id),
            role: Set(MemberRole::Manager),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        membership.insert(db).await?;

        Self::from_model(db, model).await.map_err(Into::into)
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateWorkspace,
    ) -> Result<Self, WorkspaceError> {
        let record = workspace::Entity::find()
            .filter(workspace::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(WorkspaceError::NotFound)?;

        let mut active: workspace::ActiveModel = record.into();
        if let Some(name) = data.name.as_deref() {
            let name = name.trim();
            if name.is_empty() {
                return Err(WorkspaceError::ValidationError(
                    "Workspace name is required".to_string(),
                ));
            }
            active.name = Set(name.to_string());
        }
        if let Some(description) = data.description.clone() {
            active.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Self::from_model(db, updated).await.map_err(Into::into)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = workspace::Entity::delete_many()
            .filter(workspace::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
