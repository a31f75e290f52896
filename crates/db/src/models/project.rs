use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::project, models::ids};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Project not found")]
    NotFound,
    #[error("Workspace not found")]
    WorkspaceNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Project {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub summary: Option<String>,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateProject {
    pub name: String,
    pub summary: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
}

impl Project {
    async fn from_model<C: ConnectionTrait>(db: &C, model: project::Model) -> Result<Self, DbErr> {
        let workspace_id = ids::workspace_uuid_by_id(db, model.workspace_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Workspace not found".to_string()))?;
        let created_by = ids::user_uuid_by_id(db, model.created_by)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            workspace_id,
            name: model.name,
            summary: model.summary,
            status: model.status,
            created_by,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = project::Entity::find()
            .filter(project::Column::Uuid.eq(id))
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

        let models = project::Entity::find()
            .filter(project::Column::WorkspaceId.eq(workspace_row_id))
            .order_by_desc(project::Column::CreatedAt)
            .all(db)
            .await?;

        let mut projects = Vec::with_capacity(models.len());
        for model in models {
            projects.push(Self::from_model(db, model).await?);
        }
        Ok(projects)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
        data: &CreateProject,
        project_id: Uuid,
        creator: Uuid,
    ) -> Result<Self, ProjectError> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(ProjectError::ValidationError(
                "Project name is required".to_string(),
            ));
        }
        let workspace_row_id = ids::workspace_id_by_uuid(db, workspace_id)
            .await?
            .ok_or(ProjectError::WorkspaceNotFound)?;
        let creator_row_id = ids::user_id_by_uuid(db, creator)
            .await?
            .ok_or(ProjectError::UserNotFound)?;

        let now = Utc::now();
        let active = project::ActiveModel {
            uuid: Set(project_id),
            workspace_id: Set(workspace_row_id),
            name: Set(name),
            summary: Set(data.summary.clone()),
            status: Set(data.status.clone().unwrap_or_else(|| "ativo".to_string())),
            created_by: Set(creator_row_id),
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
        data: &UpdateProject,
    ) -> Result<Self, ProjectError> {
        let record = project::Entity::find()
            .filter(project::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(ProjectError::NotFound)?;

        let mut active: project::ActiveModel = record.into();
        if let Some(name) = data.name.as_deref() {
            let name = name.trim();
            if name.is_empty() {
                return Err(ProjectError::ValidationError(
                    "Project name is required".to_string(),
                ));
            }
            active.name = Set(name.to_string());
        }
        if let Some(summary) = data.summary.clone() {
            active.summary = Set(Some(summary).filter(|s| !s.trim().is_empty()));
        }
        if let Some(status) = data.status.clone() {
            if status.trim().is_empty() {
                return Err(ProjectError::ValidationError(
                    "Project status is required".to_string(),
                ));
            }
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Self::from_model(db, updated).await.map_err(Into::into)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let result = project::Entity::delete_many()
            .filter(project::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
