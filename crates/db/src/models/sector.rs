use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::sector, models::ids};

#[derive(Debug, Error)]
pub enum SectorError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Sector not found")]
    NotFound,
    #[error("Workspace not found")]
    WorkspaceNotFound,
    #[error("A sector with this name already exists in the workspace")]
    DuplicateName,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Sector {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateSector {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateSector {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl Sector {
    async fn from_model<C: ConnectionTrait>(db: &C, model: sector::Model) -> Result<Self, DbErr> {
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
        let record = sector::Entity::find()
            .filter(sector::Column::Uuid.eq(id))
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
        let models = sector::Entity::find()
            .filter(sector::Column::WorkspaceId.eq(workspace_row_id))
            .order_by_asc(sector::Column::Name)
            .all(db)
            .await?;

        let mut sectors = Vec::with_capacity(models.len());
        for model in models {
            sectors.push(Self::from_model(db, model).await?);
        }
        Ok(sectors)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
        data: &CreateSector,
    ) -> Result<Self, SectorError> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(SectorError::ValidationError(
                "Sector name is required".to_string(),
            ));
        }
        let workspace_row_id = ids::workspace_id_by_uuid(db, workspace_id)
            .await?
            .ok_or(SectorError::WorkspaceNotFound)?;

        let existing = sector::Entity::find()
            .filter(sector::Column::WorkspaceId.eq(workspace_row_id))
            .filter(sector::Column::Name.eq(name.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(SectorError::DuplicateName);
        }

        let now = Utc::now();
        let active = sector::ActiveModel {
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
        data: &UpdateSector,
    ) -> Result<Self, SectorError> {
        let record = sector::Entity::find()
            .filter(sector::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(SectorError::NotFound)?;

        let mut active: sector::ActiveModel = record.clone().into();
        if let Some(name) = data.name.as_deref() {
            let name = name.trim();
            if name.is_empty() {
                return Err(SectorError::ValidationError(
                    "Sector name is required".to_string(),
                ));
            }
            if name != record.name {
                let duplicate = sector::Entity::find()
                    .filter(sector::Column::WorkspaceId.eq(record.workspace_id))
                    .filter(sector::Column::Name.eq(name))
                    .one(db)
                    .await?;
                if duplicate.is_some() {
                    return Err(SectorError::DuplicateName);
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
        let result = sector::Entity::delete_many()
            .filter(sector::Column::Uuid.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::models::{
        user::{CreateUser, User},
        workspace::{CreateWorkspace, Workspace},
    };

    use super::*;

    #[tokio::test]
    async fn sector_names_are_unique_per_workspace() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();

        let user = User::create(
            &db,
            &CreateUser {
                email: "owner@example.com".to_string(),
                display_name: "Owner".to_string(),
                global_role: None,
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let first = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Primeira".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            user.id,
        )
        .await
        .unwrap();
        let second = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Segunda".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            user.id,
        )
        .await
        .unwrap();

        let data = CreateSector {
            name: "Financeiro".to_string(),
            color: "#00aa55".to_string(),
        };
        Sector::create(&db, first.id, &data).await.unwrap();

        let duplicate = Sector::create(&db, first.id, &data).await;
        assert!(matches!(duplicate, Err(SectorError::DuplicateName)));

        // The same name is free in another workspace.
        Sector::create(&db, second.id, &data).await.unwrap();
    }
}
