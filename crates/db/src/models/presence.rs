use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::presence, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Presence {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub last_seen_at: DateTime<Utc>,
}

impl Presence {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: presence::Model,
    ) -> Result<Self, DbErr> {
        let workspace_id = ids::workspace_uuid_by_id(db, model.workspace_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Workspace not found".to_string()))?;
        let user_id = ids::user_uuid_by_id(db, model.user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            workspace_id,
            user_id,
            last_seen_at: model.last_seen_at.into(),
        })
    }

    /// Record that the user was seen in the workspace just now.
    pub async fn touch<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, DbErr> {
        let workspace_row_id = ids::workspace_id_by_uuid(db, workspace_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Workspace not found".to_string()))?;
        let user_row_id = ids::user_id_by_uuid(db, user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let existing = presence::Entity::find()
            .filter(presence::Column::WorkspaceId.eq(workspace_row_id))
            .filter(presence::Column::UserId.eq(user_row_id))
            .one(db)
            .await?;

        let now = Utc::now();
        let model = match existing {
            Some(record) => {
                let mut active: presence::ActiveModel = record.into();
                active.last_seen_at = Set(now.into());
                active.update(db).await?
            }
            None => {
                let active = presence::ActiveModel {
                    uuid: Set(Uuid::new_v4()),
                    workspace_id: Set(workspace_row_id),
                    user_id: Set(user_row_id),
                    last_seen_at: Set(now.into()),
                    ..Default::default()
                };
                active.insert(db).await?
            }
        };
        Self::from_model(db, model).await
    }

    pub async fn find_by_workspace_id<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(workspace_row_id) = ids::workspace_id_by_uuid(db, workspace_id).await? else {
            return Ok(Vec::new());
        };
        let models = presence::Entity::find()
            .filter(presence::Column::WorkspaceId.eq(workspace_row_id))
            .order_by_desc(presence::Column::LastSeenAt)
            .all(db)
            .await?;

        let mut rows = Vec::with_capacity(models.len());
        for model in models {
            rows.push(Self::from_model(db, model).await?);
        }
        Ok(rows)
    }
}
