use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    entities::workspace_member,
    models::ids,
    types::MemberRole,
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct WorkspaceMember {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkspaceMember {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: workspace_member::Model,
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
            role: model.role,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn role_of<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MemberRole>, DbErr> {
        let Some(workspace_row_id) = ids::workspace_id_by_uuid(db, workspace_id).await? else {
            return Ok(None);
        };
        let Some(user_row_id) = ids::user_id_by_uuid(db, user_id).await? else {
            return Ok(None);
        };
        workspace_member::Entity::find()
            .select_only()
            .column(workspace_member::Column::Role)
            .filter(workspace_member::Column::WorkspaceId.eq(workspace_row_id))
            .filter(workspace_member::Column::UserId.eq(user_row_id))
            .into_tuple()
            .one(db)
            .await
    }

    pub async fn find_by_workspace_id<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(workspace_row_id) = ids::workspace_id_by_uuid(db, workspace_id).await? else {
            return Ok(Vec::new());
        };
        let models = workspace_member::Entity::find()
            .filter(workspace_member::Column::WorkspaceId.eq(workspace_row_id))
            .order_by_asc(workspace_member::Column::CreatedAt)
            .all(db)
            .await?;

        let mut members = Vec::with_capacity(models.len());
        for model in models {
            members.push(Self::from_model(db, model).await?);
        }
        Ok(members)
    }

    /// Insert or update the (workspace, user) membership. Repeat invites to
    /// the same pair land on the existing row.
    pub async fn upsert<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Self, DbErr> {
        let workspace_row_id = ids::workspace_id_by_uuid(db, workspace_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Workspace not found".to_string()))?;
        let user_row_id = ids::user_id_by_uuid(db, user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let existing = workspace_member::Entity::find()
            .filter(workspace_member::Column::WorkspaceId.eq(workspace_row_id))
            .filter(workspace_member::Column::UserId.eq(user_row_id))
            .one(db)
            .await?;

        let now = Utc::now();
        let model = match existing {
            Some(record) => {
                let mut active: workspace_member::ActiveModel = record.into();
                active.role = Set(role);
                active.updated_at = Set(now.into());
                active.update(db).await?
            }
            None => {
                let active = workspace_member::ActiveModel {
                    uuid: Set(Uuid::new_v4()),
                    workspace_id: Set(workspace_row_id),
                    user_id: Set(user_row_id),
                    role: Set(role),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                    ..Default::default()
                };
                active.insert(db).await?
            }
        };
        Self::from_model(db, model).await
    }

    pub async fn remove<C: ConnectionTrait>(
        db: &C,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, DbErr> {
        let Some(workspace_row_id) = ids::workspace_id_by_uuid(db, workspace_id).await? else {
            return Ok(0);
        };
        let Some(user_row_id) = ids::user_id_by_uuid(db, user_id).await? else {
            return Ok(0);
        };
        let result = workspace_member::Entity::delete_many()
            .filter(workspace_member::Column::WorkspaceId.eq(workspace_row_id))
            .filter(workspace_member::Column::UserId.eq(user_row_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
