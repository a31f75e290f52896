use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    entities::project_member,
    models::ids,
    types::MemberRole,
};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ProjectMember {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectMember {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: project_member::Model,
    ) -> Result<Self, DbErr> {
        let project_id = ids::project_uuid_by_id(db, model.project_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Project not found".to_string()))?;
        let user_id = ids::user_uuid_by_id(db, model.user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            project_id,
            user_id,
            role: model.role,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn role_of<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MemberRole>, DbErr> {
        let Some(project_row_id) = ids::project_id_by_uuid(db, project_id).await? else {
            return Ok(None);
        };
        let Some(user_row_id) = ids::user_id_by_uuid(db, user_id).await? else {
            return Ok(None);
        };
        project_member::Entity::find()
            .select_only()
            .column(project_member::Column::Role)
            .filter(project_member::Column::ProjectId.eq(project_row_id))
            .filter(project_member::Column::UserId.eq(user_row_id))
            .into_tuple()
            .one(db)
            .await
    }

    pub async fn find_by_project_id<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(project_row_id) = ids::project_id_by_uuid(db, project_id).await? else {
            return Ok(Vec::new());
        };
        let models = project_member::Entity::find()
            .filter(project_member::Column::ProjectId.eq(project_row_id))
            .order_by_asc(project_member::Column::CreatedAt)
            .all(db)
            .await?;

        let mut members = Vec::with_capacity(models.len());
        for model in models {
            members.push(Self::from_model(db, model).await?);
        }
        Ok(members)
    }

    /// Insert or update the (project, user) membership. Repeat invites to the
    /// same pair land on the existing row.
    pub async fn upsert<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Self, DbErr> {
        let project_row_id = ids::project_id_by_uuid(db, project_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Project not found".to_string()))?;
        let user_row_id = ids::user_id_by_uuid(db, user_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let existing = project_member::Entity::find()
            .filter(project_member::Column::ProjectId.eq(project_row_id))
            .filter(project_member::Column::UserId.eq(user_row_id))
            .one(db)
            .await?;

        let now = Utc::now();
        let model = match existing {
            Some(record) => {
                let mut active: project_member::ActiveModel = record.into();
                active.role = Set(role);
                active.updated_at = Set(now.into());
                active.update(db).await?
            }
            None => {
                let active = project_member::ActiveModel {
                    uuid: Set(Uuid::new_v4()),
                    project_id: Set(project_row_id),
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
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, DbErr> {
        let Some(project_row_id) = ids::project_id_by_uuid(db, project_id).await? else {
            return Ok(0);
        };
        let Some(user_row_id) = ids::user_id_by_uuid(db, user_id).await? else {
            return Ok(0);
        };
        let result = project_member::Entity::delete_many()
            .filter(project_member::Column::ProjectId.eq(project_row_id))
            .filter(project_member::Column::UserId.eq(user_row_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
