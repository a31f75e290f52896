use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    entities::{super_user, user},
    models::ids,
    types::GlobalRole,
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("User not found")]
    NotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub global_role: GlobalRole,
    pub password_set: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub global_role: Option<GlobalRole>,
}

impl User {
    fn from_model(model: user::Model) -> Self {
        Self {
            id: model.uuid,
            email: model.email,
            display_name: model.display_name,
            global_role: model.global_role,
            password_set: model.password_set,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = user::Entity::find()
            .filter(user::Column::Uuid.eq(id))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> Result<Option<Self>, DbErr> {
        let record = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateUser,
        user_id: Uuid,
    ) -> Result<Self, UserError> {
        let email = data.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(UserError::ValidationError("Email is required".to_string()));
        }
        let display_name = data.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(UserError::ValidationError(
                "Display name is required".to_string(),
            ));
        }

        let now = Utc::now();
        let active = user::ActiveModel {
            uuid: Set(user_id),
            email: Set(email),
            display_name: Set(display_name),
            global_role: Set(data.global_role.unwrap_or_default()),
            password_set: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn set_global_role<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        role: GlobalRole,
    ) -> Result<Self, UserError> {
        let record = user::Entity::find()
            .filter(user::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(UserError::NotFound)?;

        let mut active: user::ActiveModel = record.into();
        active.global_role = Set(role);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }

    pub async fn mark_password_set<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Self, UserError> {
        let record = user::Entity::find()
            .filter(user::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(UserError::NotFound)?;

        let mut active: user::ActiveModel = record.into();
        active.password_set = Set(true);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }
}

/// The global super-user set, kept as its own table so membership is an
/// explicit grant rather than a role value.
pub struct SuperUser;

impl SuperUser {
    pub async fn contains<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<bool, DbErr> {
        let Some(user_row_id) = ids::user_id_by_uuid(db, user_id).await? else {
            return Ok(false);
        };
        let record = super_user::Entity::find()
            .filter(super_user::Column::UserId.eq(user_row_id))
            .one(db)
            .await?;
        Ok(record.is_some())
    }

    pub async fn grant<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<(), UserError> {
        let user_row_id = ids::user_id_by_uuid(db, user_id)
            .await?
            .ok_or(UserError::NotFound)?;
        let existing = super_user::Entity::find()
            .filter(super_user::Column::UserId.eq(user_row_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }
        let active = super_user::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            user_id: Set(user_row_id),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        active.insert(db).await?;
        Ok(())
    }

    pub async fn revoke<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, DbErr> {
        let Some(user_row_id) = ids::user_id_by_uuid(db, user_id).await? else {
            return Ok(0);
        };
        let result = super_user::Entity::delete_many()
            .filter(super_user::Column::UserId.eq(user_row_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
