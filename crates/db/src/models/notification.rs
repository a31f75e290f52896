use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{entities::notification, models::ids};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Notification {
    pub id: Uuid,
    pub feed_post_id: Uuid,
    pub recipient_id: Uuid,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    async fn from_model<C: ConnectionTrait>(
        db: &C,
        model: notification::Model,
    ) -> Result<Self, DbErr> {
        let feed_post_id = ids::feed_post_uuid_by_id(db, model.feed_post_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Feed post not found".to_string()))?;
        let recipient_id = ids::user_uuid_by_id(db, model.recipient_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;
        Ok(Self {
            id: model.uuid,
            feed_post_id,
            recipient_id,
            read: model.read,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = notification::Entity::find()
            .filter(notification::Column::Uuid.eq(id))
            .one(db)
            .await?;
        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        feed_post_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Self, DbErr> {
        let feed_post_row_id = ids::feed_post_id_by_uuid(db, feed_post_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Feed post not found".to_string()))?;
        let recipient_row_id = ids::user_id_by_uuid(db, recipient_id)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

        let now = Utc::now();
        let active = notification::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            feed_post_id: Set(feed_post_row_id),
            recipient_id: Set(recipient_row_id),
            read: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Self::from_model(db, model).await
    }

    /// All notifications for the recipient, unread first, newest first.
    pub async fn find_for_recipient<C: ConnectionTrait>(
        db: &C,
        recipient_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let Some(recipient_row_id) = ids::user_id_by_uuid(db, recipient_id).await? else {
            return Ok(Vec::new());
        };
        let models = notification::Entity::find()
            .filter(notification::Column::RecipientId.eq(recipient_row_id))
            .order_by_asc(notification::Column::Read)
            .order_by_desc(notification::Column::CreatedAt)
            .all(db)
            .await?;

        let mut notifications = Vec::with_capacity(models.len());
        for model in models {
            notifications.push(Self::from_model(db, model).await?);
        }
        Ok(notifications)
    }

    pub async fn mark_read<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Self, DbErr> {
        let record = notification::Entity::find()
            .filter(notification::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound("Notification not found".to_string()))?;

        let mut active: notification::ActiveModel = record.into();
        active.read = Set(true);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(db).await?;
        Self::from_model(db, updated).await
    }

    pub async fn mark_all_read<C: ConnectionTrait>(
        db: &C,
        recipient_id: Uuid,
    ) -> Result<u64, DbErr> {
        let Some(recipient_row_id) = ids::user_id_by_uuid(db, recipient_id).await? else {
            return Ok(0);
        };
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .col_expr(
                notification::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(notification::Column::RecipientId.eq(recipient_row_id))
            .filter(notification::Column::Read.eq(false))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
