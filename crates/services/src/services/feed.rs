use std::collections::HashSet;

use auth::{AuthContext, AuthError};
use db::{
    DbErr, TransactionTrait,
    models::{
        feed_post::{CreateFeedPost, FeedPost, FeedPostError},
        notification::Notification,
        workspace::Workspace,
        workspace_member::WorkspaceMember,
    },
};
use sea_orm::DatabaseConnection;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Post(#[from] FeedPostError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Debug)]
pub struct PostOutcome {
    pub post: FeedPost,
    pub notified_user_ids: Vec<Uuid>,
}

#[derive(Clone, Default)]
pub struct FeedService;

impl FeedService {
    pub fn new() -> Self {
        Self
    }

    /// Persist the post and fan notifications out to every distinct
    /// mentioned user that is a workspace member and not the author, all in
    /// one transaction so readers see notifications as soon as the post
    /// lands. Mentions of non-members are dropped without error so a
    /// mention can never probe who belongs to the workspace.
    pub async fn create_post(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        workspace: &Workspace,
        data: &CreateFeedPost,
    ) -> Result<PostOutcome> {
        auth::require(auth::can_post_feed(db, ctx, workspace).await?)?;

        let tx = db.begin().await?;
        let post = FeedPost::create(&tx, workspace.id, data, Uuid::new_v4(), ctx.user_id).await?;

        let mut seen = HashSet::new();
        let mut notified_user_ids = Vec::new();
        for mentioned in &post.mentioned_user_ids {
            if *mentioned == ctx.user_id || !seen.insert(*mentioned) {
                continue;
            }
            let is_member = WorkspaceMember::role_of(&tx, workspace.id, *mentioned)
                .await?
                .is_some();
            if !is_member {
                tracing::debug!(post_id = %post.id, "Dropping mention of non-member");
                continue;
            }
            Notification::create(&tx, post.id, *mentioned).await?;
            notified_user_ids.push(*mentioned);
        }
        tx.commit().await?;

        Ok(PostOutcome {
            post,
            notified_user_ids,
        })
    }

    pub async fn update_post(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        post: &FeedPost,
        content: &str,
    ) -> Result<FeedPost> {
        auth::require(auth::can_edit_feed_post(ctx, post))?;
        Ok(FeedPost::update_content(db, post.id, content).await?)
    }

    pub async fn delete_post(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        post: &FeedPost,
    ) -> Result<u64> {
        auth::require(auth::can_edit_feed_post(ctx, post))?;
        Ok(FeedPost::delete(db, post.id).await?)
    }

    pub async fn mark_read(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        notification_id: Uuid,
    ) -> Result<Notification> {
        let notification = Notification::find_by_id(db, notification_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        auth::require(auth::can_touch_notification(ctx, &notification))?;
        Ok(Notification::mark_read(db, notification.id).await?)
    }

    pub async fn mark_all_read(&self, db: &DatabaseConnection, ctx: &AuthContext) -> Result<u64> {
        Ok(Notification::mark_all_read(db, ctx.user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use db::{
        models::{
            user::{CreateUser, User},
            workspace::CreateWorkspace,
        },
        types::{GlobalRole, MemberRole},
    };
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn create_ctx(db: &DatabaseConnection, email: &str, role: GlobalRole) -> AuthContext {
        let user = User::create(
            db,
            &CreateUser {
                email: email.to_string(),
                display_name: email.to_string(),
                global_role: Some(role),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        AuthContext::resolve(db, user.id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn mentions_notify_members_only_excluding_author() {
        let db = setup_db().await;
        let author = create_ctx(&db, "author@example.com", GlobalRole::Manager).await;
        let member = create_ctx(&db, "member@example.com", GlobalRole::Executor).await;
        let outsider = create_ctx(&db, "outsider@example.com", GlobalRole::Executor).await;

        let workspace = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Equipe".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            author.user_id,
        )
        .await
        .unwrap();
        WorkspaceMember::upsert(&db, workspace.id, member.user_id, MemberRole::Executor)
            .await
            .unwrap();

        let service = FeedService::new();
        let outcome = service
            .create_post(
                &db,
                &author,
                &workspace,
                &CreateFeedPost {
                    content: "Reunião às 10h".to_string(),
                    task_ids: None,
                    mentioned_user_ids: Some(vec![
                        member.user_id,
                        member.user_id, // duplicate mention collapses
                        outsider.user_id,
                        author.user_id,
                    ]),
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.notified_user_ids, vec![member.user_id]);
        let notifications = Notification::find_for_recipient(&db, member.user_id)
            .await
            .unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].feed_post_id, outcome.post.id);
        assert!(!notifications[0].read);

        assert!(
            Notification::find_for_recipient(&db, outsider.user_id)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            Notification::find_for_recipient(&db, author.user_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn only_the_recipient_marks_a_notification_read() {
        let db = setup_db().await;
        let author = create_ctx(&db, "author@example.com", GlobalRole::Manager).await;
        let member = create_ctx(&db, "member@example.com", GlobalRole::Executor).await;

        let workspace = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Equipe".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            author.user_id,
        )
        .await
        .unwrap();
        WorkspaceMember::upsert(&db, workspace.id, member.user_id, MemberRole::Viewer)
            .await
            .unwrap();

        let service = FeedService::new();
        let outcome = service
            .create_post(
                &db,
                &author,
                &workspace,
                &CreateFeedPost {
                    content: "Aviso".to_string(),
                    task_ids: None,
                    mentioned_user_ids: Some(vec![member.user_id]),
                },
            )
            .await
            .unwrap();

        let notification = Notification::find_for_recipient(&db, member.user_id)
            .await
            .unwrap()
            .remove(0);

        let result = service.mark_read(&db, &author, notification.id).await;
        assert!(matches!(result, Err(FeedError::Auth(AuthError::Unauthorized))));

        let marked = service.mark_read(&db, &member, notification.id).await.unwrap();
        assert!(marked.read);
        assert_eq!(outcome.notified_user_ids, vec![member.user_id]);
    }

    #[tokio::test]
    async fn post_edits_are_author_or_super_user_only() {
        let db = setup_db().await;
        let author = create_ctx(&db, "author@example.com", GlobalRole::Manager).await;
        let member = create_ctx(&db, "member@example.com", GlobalRole::Executor).await;

        let workspace = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Equipe".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            author.user_id,
        )
        .await
        .unwrap();
        WorkspaceMember::upsert(&db, workspace.id, member.user_id, MemberRole::Executor)
            .await
            .unwrap();

        let service = FeedService::new();
        let outcome = service
            .create_post(
                &db,
                &author,
                &workspace,
                &CreateFeedPost {
                    content: "Original".to_string(),
                    task_ids: None,
                    mentioned_user_ids: None,
                },
            )
            .await
            .unwrap();

        let result = service
            .update_post(&db, &member, &outcome.post, "Alterado")
            .await;
        assert!(matches!(result, Err(FeedError::Auth(AuthError::Unauthorized))));

        let updated = service
            .update_post(&db, &author, &outcome.post, "Alterado")
            .await
            .unwrap();
        assert_eq!(updated.content, "Alterado");
    }
}
