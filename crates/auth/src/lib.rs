//! Authorization predicates for workspaces, projects, tasks and their
//! sub-records. Every data-layer mutation goes through these checks; the
//! HTTP layer only decides which predicate applies.
//!
//! Predicates read the membership tables directly and never call one
//! another, so no check can recurse back into itself through a policy.

use db::{ConnectionTrait, DbErr};
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

use db::{
    models::{
        feed_post::FeedPost,
        notification::Notification,
        project::Project,
        project_member::ProjectMember,
        task_comment::TaskComment,
        user::{SuperUser, User},
        workspace::Workspace,
        workspace_member::WorkspaceMember,
    },
    types::{GlobalRole, MemberRole},
};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Deliberately carries no detail: a denied check must not reveal
    /// whether the resource exists.
    #[error("Not authorized")]
    Unauthorized,
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Resolved identity of the acting user.
#[derive(Debug, Clone, Serialize, TS)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub global_role: GlobalRole,
    pub is_super_user: bool,
    pub password_set: bool,
}

impl AuthContext {
    /// Resolve the acting user's global role and super-user flag. Returns
    /// None for unknown users.
    pub async fn resolve<C: ConnectionTrait>(
        db: &C,
        user_id: Uuid,
    ) -> Result<Option<Self>, DbErr> {
        let Some(user) = User::find_by_id(db, user_id).await? else {
            return Ok(None);
        };
        let is_super_user = SuperUser::contains(db, user_id).await?;
        Ok(Some(Self {
            user_id: user.id,
            global_role: user.global_role,
            is_super_user,
            password_set: user.password_set,
        }))
    }

    /// The ownership fast path: global manager acting on a resource they
    /// created. This is stricter than holding a manager membership role —
    /// both halves are required.
    pub fn is_owning_manager(&self, created_by: Uuid) -> bool {
        self.global_role == GlobalRole::Manager && self.user_id == created_by
    }
}

/// Collapse a predicate result into the uniform denial.
pub fn require(allowed: bool) -> Result<(), AuthError> {
    if allowed { Ok(()) } else { Err(AuthError::Unauthorized) }
}

pub async fn workspace_role<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    workspace_id: Uuid,
) -> Result<Option<MemberRole>, DbErr> {
    WorkspaceMember::role_of(db, workspace_id, ctx.user_id).await
}

pub async fn project_role<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    project_id: Uuid,
) -> Result<Option<MemberRole>, DbErr> {
    ProjectMember::role_of(db, project_id, ctx.user_id).await
}

pub fn can_create_workspace(ctx: &AuthContext) -> bool {
    ctx.is_super_user || ctx.global_role == GlobalRole::Manager
}

pub async fn can_read_workspace<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    workspace: &Workspace,
) -> Result<bool, DbErr> {
    if ctx.is_super_user {
        return Ok(true);
    }
    let role = WorkspaceMember::role_of(db, workspace.id, ctx.user_id).await?;
    Ok(role.is_some())
}

/// Update/delete: creator with global manager role, or super-user. A manager
/// membership alone is not enough, nor is bare ownership.
pub fn can_write_workspace(ctx: &AuthContext, workspace: &Workspace) -> bool {
    ctx.is_super_user || ctx.is_owning_manager(workspace.created_by)
}

pub fn can_create_project(ctx: &AuthContext) -> bool {
    ctx.is_super_user || ctx.global_role == GlobalRole::Manager
}

pub async fn can_read_project<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    project: &Project,
) -> Result<bool, DbErr> {
    if ctx.is_super_user {
        return Ok(true);
    }
    if ProjectMember::role_of(db, project.id, ctx.user_id)
        .await?
        .is_some()
    {
        return Ok(true);
    }
    let workspace_role = WorkspaceMember::role_of(db, project.workspace_id, ctx.user_id).await?;
    Ok(workspace_role == Some(MemberRole::Manager))
}

pub fn can_write_project(ctx: &AuthContext, project: &Project) -> bool {
    ctx.is_super_user || ctx.is_owning_manager(project.created_by)
}

/// Tasks and their sub-records (time entries, due-date changes, audit rows,
/// comments) share one access rule keyed on the owning project: any project
/// member, any member of the project's workspace, the project creator, or a
/// super-user. The whole workspace team can work on any project's board.
pub async fn can_access_task<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    project: &Project,
) -> Result<bool, DbErr> {
    if ctx.is_super_user || ctx.user_id == project.created_by {
        return Ok(true);
    }
    if ProjectMember::role_of(db, project.id, ctx.user_id)
        .await?
        .is_some()
    {
        return Ok(true);
    }
    let workspace_role = WorkspaceMember::role_of(db, project.workspace_id, ctx.user_id).await?;
    Ok(workspace_role.is_some())
}

pub async fn can_read_vocabulary<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    workspace: &Workspace,
) -> Result<bool, DbErr> {
    if ctx.is_super_user {
        return Ok(true);
    }
    let role = WorkspaceMember::role_of(db, workspace.id, ctx.user_id).await?;
    Ok(role.is_some())
}

/// Sectors and task types are manager-curated vocabularies.
pub async fn can_manage_vocabulary<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    workspace: &Workspace,
) -> Result<bool, DbErr> {
    if ctx.is_super_user {
        return Ok(true);
    }
    let role = WorkspaceMember::role_of(db, workspace.id, ctx.user_id).await?;
    Ok(role == Some(MemberRole::Manager))
}

/// Membership rows are visible to the member themself, the parent resource's
/// owning manager, and super-users.
pub fn can_read_membership(ctx: &AuthContext, parent_created_by: Uuid, member_user_id: Uuid) -> bool {
    ctx.is_super_user || ctx.user_id == member_user_id || ctx.is_owning_manager(parent_created_by)
}

/// Adding, removing or re-roling members requires the one true owner (the
/// parent's creator holding the global manager role) or a super-user. Any
/// other manager member is deliberately excluded.
pub fn can_manage_membership(ctx: &AuthContext, parent_created_by: Uuid) -> bool {
    ctx.is_super_user || ctx.is_owning_manager(parent_created_by)
}

pub async fn can_read_feed<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    workspace: &Workspace,
) -> Result<bool, DbErr> {
    if ctx.is_super_user || ctx.user_id == workspace.created_by {
        return Ok(true);
    }
    let role = WorkspaceMember::role_of(db, workspace.id, ctx.user_id).await?;
    Ok(role.is_some())
}

/// Any workspace member may post, viewers included.
pub async fn can_post_feed<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    workspace: &Workspace,
) -> Result<bool, DbErr> {
    if ctx.is_super_user {
        return Ok(true);
    }
    let role = WorkspaceMember::role_of(db, workspace.id, ctx.user_id).await?;
    Ok(role.is_some())
}

pub fn can_edit_feed_post(ctx: &AuthContext, post: &FeedPost) -> bool {
    ctx.is_super_user || ctx.user_id == post.created_by
}

pub fn can_edit_comment(ctx: &AuthContext, comment: &TaskComment) -> bool {
    ctx.is_super_user || ctx.user_id == comment.created_by
}

pub fn can_touch_notification(ctx: &AuthContext, notification: &Notification) -> bool {
    ctx.is_super_user || ctx.user_id == notification.recipient_id
}

/// Presence rows are written only by the user themself, and only while they
/// are a member of the workspace.
pub async fn can_touch_presence<C: ConnectionTrait>(
    db: &C,
    ctx: &AuthContext,
    workspace: &Workspace,
    target_user_id: Uuid,
) -> Result<bool, DbErr> {
    if ctx.user_id != target_user_id {
        return Ok(false);
    }
    let role = WorkspaceMember::role_of(db, workspace.id, ctx.user_id).await?;
    Ok(role.is_some())
}

#[cfg(test)]
mod tests {
    use db::models::{
        project::CreateProject,
        user::CreateUser,
        workspace::CreateWorkspace,
    };
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn create_user(
        db: &sea_orm::DatabaseConnection,
        email: &str,
        role: GlobalRole,
    ) -> AuthContext {
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

    async fn create_workspace(
        db: &sea_orm::DatabaseConnection,
        owner: &AuthContext,
    ) -> Workspace {
        Workspace::create(
            db,
            &CreateWorkspace {
                name: "Equipe".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            owner.user_id,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn workspace_creator_becomes_manager_member() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner@example.com", GlobalRole::Manager).await;
        let workspace = create_workspace(&db, &owner).await;

        assert_eq!(workspace.created_by, owner.user_id);
        assert_eq!(
            workspace_role(&db, &owner, workspace.id).await.unwrap(),
            Some(MemberRole::Manager)
        );
        assert!(can_read_workspace(&db, &owner, &workspace).await.unwrap());
    }

    #[tokio::test]
    async fn workspace_write_needs_ownership_and_manager_role() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner@example.com", GlobalRole::Manager).await;
        let other_manager = create_user(&db, "manager@example.com", GlobalRole::Manager).await;
        let workspace = create_workspace(&db, &owner).await;

        // A manager member who is not the creator still cannot write.
        WorkspaceMember::upsert(&db, workspace.id, other_manager.user_id, MemberRole::Manager)
            .await
            .unwrap();

        assert!(can_write_workspace(&owner, &workspace));
        assert!(!can_write_workspace(&other_manager, &workspace));

        SuperUser::grant(&db, other_manager.user_id).await.unwrap();
        let elevated = AuthContext::resolve(&db, other_manager.user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(can_write_workspace(&elevated, &workspace));
    }

    #[tokio::test]
    async fn non_member_cannot_read_workspace() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner@example.com", GlobalRole::Manager).await;
        let outsider = create_user(&db, "outsider@example.com", GlobalRole::Executor).await;
        let workspace = create_workspace(&db, &owner).await;

        assert!(!can_read_workspace(&db, &outsider, &workspace).await.unwrap());
        assert!(require(false).is_err());
    }

    #[tokio::test]
    async fn workspace_members_can_access_any_project_task() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner@example.com", GlobalRole::Manager).await;
        let teammate = create_user(&db, "teammate@example.com", GlobalRole::Executor).await;
        let outsider = create_user(&db, "outsider@example.com", GlobalRole::Executor).await;
        let workspace = create_workspace(&db, &owner).await;

        // Teammate joins only the workspace, not the project.
        WorkspaceMember::upsert(&db, workspace.id, teammate.user_id, MemberRole::Executor)
            .await
            .unwrap();

        let project = Project::create(
            &db,
            workspace.id,
            &CreateProject {
                name: "Lançamento".to_string(),
                summary: None,
                status: None,
            },
            Uuid::new_v4(),
            owner.user_id,
        )
        .await
        .unwrap();

        assert!(can_access_task(&db, &teammate, &project).await.unwrap());
        assert!(can_access_task(&db, &owner, &project).await.unwrap());
        assert!(!can_access_task(&db, &outsider, &project).await.unwrap());
    }

    #[tokio::test]
    async fn workspace_viewer_cannot_delete_project() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner@example.com", GlobalRole::Manager).await;
        let viewer = create_user(&db, "viewer@example.com", GlobalRole::Viewer).await;
        let workspace = create_workspace(&db, &owner).await;

        WorkspaceMember::upsert(&db, workspace.id, viewer.user_id, MemberRole::Viewer)
            .await
            .unwrap();

        let project = Project::create(
            &db,
            workspace.id,
            &CreateProject {
                name: "Projeto".to_string(),
                summary: None,
                status: None,
            },
            Uuid::new_v4(),
            owner.user_id,
        )
        .await
        .unwrap();

        assert!(!can_write_project(&viewer, &project));
        assert!(can_write_project(&owner, &project));
    }

    #[tokio::test]
    async fn membership_management_excludes_non_owner_managers() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner@example.com", GlobalRole::Manager).await;
        let other_manager = create_user(&db, "manager@example.com", GlobalRole::Manager).await;
        let member = create_user(&db, "member@example.com", GlobalRole::Executor).await;
        let workspace = create_workspace(&db, &owner).await;

        WorkspaceMember::upsert(&db, workspace.id, other_manager.user_id, MemberRole::Manager)
            .await
            .unwrap();

        assert!(can_manage_membership(&owner, workspace.created_by));
        assert!(!can_manage_membership(&other_manager, workspace.created_by));

        // Members can read their own row but not manage it.
        assert!(can_read_membership(&member, workspace.created_by, member.user_id));
        assert!(!can_read_membership(&member, workspace.created_by, owner.user_id));
    }

    #[tokio::test]
    async fn viewers_may_post_to_the_feed() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner@example.com", GlobalRole::Manager).await;
        let viewer = create_user(&db, "viewer@example.com", GlobalRole::Viewer).await;
        let outsider = create_user(&db, "outsider@example.com", GlobalRole::Viewer).await;
        let workspace = create_workspace(&db, &owner).await;

        WorkspaceMember::upsert(&db, workspace.id, viewer.user_id, MemberRole::Viewer)
            .await
            .unwrap();

        assert!(can_post_feed(&db, &viewer, &workspace).await.unwrap());
        assert!(!can_post_feed(&db, &outsider, &workspace).await.unwrap());
    }

    #[tokio::test]
    async fn comments_and_notifications_are_owner_scoped() {
        let db = setup_db().await;
        let author = create_user(&db, "author@example.com", GlobalRole::Executor).await;
        let other = create_user(&db, "other@example.com", GlobalRole::Manager).await;
        let admin = create_user(&db, "admin@example.com", GlobalRole::Viewer).await;
        SuperUser::grant(&db, admin.user_id).await.unwrap();
        let admin = AuthContext::resolve(&db, admin.user_id).await.unwrap().unwrap();

        let now = chrono::Utc::now();
        let comment = TaskComment {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            content: "Revisado".to_string(),
            created_by: author.user_id,
            created_at: now,
            updated_at: now,
        };
        assert!(can_edit_comment(&author, &comment));
        assert!(!can_edit_comment(&other, &comment));
        assert!(can_edit_comment(&admin, &comment));

        let notification = Notification {
            id: Uuid::new_v4(),
            feed_post_id: Uuid::new_v4(),
            recipient_id: author.user_id,
            read: false,
            created_at: now,
            updated_at: now,
        };
        assert!(can_touch_notification(&author, &notification));
        assert!(!can_touch_notification(&other, &notification));
        assert!(can_touch_notification(&admin, &notification));
    }

    #[tokio::test]
    async fn presence_is_self_only_and_member_only() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner@example.com", GlobalRole::Manager).await;
        let member = create_user(&db, "member@example.com", GlobalRole::Executor).await;
        let outsider = create_user(&db, "outsider@example.com", GlobalRole::Executor).await;
        let workspace = create_workspace(&db, &owner).await;

        WorkspaceMember::upsert(&db, workspace.id, member.user_id, MemberRole::Executor)
            .await
            .unwrap();

        assert!(
            can_touch_presence(&db, &member, &workspace, member.user_id)
                .await
                .unwrap()
        );
        assert!(
            !can_touch_presence(&db, &member, &workspace, owner.user_id)
                .await
                .unwrap()
        );
        assert!(
            !can_touch_presence(&db, &outsider, &workspace, outsider.user_id)
                .await
                .unwrap()
        );
    }
}
