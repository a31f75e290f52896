use async_trait::async_trait;
use auth::{AuthContext, AuthError};
use db::{
    DbErr,
    models::{
        project::Project,
        project_member::ProjectMember,
        user::{CreateUser, User, UserError},
        workspace::Workspace,
        workspace_member::WorkspaceMember,
    },
    types::{GlobalRole, MemberRole},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Workspace not found")]
    WorkspaceNotFound,
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Invite delivery failed: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, MembershipError>;

/// External collaborator that resolves an invited email to a stable user id
/// (creating the profile and delivering the invite as needed).
#[async_trait]
pub trait InviteService: Send + Sync {
    async fn resolve_user(
        &self,
        db: &DatabaseConnection,
        email: &str,
        role: GlobalRole,
    ) -> Result<Uuid>;
}

/// Built-in resolver: creates the local profile directly. The invited user
/// starts with `password_set = false` and must finish setup on first login.
#[derive(Clone, Default)]
pub struct LocalInviteService;

#[async_trait]
impl InviteService for LocalInviteService {
    async fn resolve_user(
        &self,
        db: &DatabaseConnection,
        email: &str,
        role: GlobalRole,
    ) -> Result<Uuid> {
        if let Some(user) = User::find_by_email(db, email).await? {
            return Ok(user.id);
        }
        let display_name = email.split('@').next().unwrap_or(email).to_string();
        let user = User::create(
            db,
            &CreateUser {
                email: email.to_string(),
                display_name,
                global_role: Some(role),
            },
            Uuid::new_v4(),
        )
        .await?;
        Ok(user.id)
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct InviteRequest {
    pub email: String,
    pub role: MemberRole,
    pub workspace_ids: Vec<Uuid>,
    pub project_ids: Vec<Uuid>,
}

#[derive(Debug)]
pub struct InviteOutcome {
    pub user_id: Uuid,
    pub workspace_memberships: Vec<WorkspaceMember>,
    pub project_memberships: Vec<ProjectMember>,
}

fn global_role_for(role: MemberRole) -> GlobalRole {
    match role {
        MemberRole::Manager => GlobalRole::Manager,
        MemberRole::Executor => GlobalRole::Executor,
        MemberRole::Viewer => GlobalRole::Viewer,
    }
}

#[derive(Clone, Default)]
pub struct MembershipService;

impl MembershipService {
    pub fn new() -> Self {
        Self
    }

    /// Invite a user into every workspace and project in scope. The actor
    /// must hold membership-management rights on each scope id; the upserts
    /// are idempotent, so repeating an invite is harmless.
    pub async fn invite(
        &self,
        db: &DatabaseConnection,
        invites: &dyn InviteService,
        ctx: &AuthContext,
        request: &InviteRequest,
    ) -> Result<InviteOutcome> {
        let email = request.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(MembershipError::ValidationError(
                "Email is required".to_string(),
            ));
        }
        if request.workspace_ids.is_empty() && request.project_ids.is_empty() {
            return Err(MembershipError::ValidationError(
                "At least one workspace or project is required".to_string(),
            ));
        }

        // Authorization first, across the whole scope, before any write.
        let mut workspaces = Vec::with_capacity(request.workspace_ids.len());
        for workspace_id in &request.workspace_ids {
            let workspace = Workspace::find_by_id(db, *workspace_id)
                .await?
                .ok_or(AuthError::Unauthorized)?;
            auth::require(auth::can_manage_membership(ctx, workspace.created_by))?;
            workspaces.push(workspace);
        }
        let mut projects = Vec::with_capacity(request.project_ids.len());
        for project_id in &request.project_ids {
            let project = Project::find_by_id(db, *project_id)
                .await?
                .ok_or(AuthError::Unauthorized)?;
            auth::require(auth::can_manage_membership(ctx, project.created_by))?;
            projects.push(project);
        }

        let user_id = invites
            .resolve_user(db, &email, global_role_for(request.role))
            .await?;

        let mut workspace_memberships = Vec::with_capacity(workspaces.len());
        for workspace in &workspaces {
            workspace_memberships
                .push(WorkspaceMember::upsert(db, workspace.id, user_id, request.role).await?);
        }
        let mut project_memberships = Vec::with_capacity(projects.len());
        for project in &projects {
            project_memberships
                .push(ProjectMember::upsert(db, project.id, user_id, request.role).await?);
        }

        tracing::info!(
            user_id = %user_id,
            workspaces = workspace_memberships.len(),
            projects = project_memberships.len(),
            "Invite processed"
        );

        Ok(InviteOutcome {
            user_id,
            workspace_memberships,
            project_memberships,
        })
    }

    pub async fn remove_workspace_member(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        workspace: &Workspace,
        user_id: Uuid,
    ) -> Result<u64> {
        auth::require(auth::can_manage_membership(ctx, workspace.created_by))?;
        Ok(WorkspaceMember::remove(db, workspace.id, user_id).await?)
    }

    pub async fn change_workspace_member_role(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        workspace: &Workspace,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<WorkspaceMember> {
        auth::require(auth::can_manage_membership(ctx, workspace.created_by))?;
        Ok(WorkspaceMember::upsert(db, workspace.id, user_id, role).await?)
    }

    pub async fn remove_project_member(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        project: &Project,
        user_id: Uuid,
    ) -> Result<u64> {
        auth::require(auth::can_manage_membership(ctx, project.created_by))?;
        Ok(ProjectMember::remove(db, project.id, user_id).await?)
    }

    pub async fn change_project_member_role(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        project: &Project,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<ProjectMember> {
        auth::require(auth::can_manage_membership(ctx, project.created_by))?;
        Ok(ProjectMember::upsert(db, project.id, user_id, role).await?)
    }
}

#[cfg(test)]
mod tests {
    use db::models::workspace::CreateWorkspace;
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
    async fn invite_creates_profile_and_membership_idempotently() {
        let db = setup_db().await;
        let owner = create_ctx(&db, "owner@example.com", GlobalRole::Manager).await;
        let workspace = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Equipe".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            owner.user_id,
        )
        .await
        .unwrap();

        let service = MembershipService::new();
        let invites = LocalInviteService;
        let request = InviteRequest {
            email: "Nova@Example.com".to_string(),
            role: MemberRole::Executor,
            workspace_ids: vec![workspace.id],
            project_ids: Vec::new(),
        };

        let outcome = service.invite(&db, &invites, &owner, &request).await.unwrap();
        let invited = User::find_by_id(&db, outcome.user_id).await.unwrap().unwrap();
        assert_eq!(invited.email, "nova@example.com");
        assert_eq!(invited.global_role, GlobalRole::Executor);
        assert!(!invited.password_set);

        // Repeating the invite reuses the profile and the membership row.
        let again = service.invite(&db, &invites, &owner, &request).await.unwrap();
        assert_eq!(again.user_id, outcome.user_id);
        let members = WorkspaceMember::find_by_workspace_id(&db, workspace.id)
            .await
            .unwrap();
        assert_eq!(members.len(), 2); // owner + invitee
    }

    #[tokio::test]
    async fn invite_requires_management_rights_on_every_scope_id() {
        let db = setup_db().await;
        let owner = create_ctx(&db, "owner@example.com", GlobalRole::Manager).await;
        let other_owner = create_ctx(&db, "other@example.com", GlobalRole::Manager).await;
        let own_workspace = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Minha".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            owner.user_id,
        )
        .await
        .unwrap();
        let foreign_workspace = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Alheia".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            other_owner.user_id,
        )
        .await
        .unwrap();

        let service = MembershipService::new();
        let invites = LocalInviteService;
        let request = InviteRequest {
            email: "nova@example.com".to_string(),
            role: MemberRole::Viewer,
            workspace_ids: vec![own_workspace.id, foreign_workspace.id],
            project_ids: Vec::new(),
        };

        let result = service.invite(&db, &invites, &owner, &request).await;
        assert!(matches!(
            result,
            Err(MembershipError::Auth(AuthError::Unauthorized))
        ));

        // Nothing was written, not even for the authorized half of the scope.
        assert!(User::find_by_email(&db, "nova@example.com").await.unwrap().is_none());
    }
}
