use auth::{AuthContext, AuthError};
use chrono::{DateTime, Utc};
use db::{
    DbErr,
    models::{
        task_audit_log::TaskAuditLog, task_due_date_change::TaskDueDateChange,
        task_time_entry::TaskTimeEntry, workspace::Workspace,
    },
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Everything the daily-summary side channel needs for one workspace and
/// one bounded time range.
#[derive(Debug, Serialize, TS)]
pub struct ActivityWindow {
    pub audit_logs: Vec<TaskAuditLog>,
    pub time_entries: Vec<TaskTimeEntry>,
    pub due_date_changes: Vec<TaskDueDateChange>,
}

#[derive(Clone, Default)]
pub struct ActivityService;

impl ActivityService {
    pub fn new() -> Self {
        Self
    }

    pub async fn window(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        workspace: &Workspace,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ActivityWindow, ActivityError> {
        if from >= to {
            return Err(ActivityError::ValidationError(
                "Window start must precede its end".to_string(),
            ));
        }
        auth::require(auth::can_read_workspace(db, ctx, workspace).await?)?;

        Ok(ActivityWindow {
            audit_logs: TaskAuditLog::find_window_for_workspace(db, workspace.id, from, to)
                .await?,
            time_entries: TaskTimeEntry::find_window_for_workspace(db, workspace.id, from, to)
                .await?,
            due_date_changes: TaskDueDateChange::find_window_for_workspace(
                db,
                workspace.id,
                from,
                to,
            )
            .await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use db::{
        models::{
            project::{CreateProject, Project},
            task::{CreateTask, Task, UpdateTask},
            user::{CreateUser, User},
            workspace::CreateWorkspace,
        },
        types::{GlobalRole, TaskStatus},
    };
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;
    use uuid::Uuid;

    use crate::services::task_update::TaskService;

    use super::*;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn window_is_scoped_to_workspace_and_range() {
        let db = setup_db().await;
        let user = User::create(
            &db,
            &CreateUser {
                email: "owner@example.com".to_string(),
                display_name: "Owner".to_string(),
                global_role: Some(GlobalRole::Manager),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let ctx = AuthContext::resolve(&db, user.id).await.unwrap().unwrap();

        let workspace = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Equipe".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            user.id,
        )
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
            user.id,
        )
        .await
        .unwrap();

        let task_service = TaskService::new();
        let task = task_service
            .create_task(&db, &ctx, project.id, &CreateTask::from_name("Tarefa"))
            .await
            .unwrap();
        task_service
            .apply_update(
                &db,
                &ctx,
                &task,
                &UpdateTask {
                    status: Some(TaskStatus::EmExecucao),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let service = ActivityService::new();
        let now = Utc::now();
        let window = service
            .window(
                &db,
                &ctx,
                &workspace,
                now - Duration::hours(1),
                now + Duration::hours(1),
            )
            .await
            .unwrap();
        assert_eq!(window.audit_logs.len(), 1);
        assert!(window.time_entries.is_empty());
        assert!(window.due_date_changes.is_empty());

        // A window in the past sees nothing.
        let empty = service
            .window(
                &db,
                &ctx,
                &workspace,
                now - Duration::days(2),
                now - Duration::days(1),
            )
            .await
            .unwrap();
        assert!(empty.audit_logs.is_empty());

        // Reversed bounds are rejected before any read.
        let reversed = service
            .window(&db, &ctx, &workspace, now, now - Duration::hours(1))
            .await;
        assert!(matches!(reversed, Err(ActivityError::ValidationError(_))));

        let _ = Task::find_by_id(&db, task.id).await.unwrap();
    }
}
