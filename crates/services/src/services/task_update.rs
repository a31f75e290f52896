use auth::{AuthContext, AuthError};
use chrono::NaiveDate;
use db::{
    DbErr, TransactionTrait,
    models::{
        project::Project,
        task::{CreateTask, Task, TaskError, UpdateTask},
        task_audit_log::{AuditEntry, TaskAuditLog},
        task_due_date_change::TaskDueDateChange,
        task_time_entry::{CreateTimeEntry, TaskTimeEntry, TimeEntryError},
    },
    types::{TaskPriority, TaskStatus},
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

// Audit field labels as shown in the product's history panel.
const FIELD_NAME: &str = "Nome da Tarefa";
const FIELD_DESCRIPTION: &str = "Descrição";
const FIELD_SECTOR: &str = "Setor";
const FIELD_TASK_TYPE: &str = "Tipo de Tarefa";
const FIELD_EXECUTORS: &str = "Executores";
const FIELD_VALIDATORS: &str = "Validadores";
const FIELD_INFORMED: &str = "Informados";
const FIELD_START_DATE: &str = "Data de Início";
const FIELD_ESTIMATED_MINUTES: &str = "Tempo Estimado";
const FIELD_PRIORITY: &str = "Prioridade";
const FIELD_STATUS: &str = "Status da Tarefa";
const FIELD_DISPLAY_ORDER: &str = "Ordem de Exibição";

#[derive(Debug, Error)]
pub enum TaskServiceError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    TimeEntry(#[from] TimeEntryError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Project not found")]
    ProjectNotFound,
}

pub type Result<T> = std::result::Result<T, TaskServiceError>;

#[derive(Debug)]
pub struct TaskUpdateOutcome {
    pub task: Task,
    pub audit_entries: Vec<AuditEntry>,
}

/// Serialize one field value for the audit log: null stays null, strings
/// stay themselves, everything else becomes canonical JSON text so lists
/// diff by full-value equality.
fn serialize_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn text_value(text: Option<&str>) -> Value {
    match text {
        Some(text) => Value::String(text.to_string()),
        None => Value::Null,
    }
}

fn date_value(date: Option<NaiveDate>) -> Value {
    match date {
        Some(date) => Value::String(date.to_string()),
        None => Value::Null,
    }
}

fn uuid_value(id: Option<Uuid>) -> Value {
    match id {
        Some(id) => Value::String(id.to_string()),
        None => Value::Null,
    }
}

fn list_value(ids: &[Uuid]) -> Value {
    Value::Array(ids.iter().map(|id| Value::String(id.to_string())).collect())
}

fn minutes_value(minutes: Option<i64>) -> Value {
    match minutes {
        Some(minutes) => Value::Number(minutes.into()),
        None => Value::Null,
    }
}

fn status_value(status: TaskStatus) -> Value {
    Value::String(status.label().to_string())
}

fn priority_value(priority: TaskPriority) -> Value {
    Value::String(priority.label().to_string())
}

fn stage(entries: &mut Vec<AuditEntry>, field_name: &str, old: Value, new: Value) {
    let old_value = serialize_value(old);
    let new_value = serialize_value(new);
    if old_value != new_value {
        entries.push(AuditEntry {
            field_name: field_name.to_string(),
            old_value,
            new_value,
        });
    }
}

#[derive(Clone, Default)]
pub struct TaskService;

impl TaskService {
    pub fn new() -> Self {
        Self
    }

    /// One staged entry per field present in the update whose serialized
    /// value differs from the task's current value.
    pub fn compute_audit_entries(task: &Task, data: &UpdateTask) -> Vec<AuditEntry> {
        let mut entries = Vec::new();

        if let Some(name) = data.name.as_deref() {
            stage(
                &mut entries,
                FIELD_NAME,
                text_value(Some(&task.name)),
                text_value(Some(name.trim())),
            );
        }
        if let Some(description) = data.description.as_deref() {
            let new = Some(description).filter(|d| !d.trim().is_empty());
            stage(
                &mut entries,
                FIELD_DESCRIPTION,
                text_value(task.description.as_deref()),
                text_value(new),
            );
        }
        if let Some(sector_id) = data.sector_id {
            stage(
                &mut entries,
                FIELD_SECTOR,
                uuid_value(task.sector_id),
                uuid_value(Some(sector_id)),
            );
        }
        if let Some(task_type_id) = data.task_type_id {
            stage(
                &mut entries,
                FIELD_TASK_TYPE,
                uuid_value(task.task_type_id),
                uuid_value(Some(task_type_id)),
            );
        }
        if let Some(executor_ids) = data.executor_ids.as_deref() {
            stage(
                &mut entries,
                FIELD_EXECUTORS,
                list_value(&task.executor_ids),
                list_value(executor_ids),
            );
        }
        if let Some(validator_ids) = data.validator_ids.as_deref() {
            stage(
                &mut entries,
                FIELD_VALIDATORS,
                list_value(&task.validator_ids),
                list_value(validator_ids),
            );
        }
        if let Some(informed_ids) = data.informed_ids.as_deref() {
            stage(
                &mut entries,
                FIELD_INFORMED,
                list_value(&task.informed_ids),
                list_value(informed_ids),
            );
        }
        if let Some(start_date) = data.start_date {
            stage(
                &mut entries,
                FIELD_START_DATE,
                date_value(task.start_date),
                date_value(Some(start_date)),
            );
        }
        if let Some(estimated_minutes) = data.estimated_minutes {
            stage(
                &mut entries,
                FIELD_ESTIMATED_MINUTES,
                minutes_value(task.estimated_minutes),
                minutes_value(Some(estimated_minutes)),
            );
        }
        if let Some(priority) = data.priority {
            stage(
                &mut entries,
                FIELD_PRIORITY,
                priority_value(task.priority),
                priority_value(priority),
            );
        }
        if let Some(status) = data.status {
            stage(
                &mut entries,
                FIELD_STATUS,
                status_value(task.status),
                status_value(status),
            );
        }
        if let Some(display_order) = data.display_order {
            stage(
                &mut entries,
                FIELD_DISPLAY_ORDER,
                minutes_value(Some(task.display_order)),
                minutes_value(Some(display_order)),
            );
        }

        entries
    }

    async fn gate(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        project_id: Uuid,
    ) -> Result<Project> {
        let project = Project::find_by_id(db, project_id)
            .await?
            .ok_or(TaskServiceError::ProjectNotFound)?;
        auth::require(auth::can_access_task(db, ctx, &project).await?)?;
        Ok(project)
    }

    pub async fn create_task(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        project_id: Uuid,
        data: &CreateTask,
    ) -> Result<Task> {
        self.gate(db, ctx, project_id).await?;
        let task = Task::create(db, project_id, data, Uuid::new_v4(), ctx.user_id).await?;
        tracing::debug!(task_id = %task.id, project_id = %project_id, "Task created");
        Ok(task)
    }

    /// Apply a partial update and append the audit rows for every changed
    /// field, committing both as one transaction.
    pub async fn apply_update(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        task: &Task,
        data: &UpdateTask,
    ) -> Result<TaskUpdateOutcome> {
        self.gate(db, ctx, task.project_id).await?;

        let audit_entries = Self::compute_audit_entries(task, data);

        let tx = db.begin().await?;
        let updated = Task::apply_update(&tx, task.id, data).await?;
        TaskAuditLog::create_many(&tx, task.id, &audit_entries, ctx.user_id).await?;
        tx.commit().await?;

        Ok(TaskUpdateOutcome {
            task: updated,
            audit_entries,
        })
    }

    /// Append an immutable time entry and fold its duration into the task's
    /// tracked total in one transaction. The total never goes below zero.
    pub async fn record_time_entry(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        task: &Task,
        data: &CreateTimeEntry,
    ) -> Result<(TaskTimeEntry, i64)> {
        self.gate(db, ctx, task.project_id).await?;

        let tx = db.begin().await?;
        let entry = TaskTimeEntry::create(&tx, task.id, data, ctx.user_id).await?;
        let new_total = Task::add_actual_minutes(&tx, task.id, data.duration_minutes).await?;
        tx.commit().await?;

        Ok((entry, new_total))
    }

    /// Append a due-date-change row capturing the previous current date (or
    /// the original when no reschedule happened yet) and move the current
    /// due date, in one transaction.
    pub async fn record_due_date_change(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        task: &Task,
        new_date: NaiveDate,
        reason: &str,
    ) -> Result<TaskDueDateChange> {
        self.gate(db, ctx, task.project_id).await?;

        let previous = task.due_date_current.or(task.due_date_original);

        let tx = db.begin().await?;
        let change =
            TaskDueDateChange::create(&tx, task.id, previous, new_date, reason, ctx.user_id)
                .await?;
        Task::set_due_date_current(&tx, task.id, new_date).await?;
        tx.commit().await?;

        Ok(change)
    }

    pub async fn delete_task(
        &self,
        db: &DatabaseConnection,
        ctx: &AuthContext,
        task: &Task,
    ) -> Result<u64> {
        self.gate(db, ctx, task.project_id).await?;
        let rows = Task::delete(db, task.id).await?;
        if rows > 0 {
            tracing::debug!(task_id = %task.id, "Task deleted");
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use auth::AuthContext;
    use db::{
        models::{
            project::{CreateProject, Project},
            task_audit_log::TaskAuditLog,
            user::{CreateUser, User},
            workspace::{CreateWorkspace, Workspace},
            workspace_member::WorkspaceMember,
        },
        types::{GlobalRole, MemberRole, TimeEntrySource},
    };
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    struct Fixture {
        db: DatabaseConnection,
        service: TaskService,
        owner: AuthContext,
        executor: AuthContext,
        task: Task,
    }

    async fn setup_fixture() -> Fixture {
        let db = setup_db().await;
        let owner_user = User::create(
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
        let executor_user = User::create(
            &db,
            &CreateUser {
                email: "executor@example.com".to_string(),
                display_name: "Executor".to_string(),
                global_role: Some(GlobalRole::Executor),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();

        let workspace = Workspace::create(
            &db,
            &CreateWorkspace {
                name: "Equipe".to_string(),
                description: None,
            },
            Uuid::new_v4(),
            owner_user.id,
        )
        .await
        .unwrap();
        WorkspaceMember::upsert(&db, workspace.id, executor_user.id, MemberRole::Executor)
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
            owner_user.id,
        )
        .await
        .unwrap();

        let owner = AuthContext::resolve(&db, owner_user.id)
            .await
            .unwrap()
            .unwrap();
        let executor = AuthContext::resolve(&db, executor_user.id)
            .await
            .unwrap()
            .unwrap();

        let service = TaskService::new();
        let task = service
            .create_task(&db, &owner, project.id, &CreateTask::from_name("Primeira tarefa"))
            .await
            .unwrap();

        Fixture {
            db,
            service,
            owner,
            executor,
            task,
        }
    }

    #[tokio::test]
    async fn audit_rows_only_for_changed_fields() {
        let fixture = setup_fixture().await;

        let update = UpdateTask {
            // Same name: must not produce an audit row.
            name: Some("Primeira tarefa".to_string()),
            description: Some("Detalhes".to_string()),
            status: Some(TaskStatus::Pendente),
            ..Default::default()
        };
        let outcome = fixture
            .service
            .apply_update(&fixture.db, &fixture.owner, &fixture.task, &update)
            .await
            .unwrap();

        let fields: Vec<&str> = outcome
            .audit_entries
            .iter()
            .map(|entry| entry.field_name.as_str())
            .collect();
        assert_eq!(fields, vec!["Descrição", "Status da Tarefa"]);

        let persisted = TaskAuditLog::find_by_task_id(&fixture.db, fixture.task.id)
            .await
            .unwrap();
        assert_eq!(persisted.len(), 2);
    }

    #[tokio::test]
    async fn executor_status_change_produces_labelled_audit_row() {
        let fixture = setup_fixture().await;

        let update = UpdateTask {
            status: Some(TaskStatus::EmExecucao),
            ..Default::default()
        };
        let outcome = fixture
            .service
            .apply_update(&fixture.db, &fixture.executor, &fixture.task, &update)
            .await
            .unwrap();

        assert_eq!(outcome.task.status, TaskStatus::EmExecucao);
        assert_eq!(outcome.audit_entries.len(), 1);
        let entry = &outcome.audit_entries[0];
        assert_eq!(entry.field_name, "Status da Tarefa");
        assert_eq!(entry.old_value.as_deref(), Some("Backlog"));
        assert_eq!(entry.new_value.as_deref(), Some("Em Execução"));

        let persisted = TaskAuditLog::find_by_task_id(&fixture.db, fixture.task.id)
            .await
            .unwrap();
        assert_eq!(persisted[0].created_by, fixture.executor.user_id);
    }

    #[tokio::test]
    async fn list_fields_diff_by_full_value_equality() {
        let fixture = setup_fixture().await;
        let assignee = Uuid::new_v4();

        let update = UpdateTask {
            executor_ids: Some(vec![assignee]),
            ..Default::default()
        };
        let outcome = fixture
            .service
            .apply_update(&fixture.db, &fixture.owner, &fixture.task, &update)
            .await
            .unwrap();
        assert_eq!(outcome.audit_entries.len(), 1);
        assert_eq!(outcome.audit_entries[0].old_value.as_deref(), Some("[]"));
        assert_eq!(
            outcome.audit_entries[0].new_value.as_deref(),
            Some(format!("[\"{assignee}\"]").as_str())
        );

        // Re-sending the identical list changes nothing.
        let outcome = fixture
            .service
            .apply_update(&fixture.db, &fixture.owner, &outcome.task, &update)
            .await
            .unwrap();
        assert!(outcome.audit_entries.is_empty());
    }

    #[tokio::test]
    async fn disjoint_field_updates_both_land_with_own_audit_rows() {
        let fixture = setup_fixture().await;

        // Two writers each touch a different field of the same snapshot:
        // last-write-wins per field, neither clobbers the other.
        let first = UpdateTask {
            description: Some("Do primeiro".to_string()),
            ..Default::default()
        };
        let second = UpdateTask {
            status: Some(TaskStatus::Bloqueada),
            ..Default::default()
        };
        fixture
            .service
            .apply_update(&fixture.db, &fixture.owner, &fixture.task, &first)
            .await
            .unwrap();
        fixture
            .service
            .apply_update(&fixture.db, &fixture.executor, &fixture.task, &second)
            .await
            .unwrap();

        let task = Task::find_by_id(&fixture.db, fixture.task.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.description.as_deref(), Some("Do primeiro"));
        assert_eq!(task.status, TaskStatus::Bloqueada);

        let persisted = TaskAuditLog::find_by_task_id(&fixture.db, fixture.task.id)
            .await
            .unwrap();
        assert_eq!(persisted.len(), 2);
    }

    #[tokio::test]
    async fn time_entries_fold_into_actual_minutes_floored_at_zero() {
        let fixture = setup_fixture().await;

        let (entry, total) = fixture
            .service
            .record_time_entry(
                &fixture.db,
                &fixture.executor,
                &fixture.task,
                &CreateTimeEntry {
                    started_at: None,
                    ended_at: None,
                    duration_minutes: 90,
                    source: TimeEntrySource::Manual,
                    note: Some("Ajustes".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(entry.duration_minutes, 90);
        assert_eq!(total, 90);

        // A negative correction larger than the total floors at zero.
        let (_, total) = fixture
            .service
            .record_time_entry(
                &fixture.db,
                &fixture.executor,
                &fixture.task,
                &CreateTimeEntry {
                    started_at: None,
                    ended_at: None,
                    duration_minutes: -120,
                    source: TimeEntrySource::Manual,
                    note: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(total, 0);

        let task = Task::find_by_id(&fixture.db, fixture.task.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.actual_minutes, 0);
    }

    #[tokio::test]
    async fn due_date_changes_track_previous_and_update_current() {
        let fixture = setup_fixture().await;
        let first = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let second = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();

        let change = fixture
            .service
            .record_due_date_change(
                &fixture.db,
                &fixture.owner,
                &fixture.task,
                first,
                "Prazo inicial",
            )
            .await
            .unwrap();
        // The task had no due date yet.
        assert_eq!(change.previous_date, None);
        assert_eq!(change.new_date, first);

        let task = Task::find_by_id(&fixture.db, fixture.task.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.due_date_current, Some(first));

        let change = fixture
            .service
            .record_due_date_change(&fixture.db, &fixture.owner, &task, second, "Replanejado")
            .await
            .unwrap();
        assert_eq!(change.previous_date, Some(first));
        assert_eq!(change.new_date, second);

        let task = Task::find_by_id(&fixture.db, fixture.task.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.due_date_current, Some(second));
    }

    #[tokio::test]
    async fn outsiders_are_denied_uniformly() {
        let fixture = setup_fixture().await;
        let outsider_user = User::create(
            &fixture.db,
            &CreateUser {
                email: "outsider@example.com".to_string(),
                display_name: "Outsider".to_string(),
                global_role: Some(GlobalRole::Executor),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let outsider = AuthContext::resolve(&fixture.db, outsider_user.id)
            .await
            .unwrap()
            .unwrap();

        let update = UpdateTask {
            status: Some(TaskStatus::Cancelada),
            ..Default::default()
        };
        let result = fixture
            .service
            .apply_update(&fixture.db, &outsider, &fixture.task, &update)
            .await;
        assert!(matches!(
            result,
            Err(TaskServiceError::Auth(AuthError::Unauthorized))
        ));

        // The task is untouched.
        let task = Task::find_by_id(&fixture.db, fixture.task.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(task.status, TaskStatus::Backlog);
    }

    #[tokio::test]
    async fn new_tasks_queue_at_the_end_of_their_status_lane() {
        let fixture = setup_fixture().await;
        let project_id = fixture.task.project_id;

        let second = fixture
            .service
            .create_task(
                &fixture.db,
                &fixture.owner,
                project_id,
                &CreateTask::from_name("Segunda tarefa"),
            )
            .await
            .unwrap();
        assert_eq!(fixture.task.display_order, 0);
        assert_eq!(second.display_order, 1);

        // An explicit order is honored untouched.
        let third = fixture
            .service
            .create_task(
                &fixture.db,
                &fixture.owner,
                project_id,
                &CreateTask {
                    display_order: Some(10),
                    ..CreateTask::from_name("Terceira tarefa")
                },
            )
            .await
            .unwrap();
        assert_eq!(third.display_order, 10);
    }
}
