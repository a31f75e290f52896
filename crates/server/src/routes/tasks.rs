use auth::AuthContext;
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get, put},
};
use chrono::NaiveDate;
use db::models::{
    project::Project,
    task::{CreateTask, Task, UpdateTask},
    task_audit_log::TaskAuditLog,
    task_comment::TaskComment,
    task_due_date_change::TaskDueDateChange,
    task_time_entry::{CreateTimeEntry, TaskTimeEntry},
};
use serde::Deserialize;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    middleware::{load_project_middleware, load_task_middleware},
};

/// Shared read gate for a task and its sub-records.
async fn require_task_access(
    state: &AppState,
    ctx: &AuthContext,
    project_id: Uuid,
) -> Result<(), ApiError> {
    let project = Project::find_by_id(&state.db().pool, project_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    auth::require(auth::can_access_task(&state.db().pool, ctx, &project).await?)
        .map_err(ApiError::from)
}

pub async fn get_tasks(
    Extension(ctx): Extension<AuthContext>,
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    auth::require(auth::can_access_task(&state.db().pool, &ctx, &project).await?)
        .map_err(ApiError::from)?;
    let tasks = Task::find_by_project_id(&state.db().pool, project.id).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn create_task(
    Extension(ctx): Extension<AuthContext>,
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
    Json(payload): Json<CreateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = state
        .tasks()
        .create_task(&state.db().pool, &ctx, project.id, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn get_task(
    Extension(ctx): Extension<AuthContext>,
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    require_task_access(&state, &ctx, task.project_id).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task(
    Extension(ctx): Extension<AuthContext>,
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let outcome = state
        .tasks()
        .apply_update(&state.db().pool, &ctx, &task, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(outcome.task)))
}

pub async fn delete_task(
    Extension(ctx): Extension<AuthContext>,
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<()>>), ApiError> {
    let rows = state
        .tasks()
        .delete_task(&state.db().pool, &ctx, &task)
        .await?;
    if rows == 0 {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }
    Ok((StatusCode::ACCEPTED, ResponseJson(ApiResponse::success(()))))
}

pub async fn get_time_entries(
    Extension(ctx): Extension<AuthContext>,
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<TaskTimeEntry>>>, ApiError> {
    require_task_access(&state, &ctx, task.project_id).await?;
    let entries = TaskTimeEntry::find_by_task_id(&state.db().pool, task.id).await?;
    Ok(ResponseJson(ApiResponse::success(entries)))
}

pub async fn create_time_entry(
    Extension(ctx): Extension<AuthContext>,
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
    Json(payload): Json<CreateTimeEntry>,
) -> Result<ResponseJson<ApiResponse<TaskTimeEntry>>, ApiError> {
    let (entry, _total) = state
        .tasks()
        .record_time_entry(&state.db().pool, &ctx, &task, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(entry)))
}

#[derive(Debug, Deserialize, TS)]
pub struct DueDateChangeRequest {
    pub new_date: NaiveDate,
    pub reason: String,
}

pub async fn get_due_date_changes(
    Extension(ctx): Extension<AuthContext>,
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<TaskDueDateChange>>>, ApiError> {
    require_task_access(&state, &ctx, task.project_id).await?;
    let changes = TaskDueDateChange::find_by_task_id(&state.db().pool, task.id).await?;
    Ok(ResponseJson(ApiResponse::success(changes)))
}

pub async fn create_due_date_change(
    Extension(ctx): Extension<AuthContext>,
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
    Json(payload): Json<DueDateChangeRequest>,
) -> Result<ResponseJson<ApiResponse<TaskDueDateChange>>, ApiError> {
    let change = state
        .tasks()
        .record_due_date_change(
            &state.db().pool,
            &ctx,
            &task,
            payload.new_date,
            &payload.reason,
        )
        .await?;
    Ok(ResponseJson(ApiResponse::success(change)))
}

pub async fn get_audit_logs(
    Extension(ctx): Extension<AuthContext>,
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<TaskAuditLog>>>, ApiError> {
    require_task_access(&state, &ctx, task.project_id).await?;
    let logs = TaskAuditLog::find_by_task_id(&state.db().pool, task.id).await?;
    Ok(ResponseJson(ApiResponse::success(logs)))
}

pub async fn get_comments(
    Extension(ctx): Extension<AuthContext>,
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<TaskComment>>>, ApiError> {
    require_task_access(&state, &ctx, task.project_id).await?;
    let comments = TaskComment::find_by_task_id(&state.db().pool, task.id).await?;
    Ok(ResponseJson(ApiResponse::success(comments)))
}

#[derive(Debug, Deserialize, TS)]
pub struct CommentRequest {
    pub content: String,
}

pub async fn create_comment(
    Extension(ctx): Extension<AuthContext>,
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
    Json(payload): Json<CommentRequest>,
) -> Result<ResponseJson<ApiResponse<TaskComment>>, ApiError> {
    require_task_access(&state, &ctx, task.project_id).await?;
    let comment =
        TaskComment::create(&state.db().pool, task.id, &payload.content, ctx.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(comment)))
}

/// Comments are author-or-super-user mutable, unlike the rest of the task
/// surface.
async fn load_owned_comment(
    state: &AppState,
    ctx: &AuthContext,
    comment_id: Uuid,
) -> Result<TaskComment, ApiError> {
    let comment = TaskComment::find_by_id(&state.db().pool, comment_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    auth::require(auth::can_edit_comment(ctx, &comment)).map_err(ApiError::from)?;
    Ok(comment)
}

pub async fn update_comment(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> Result<ResponseJson<ApiResponse<TaskComment>>, ApiError> {
    let comment = load_owned_comment(&state, &ctx, comment_id).await?;
    let updated =
        TaskComment::update_content(&state.db().pool, comment.id, &payload.content).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

pub async fn delete_comment(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let comment = load_owned_comment(&state, &ctx, comment_id).await?;
    TaskComment::delete(&state.db().pool, comment.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let project_scoped = Router::new()
        .route("/", get(get_tasks).post(create_task))
        .layer(from_fn_with_state(state.clone(), load_project_middleware));

    let task_id_router = Router::new()
        .route("/", get(get_task))
        .route("/", put(update_task))
        .route("/", delete(delete_task))
        .route("/time-entries", get(get_time_entries).post(create_time_entry))
        .route(
            "/due-date-changes",
            get(get_due_date_changes).post(create_due_date_change),
        )
        .route("/audit-logs", get(get_audit_logs))
        .route("/comments", get(get_comments).post(create_comment))
        .layer(from_fn_with_state(state.clone(), load_task_middleware));

    Router::new()
        .nest("/projects/{project_id}/tasks", project_scoped)
        .nest("/tasks/{task_id}", task_id_router)
        .route(
            "/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
}
