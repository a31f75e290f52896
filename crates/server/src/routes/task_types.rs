use auth::AuthContext;
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::{
    task_type::{CreateTaskType, TaskType, UpdateTaskType},
    workspace::Workspace,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_workspace_middleware};

pub async fn get_task_types(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<TaskType>>>, ApiError> {
    auth::require(auth::can_read_vocabulary(&state.db().pool, &ctx, &workspace).await?)
        .map_err(ApiError::from)?;
    let task_types = TaskType::find_by_workspace_id(&state.db().pool, workspace.id).await?;
    Ok(ResponseJson(ApiResponse::success(task_types)))
}

pub async fn create_task_type(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskType>,
) -> Result<ResponseJson<ApiResponse<TaskType>>, ApiError> {
    auth::require(auth::can_manage_vocabulary(&state.db().pool, &ctx, &workspace).await?)
        .map_err(ApiError::from)?;
    let task_type = TaskType::create(&state.db().pool, workspace.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(task_type)))
}

async fn load_managed_task_type(
    state: &AppState,
    ctx: &AuthContext,
    task_type_id: Uuid,
) -> Result<TaskType, ApiError> {
    let task_type = TaskType::find_by_id(&state.db().pool, task_type_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    let workspace = Workspace::find_by_id(&state.db().pool, task_type.workspace_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    auth::require(auth::can_manage_vocabulary(&state.db().pool, ctx, &workspace).await?)
        .map_err(ApiError::from)?;
    Ok(task_type)
}

pub async fn update_task_type(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(task_type_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskType>,
) -> Result<ResponseJson<ApiResponse<TaskType>>, ApiError> {
    let task_type = load_managed_task_type(&state, &ctx, task_type_id).await?;
    let updated = TaskType::update(&state.db().pool, task_type.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

pub async fn delete_task_type(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(task_type_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let task_type = load_managed_task_type(&state, &ctx, task_type_id).await?;
    TaskType::delete(&state.db().pool, task_type.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let workspace_scoped = Router::new()
        .route("/", get(get_task_types).post(create_task_type))
        .layer(from_fn_with_state(state.clone(), load_workspace_middleware));

    Router::new()
        .nest("/workspaces/{workspace_id}/task-types", workspace_scoped)
        .route(
            "/task-types/{task_type_id}",
            put(update_task_type).delete(delete_task_type),
        )
}
