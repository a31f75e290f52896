use auth::AuthContext;
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get, put},
};
use db::{
    TransactionTrait,
    models::{
        presence::Presence,
        workspace::{CreateWorkspace, UpdateWorkspace, Workspace},
        workspace_member::WorkspaceMember,
    },
    types::MemberRole,
};
use serde::Deserialize;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_workspace_middleware};

pub async fn get_workspaces(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Workspace>>>, ApiError> {
    let workspaces = Workspace::find_for_member(&state.db().pool, ctx.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(workspaces)))
}

pub async fn create_workspace(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Json(payload): Json<CreateWorkspace>,
) -> Result<ResponseJson<ApiResponse<Workspace>>, ApiError> {
    auth::require(auth::can_create_workspace(&ctx)).map_err(ApiError::from)?;

    // Workspace row and creator membership commit together.
    let tx = state.db().pool.begin().await?;
    let workspace = Workspace::create(&tx, &payload, Uuid::new_v4(), ctx.user_id).await?;
    tx.commit().await?;

    tracing::info!(workspace_id = %workspace.id, "Workspace created");
    Ok(ResponseJson(ApiResponse::success(workspace)))
}

pub async fn get_workspace(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Workspace>>, ApiError> {
    auth::require(auth::can_read_workspace(&state.db().pool, &ctx, &workspace).await?)
        .map_err(ApiError::from)?;
    Ok(ResponseJson(ApiResponse::success(workspace)))
}

pub async fn update_workspace(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateWorkspace>,
) -> Result<ResponseJson<ApiResponse<Workspace>>, ApiError> {
    auth::require(auth::can_write_workspace(&ctx, &workspace)).map_err(ApiError::from)?;
    let updated = Workspace::update(&state.db().pool, workspace.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

pub async fn delete_workspace(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<()>>), ApiError> {
    auth::require(auth::can_write_workspace(&ctx, &workspace)).map_err(ApiError::from)?;
    let rows = Workspace::delete(&state.db().pool, workspace.id).await?;
    if rows == 0 {
        return Err(ApiError::NotFound("Workspace not found".to_string()));
    }
    tracing::info!(workspace_id = %workspace.id, "Workspace deleted");
    Ok((StatusCode::ACCEPTED, ResponseJson(ApiResponse::success(()))))
}

pub async fn get_members(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<WorkspaceMember>>>, ApiError> {
    let members = WorkspaceMember::find_by_workspace_id(&state.db().pool, workspace.id).await?;
    // Non-owners only see their own membership row.
    let visible: Vec<WorkspaceMember> = members
        .into_iter()
        .filter(|member| auth::can_read_membership(&ctx, workspace.created_by, member.user_id))
        .collect();
    if visible.is_empty() {
        return Err(ApiError::Unauthorized);
    }
    Ok(ResponseJson(ApiResponse::success(visible)))
}

#[derive(Debug, Deserialize, TS)]
pub struct MemberRequest {
    pub user_id: Uuid,
    pub role: MemberRole,
}

pub async fn upsert_member(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
    Json(payload): Json<MemberRequest>,
) -> Result<ResponseJson<ApiResponse<WorkspaceMember>>, ApiError> {
    let member = state
        .membership()
        .change_workspace_member_role(
            &state.db().pool,
            &ctx,
            &workspace,
            payload.user_id,
            payload.role,
        )
        .await?;
    Ok(ResponseJson(ApiResponse::success(member)))
}

#[derive(Debug, Deserialize, TS)]
pub struct RemoveMemberRequest {
    pub user_id: Uuid,
}

pub async fn remove_member(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
    Json(payload): Json<RemoveMemberRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = state
        .membership()
        .remove_workspace_member(&state.db().pool, &ctx, &workspace, payload.user_id)
        .await?;
    if rows == 0 {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn get_presence(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Presence>>>, ApiError> {
    auth::require(auth::can_read_workspace(&state.db().pool, &ctx, &workspace).await?)
        .map_err(ApiError::from)?;
    let rows = Presence::find_by_workspace_id(&state.db().pool, workspace.id).await?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub async fn touch_presence(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Presence>>, ApiError> {
    auth::require(
        auth::can_touch_presence(&state.db().pool, &ctx, &workspace, ctx.user_id).await?,
    )
    .map_err(ApiError::from)?;
    let row = Presence::touch(&state.db().pool, workspace.id, ctx.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(row)))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let workspace_id_router = Router::new()
        .route("/", get(get_workspace))
        .route("/", put(update_workspace))
        .route("/", delete(delete_workspace))
        .route("/members", get(get_members).post(upsert_member))
        .route("/members", delete(remove_member))
        .route("/presence", get(get_presence).put(touch_presence))
        .layer(from_fn_with_state(state.clone(), load_workspace_middleware));

    Router::new().nest("/workspaces", Router::new()
        .route("/", get(get_workspaces).post(create_workspace))
        .nest("/{workspace_id}", workspace_id_router))
}
