use auth::AuthContext;
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::{
    sector::{CreateSector, Sector, UpdateSector},
    workspace::Workspace,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_workspace_middleware};

pub async fn get_sectors(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Sector>>>, ApiError> {
    auth::require(auth::can_read_vocabulary(&state.db().pool, &ctx, &workspace).await?)
        .map_err(ApiError::from)?;
    let sectors = Sector::find_by_workspace_id(&state.db().pool, workspace.id).await?;
    Ok(ResponseJson(ApiResponse::success(sectors)))
}

pub async fn create_sector(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
    Json(payload): Json<CreateSector>,
) -> Result<ResponseJson<ApiResponse<Sector>>, ApiError> {
    auth::require(auth::can_manage_vocabulary(&state.db().pool, &ctx, &workspace).await?)
        .map_err(ApiError::from)?;
    let sector = Sector::create(&state.db().pool, workspace.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(sector)))
}

async fn load_managed_sector(
    state: &AppState,
    ctx: &AuthContext,
    sector_id: Uuid,
) -> Result<Sector, ApiError> {
    let sector = Sector::find_by_id(&state.db().pool, sector_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    let workspace = Workspace::find_by_id(&state.db().pool, sector.workspace_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    auth::require(auth::can_manage_vocabulary(&state.db().pool, ctx, &workspace).await?)
        .map_err(ApiError::from)?;
    Ok(sector)
}

pub async fn update_sector(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(sector_id): Path<Uuid>,
    Json(payload): Json<UpdateSector>,
) -> Result<ResponseJson<ApiResponse<Sector>>, ApiError> {
    let sector = load_managed_sector(&state, &ctx, sector_id).await?;
    let updated = Sector::update(&state.db().pool, sector.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

pub async fn delete_sector(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(sector_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let sector = load_managed_sector(&state, &ctx, sector_id).await?;
    Sector::delete(&state.db().pool, sector.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let workspace_scoped = Router::new()
        .route("/", get(get_sectors).post(create_sector))
        .layer(from_fn_with_state(state.clone(), load_workspace_middleware));

    Router::new()
        .nest("/workspaces/{workspace_id}/sectors", workspace_scoped)
        .route("/sectors/{sector_id}", put(update_sector).delete(delete_sector))
}
