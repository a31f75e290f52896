use auth::AuthContext;
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::{
    models::user::User,
    types::GlobalRole,
};
use serde::Deserialize;
use services::services::membership::InviteRequest;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn get_me(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let user = User::find_by_id(&state.db().pool, ctx.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

/// Completes first-login setup; until this succeeds the identity middleware
/// blocks every other route for the invited user.
pub async fn complete_password_setup(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let user = User::mark_password_set(&state.db().pool, ctx.user_id).await?;
    tracing::info!(user_id = %user.id, "Password setup completed");
    Ok(ResponseJson(ApiResponse::success(user)))
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateRoleRequest {
    pub role: GlobalRole,
}

pub async fn update_global_role(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    auth::require(ctx.is_super_user || ctx.global_role == GlobalRole::Manager)
        .map_err(ApiError::from)?;
    let user = User::set_global_role(&state.db().pool, user_id, payload.role).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub async fn create_invitation(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Json(payload): Json<InviteRequest>,
) -> Result<ResponseJson<ApiResponse<Uuid>>, ApiError> {
    let outcome = state
        .membership()
        .invite(&state.db().pool, state.invites(), &ctx, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(outcome.user_id)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me))
        .route("/users/password-setup", post(complete_password_setup))
        .route("/users/{user_id}/role", put(update_global_role))
        .route("/invitations", post(create_invitation))
}
