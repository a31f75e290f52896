use auth::AuthContext;
use axum::{
    Extension, Router,
    extract::{Query, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use chrono::{DateTime, Utc};
use db::models::workspace::Workspace;
use serde::Deserialize;
use services::services::activity::ActivityWindow;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::load_workspace_middleware};

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Bounded read feed for the daily-summary side channel.
pub async fn get_activity_window(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<ResponseJson<ApiResponse<ActivityWindow>>, ApiError> {
    let window = state
        .activity()
        .window(&state.db().pool, &ctx, &workspace, query.from, query.to)
        .await?;
    Ok(ResponseJson(ApiResponse::success(window)))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let workspace_scoped = Router::new()
        .route("/", get(get_activity_window))
        .layer(from_fn_with_state(state.clone(), load_workspace_middleware));

    Router::new().nest("/workspaces/{workspace_id}/activity", workspace_scoped)
}
