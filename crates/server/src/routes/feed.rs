use auth::AuthContext;
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get, post, put},
};
use db::models::{
    feed_post::{CreateFeedPost, FeedPost},
    notification::Notification,
    workspace::Workspace,
};
use serde::Deserialize;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    middleware::{load_feed_post_middleware, load_workspace_middleware},
};

pub async fn get_feed(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<FeedPost>>>, ApiError> {
    auth::require(auth::can_read_feed(&state.db().pool, &ctx, &workspace).await?)
        .map_err(ApiError::from)?;
    let posts = FeedPost::find_by_workspace_id(&state.db().pool, workspace.id).await?;
    Ok(ResponseJson(ApiResponse::success(posts)))
}

pub async fn create_post(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
    Json(payload): Json<CreateFeedPost>,
) -> Result<ResponseJson<ApiResponse<FeedPost>>, ApiError> {
    let outcome = state
        .feed()
        .create_post(&state.db().pool, &ctx, &workspace, &payload)
        .await?;
    Ok(ResponseJson(ApiResponse::success(outcome.post)))
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdatePostRequest {
    pub content: String,
}

pub async fn update_post(
    Extension(ctx): Extension<AuthContext>,
    Extension(post): Extension<FeedPost>,
    State(state): State<AppState>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<ResponseJson<ApiResponse<FeedPost>>, ApiError> {
    let updated = state
        .feed()
        .update_post(&state.db().pool, &ctx, &post, &payload.content)
        .await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

pub async fn delete_post(
    Extension(ctx): Extension<AuthContext>,
    Extension(post): Extension<FeedPost>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = state
        .feed()
        .delete_post(&state.db().pool, &ctx, &post)
        .await?;
    if rows == 0 {
        return Err(ApiError::NotFound("Feed post not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn get_notifications(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Notification>>>, ApiError> {
    let notifications =
        Notification::find_for_recipient(&state.db().pool, ctx.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(notifications)))
}

pub async fn mark_notification_read(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
    Path(notification_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Notification>>, ApiError> {
    let notification = state
        .feed()
        .mark_read(&state.db().pool, &ctx, notification_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(notification)))
}

pub async fn mark_all_notifications_read(
    Extension(ctx): Extension<AuthContext>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<u64>>, ApiError> {
    let rows = state.feed().mark_all_read(&state.db().pool, &ctx).await?;
    Ok(ResponseJson(ApiResponse::success(rows)))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let workspace_scoped = Router::new()
        .route("/", get(get_feed).post(create_post))
        .layer(from_fn_with_state(state.clone(), load_workspace_middleware));

    let post_id_router = Router::new()
        .route("/", put(update_post))
        .route("/", delete(delete_post))
        .layer(from_fn_with_state(state.clone(), load_feed_post_middleware));

    Router::new()
        .nest("/workspaces/{workspace_id}/feed", workspace_scoped)
        .nest("/feed-posts/{post_id}", post_id_router)
        .route("/notifications", get(get_notifications))
        .route(
            "/notifications/{notification_id}/read",
            post(mark_notification_read),
        )
        .route("/notifications/read-all", post(mark_all_notifications_read))
}
