use std::future::Future;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use db::models::{
    feed_post::FeedPost, project::Project, task::Task, workspace::Workspace,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Load a model by path uuid into a request extension. A missing row
/// surfaces as the same uniform denial an unauthorized caller would get,
/// so probing ids reveals nothing.
async fn load_request_extension<M, E, Fut>(
    request: Request,
    next: Next,
    load_future: Fut,
) -> Result<Response, ApiError>
where
    M: Clone + Send + Sync + 'static,
    E: Into<ApiError>,
    Fut: Future<Output = Result<Option<M>, E>>,
{
    let model = load_future
        .await
        .map_err(Into::into)?
        .ok_or(ApiError::Unauthorized)?;
    let mut request = request;
    request.extensions_mut().insert(model);
    Ok(next.run(request).await)
}

pub async fn load_workspace_middleware(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    load_request_extension(
        request,
        next,
        Workspace::find_by_id(&state.db().pool, workspace_id),
    )
    .await
}

pub async fn load_project_middleware(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    load_request_extension(
        request,
        next,
        Project::find_by_id(&state.db().pool, project_id),
    )
    .await
}

pub async fn load_task_middleware(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    load_request_extension(request, next, Task::find_by_id(&state.db().pool, task_id)).await
}

pub async fn load_feed_post_middleware(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    load_request_extension(
        request,
        next,
        FeedPost::find_by_id(&state.db().pool, post_id),
    )
    .await
}
