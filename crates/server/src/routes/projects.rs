use auth::AuthContext;
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get, put},
};
use db::models::{
    project::{CreateProject, Project, UpdateProject},
    project_member::ProjectMember,
    workspace::Workspace,
};
use serde::Deserialize;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    middleware::{load_project_middleware, load_workspace_middleware},
};

pub async fn get_projects(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    auth::require(auth::can_read_workspace(&state.db().pool, &ctx, &workspace).await?)
        .map_err(ApiError::from)?;
    let projects = Project::find_by_workspace_id(&state.db().pool, workspace.id).await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn create_project(
    Extension(ctx): Extension<AuthContext>,
    Extension(workspace): Extension<Workspace>,
    State(state): State<AppState>,
    Json(payload): Json<CreateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    auth::require(auth::can_create_project(&ctx)).map_err(ApiError::from)?;
    let project = Project::create(
        &state.db().pool,
        workspace.id,
        &payload,
        Uuid::new_v4(),
        ctx.user_id,
    )
    .await?;
    tracing::info!(project_id = %project.id, workspace_id = %workspace.id, "Project created");
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn get_project(
    Extension(ctx): Extension<AuthContext>,
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    auth::require(auth::can_read_project(&state.db().pool, &ctx, &project).await?)
        .map_err(ApiError::from)?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn update_project(
    Extension(ctx): Extension<AuthContext>,
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    auth::require(auth::can_write_project(&ctx, &project)).map_err(ApiError::from)?;
    let updated = Project::update(&state.db().pool, project.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

pub async fn delete_project(
    Extension(ctx): Extension<AuthContext>,
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<()>>), ApiError> {
    auth::require(auth::can_write_project(&ctx, &project)).map_err(ApiError::from)?;
    let rows = Project::delete(&state.db().pool, project.id).await?;
    if rows == 0 {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }
    tracing::info!(project_id = %project.id, "Project deleted");
    Ok((StatusCode::ACCEPTED, ResponseJson(ApiResponse::success(()))))
}

pub async fn get_members(
    Extension(ctx): Extension<AuthContext>,
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<ProjectMember>>>, ApiError> {
    let members = ProjectMember::find_by_project_id(&state.db().pool, project.id).await?;
    let visible: Vec<ProjectMember> = members
        .into_iter()
        .filter(|member| auth::can_read_membership(&ctx, project.created_by, member.user_id))
        .collect();
    if visible.is_empty() {
        return Err(ApiError::Unauthorized);
    }
    Ok(ResponseJson(ApiResponse::success(visible)))
}

#[derive(Debug, Deserialize, TS)]
pub struct MemberRequest {
    pub user_id: Uuid,
    pub role: db::types::MemberRole,
}

pub async fn upsert_member(
    Extension(ctx): Extension<AuthContext>,
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
    Json(payload): Json<MemberRequest>,
) -> Result<ResponseJson<ApiResponse<ProjectMember>>, ApiError> {
    let member = state
        .membership()
        .change_project_member_role(
            &state.db().pool,
            &ctx,
            &project,
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
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
    Json(payload): Json<RemoveMemberRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let rows = state
        .membership()
        .remove_project_member(&state.db().pool, &ctx, &project, payload.user_id)
        .await?;
    if rows == 0 {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let workspace_scoped = Router::new()
        .route("/", get(get_projects).post(create_project))
        .layer(from_fn_with_state(state.clone(), load_workspace_middleware));

    let project_id_router = Router::new()
        .route("/", get(get_project))
        .route("/", put(update_project))
        .route("/", delete(delete_project))
        .route("/members", get(get_members).post(upsert_member))
        .route("/members", delete(remove_member))
        .layer(from_fn_with_state(state.clone(), load_project_middleware));

    Router::new()
        .nest("/workspaces/{workspace_id}/projects", workspace_scoped)
        .nest("/projects/{project_id}", project_id_router)
}
