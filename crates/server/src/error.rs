use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use auth::AuthError;
use db::{
    DbErr,
    models::{
        feed_post::FeedPostError, project::ProjectError, sector::SectorError,
        task::TaskError, task_comment::TaskCommentError, task_time_entry::TimeEntryError,
        task_type::TaskTypeError, user::UserError, workspace::WorkspaceError,
    },
};
use services::services::{
    activity::ActivityError, feed::FeedError, membership::MembershipError,
    task_update::TaskServiceError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error, ts_rs::TS)]
#[ts(type = "string")]
pub enum ApiError {
    /// The uniform denial. Carries no resource detail so a caller cannot
    /// probe what exists.
    #[error("Not authorized")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "ConflictError"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UpstreamError"),
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "DatabaseError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            },
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        let error_message = match &self {
            ApiError::Unauthorized => "Not authorized".to_string(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Conflict(msg) => msg.clone(),
            ApiError::Upstream(msg) => msg.clone(),
            _ => format!("{}: {}", error_type, self),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }
        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => ApiError::Unauthorized,
            AuthError::Database(db_err) => ApiError::Database(db_err),
        }
    }
}

impl From<WorkspaceError> for ApiError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::Database(db_err) => ApiError::Database(db_err),
            WorkspaceError::NotFound => ApiError::NotFound("Workspace not found".to_string()),
            WorkspaceError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            WorkspaceError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::Database(db_err) => ApiError::Database(db_err),
            ProjectError::NotFound => ApiError::NotFound("Project not found".to_string()),
            ProjectError::WorkspaceNotFound => {
                ApiError::NotFound("Workspace not found".to_string())
            }
            ProjectError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            ProjectError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Database(db_err) => ApiError::Database(db_err),
            TaskError::NotFound => ApiError::NotFound("Task not found".to_string()),
            TaskError::ProjectNotFound => ApiError::NotFound("Project not found".to_string()),
            TaskError::SectorNotFound => ApiError::BadRequest("Sector not found".to_string()),
            TaskError::TaskTypeNotFound => {
                ApiError::BadRequest("Task type not found".to_string())
            }
            TaskError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Database(db_err) => ApiError::Database(db_err),
            UserError::NotFound => ApiError::NotFound("User not found".to_string()),
            UserError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<SectorError> for ApiError {
    fn from(err: SectorError) -> Self {
        match err {
            SectorError::Database(db_err) => ApiError::Database(db_err),
            SectorError::NotFound => ApiError::NotFound("Sector not found".to_string()),
            SectorError::WorkspaceNotFound => {
                ApiError::NotFound("Workspace not found".to_string())
            }
            SectorError::DuplicateName => {
                ApiError::Conflict("A sector with this name already exists".to_string())
            }
            SectorError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<TaskTypeError> for ApiError {
    fn from(err: TaskTypeError) -> Self {
        match err {
            TaskTypeError::Database(db_err) => ApiError::Database(db_err),
            TaskTypeError::NotFound => ApiError::NotFound("Task type not found".to_string()),
            TaskTypeError::WorkspaceNotFound => {
                ApiError::NotFound("Workspace not found".to_string())
            }
            TaskTypeError::DuplicateName => {
                ApiError::Conflict("A task type with this name already exists".to_string())
            }
            TaskTypeError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<TaskCommentError> for ApiError {
    fn from(err: TaskCommentError) -> Self {
        match err {
            TaskCommentError::Database(db_err) => ApiError::Database(db_err),
            TaskCommentError::NotFound => ApiError::NotFound("Comment not found".to_string()),
            TaskCommentError::TaskNotFound => ApiError::NotFound("Task not found".to_string()),
            TaskCommentError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<TimeEntryError> for ApiError {
    fn from(err: TimeEntryError) -> Self {
        match err {
            TimeEntryError::Database(db_err) => ApiError::Database(db_err),
            TimeEntryError::TaskNotFound => ApiError::NotFound("Task not found".to_string()),
            TimeEntryError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<FeedPostError> for ApiError {
    fn from(err: FeedPostError) -> Self {
        match err {
            FeedPostError::Database(db_err) => ApiError::Database(db_err),
            FeedPostError::NotFound => ApiError::NotFound("Feed post not found".to_string()),
            FeedPostError::WorkspaceNotFound => {
                ApiError::NotFound("Workspace not found".to_string())
            }
            FeedPostError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::Database(db_err) => ApiError::Database(db_err),
            TaskServiceError::Task(task_err) => ApiError::from(task_err),
            TaskServiceError::TimeEntry(entry_err) => ApiError::from(entry_err),
            TaskServiceError::Auth(auth_err) => ApiError::from(auth_err),
            TaskServiceError::ProjectNotFound => {
                ApiError::NotFound("Project not found".to_string())
            }
        }
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::Database(db_err) => ApiError::Database(db_err),
            MembershipError::User(user_err) => ApiError::from(user_err),
            MembershipError::Auth(auth_err) => ApiError::from(auth_err),
            MembershipError::WorkspaceNotFound => {
                ApiError::NotFound("Workspace not found".to_string())
            }
            MembershipError::ProjectNotFound => {
                ApiError::NotFound("Project not found".to_string())
            }
            MembershipError::ValidationError(msg) => ApiError::BadRequest(msg),
            MembershipError::Upstream(msg) => ApiError::Upstream(msg),
        }
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::Database(db_err) => ApiError::Database(db_err),
            FeedError::Post(post_err) => ApiError::from(post_err),
            FeedError::Auth(auth_err) => ApiError::from(auth_err),
        }
    }
}

impl From<ActivityError> for ApiError {
    fn from(err: ActivityError) -> Self {
        match err {
            ActivityError::Database(db_err) => ApiError::Database(db_err),
            ActivityError::Auth(auth_err) => ApiError::from(auth_err),
            ActivityError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_maps_to_expected_http_statuses() {
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("missing".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadRequest("bad".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("conflict".to_string())
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Upstream("invite service down".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal("boom".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_errors_map_to_expected_http_statuses() {
        assert_eq!(
            ApiError::from(AuthError::Unauthorized)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SectorError::DuplicateName)
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(WorkspaceError::ValidationError("bad".to_string()))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(TaskError::NotFound).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(MembershipError::Upstream("smtp".to_string()))
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn unauthorized_never_reveals_resource_detail() {
        let response = ApiError::from(AuthError::Unauthorized).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        // The message is the bare denial, nothing about what was denied.
        assert_eq!(format!("{}", ApiError::Unauthorized), "Not authorized");
    }
}
