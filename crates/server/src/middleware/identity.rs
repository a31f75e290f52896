use auth::AuthContext;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Route reachable before password setup completes.
const PASSWORD_SETUP_PATH: &str = "/users/password-setup";

/// Resolve the acting user into an `AuthContext` request extension. Until
/// the invited user finishes password setup, every route except the setup
/// endpoint is off-limits.
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .ok_or(ApiError::Unauthorized)?;

    let ctx = AuthContext::resolve(&state.db().pool, user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !ctx.password_set && request.uri().path() != PASSWORD_SETUP_PATH {
        return Err(ApiError::BadRequest(
            "Password setup must be completed first".to_string(),
        ));
    }

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
