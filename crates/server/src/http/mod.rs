use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::trace::TraceLayer;

use crate::{AppState, middleware, routes};

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::users::router())
        .merge(routes::workspaces::router(&state))
        .merge(routes::projects::router(&state))
        .merge(routes::tasks::router(&state))
        .merge(routes::sectors::router(&state))
        .merge(routes::task_types::router(&state))
        .merge(routes::feed::router(&state))
        .merge(routes::activity::router(&state))
        .layer(from_fn_with_state(state.clone(), middleware::require_identity));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use db::{
        DBService,
        models::user::{CreateUser, SuperUser, User},
        types::GlobalRole,
    };
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::AppState;
    use crate::middleware::USER_ID_HEADER;

    async fn setup_state() -> AppState {
        let pool = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&pool, None).await.unwrap();
        AppState::new(DBService { pool })
    }

    async fn create_user(state: &AppState, email: &str, role: GlobalRole) -> User {
        let user = User::create(
            &state.db().pool,
            &CreateUser {
                email: email.to_string(),
                display_name: email.to_string(),
                global_role: Some(role),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        // Route-level tests act as fully set-up users unless noted.
        User::mark_password_set(&state.db().pool, user.id)
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_is_open() {
        let state = setup_state().await;
        let app = super::router(state);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_requires_a_known_user() {
        let state = setup_state().await;
        let app = super::router(state);

        let response = app
            .clone()
            .oneshot(Request::get("/api/workspaces").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::get("/api/workspaces")
                    .header(USER_ID_HEADER, Uuid::new_v4().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn password_setup_is_a_hard_precondition() {
        let state = setup_state().await;
        let user = User::create(
            &state.db().pool,
            &CreateUser {
                email: "invitee@example.com".to_string(),
                display_name: "Invitee".to_string(),
                global_role: Some(GlobalRole::Executor),
            },
            Uuid::new_v4(),
        )
        .await
        .unwrap();
        let app = super::router(state);

        // Everything except the setup route is blocked.
        let response = app
            .clone()
            .oneshot(
                Request::get("/api/workspaces")
                    .header(USER_ID_HEADER, user.id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/users/password-setup")
                    .header(USER_ID_HEADER, user.id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/api/workspaces")
                    .header(USER_ID_HEADER, user.id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn workspace_lifecycle_over_http() {
        let state = setup_state().await;
        let manager = create_user(&state, "manager@example.com", GlobalRole::Manager).await;
        let viewer = create_user(&state, "viewer@example.com", GlobalRole::Viewer).await;
        let app = super::router(state);

        // Viewers cannot create workspaces.
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/workspaces")
                    .header(USER_ID_HEADER, viewer.id.to_string())
                    .header("content-type", "application/json")
                    .body(Body::from(json!({"name": "Equipe"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/workspaces")
                    .header(USER_ID_HEADER, manager.id.to_string())
                    .header("content-type", "application/json")
                    .body(Body::from(json!({"name": "Equipe"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let workspace_id = body["data"]["id"].as_str().unwrap().to_string();

        // A non-member probing the id gets the uniform denial.
        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/api/workspaces/{workspace_id}"))
                    .header(USER_ID_HEADER, viewer.id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // So does probing a workspace that does not exist at all.
        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/api/workspaces/{}", Uuid::new_v4()))
                    .header(USER_ID_HEADER, viewer.id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // A delete attempt by the non-member fails with the same denial and
        // leaves the workspace in place.
        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/workspaces/{workspace_id}"))
                    .header(USER_ID_HEADER, viewer.id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::get(format!("/api/workspaces/{workspace_id}"))
                    .header(USER_ID_HEADER, manager.id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn super_user_bypasses_membership_checks() {
        let state = setup_state().await;
        let manager = create_user(&state, "manager@example.com", GlobalRole::Manager).await;
        let admin = create_user(&state, "admin@example.com", GlobalRole::Viewer).await;
        SuperUser::grant(&state.db().pool, admin.id).await.unwrap();
        let app = super::router(state);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/workspaces")
                    .header(USER_ID_HEADER, manager.id.to_string())
                    .header("content-type", "application/json")
                    .body(Body::from(json!({"name": "Equipe"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        let workspace_id = body["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::get(format!("/api/workspaces/{workspace_id}"))
                    .header(USER_ID_HEADER, admin.id.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
