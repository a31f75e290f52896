use axum::{Json, response::Json as ResponseJson};
use utils::response::ApiResponse;

pub async fn health_check() -> ResponseJson<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}
