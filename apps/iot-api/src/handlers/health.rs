//! 健康检查 handler

use axum::{Json, response::IntoResponse};

/// 健康检查：无认证，仅确认进程存活。
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
