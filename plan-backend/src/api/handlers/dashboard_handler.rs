// plan-backend/src/api/handlers/dashboard_handler.rs

use crate::api::dto::dashboard_dto::DashboardSummaryDto;
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use axum::{extract::State, routing::get, Router};

pub async fn dashboard_summary_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> AppResult<ApiResponse<DashboardSummaryDto>> {
    let summary = app_state.dashboard_service.get_summary().await?;
    Ok(ApiResponse::success(summary))
}

// --- ルーター ---

pub fn dashboard_router(app_state: AppState) -> Router {
    Router::new()
        .route("/dashboard/summary", get(dashboard_summary_handler))
        .with_state(app_state)
}
