// plan-backend/src/api/handlers/approval_handler.rs

use crate::api::dto::approval_dto::{
    ApprovalDecisionResultDto, DecideApprovalRequest, PendingApprovalDto,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// 自分宛の未判定承認一覧
pub async fn list_pending_approvals_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<PendingApprovalDto>>> {
    let pending = app_state
        .approval_service
        .list_my_pending(user.user_id())
        .await?;
    Ok(ApiResponse::success(pending))
}

/// 承認判定（承認または却下）
pub async fn decide_approval_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecideApprovalRequest>,
) -> AppResult<ApiResponse<ApprovalDecisionResultDto>> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "approval_handler::decide_approval"))?;

    info!(
        user_id = %user.user_id(),
        approval_id = %id,
        approved = payload.decision.is_approved(),
        "Deciding approval"
    );

    let result = app_state
        .approval_service
        .decide(id, user.user_id(), payload)
        .await?;
    Ok(ApiResponse::success(result))
}

// --- ルーター ---

pub fn approval_router(app_state: AppState) -> Router {
    Router::new()
        .route("/approvals/pending", get(list_pending_approvals_handler))
        .route("/approvals/{id}/decide", post(decide_approval_handler))
        .with_state(app_state)
}
