// plan-backend/src/api/handlers/activity_handler.rs

use crate::api::dto::activity_dto::{ActivityDto, UpdateActivityRequest};
use crate::api::dto::approval_dto::ApprovalDto;
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, Path, State},
    routing::get,
    Router,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// 活動の詳細を取得
pub async fn get_activity_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<ActivityDto>> {
    let activity = app_state.activity_service.get_activity(id).await?;
    Ok(ApiResponse::success(activity))
}

pub async fn update_activity_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateActivityRequest>,
) -> AppResult<ApiResponse<ActivityDto>> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "activity_handler::update_activity"))?;

    info!(
        user_id = %user.user_id(),
        activity_id = %id,
        "Updating activity"
    );

    let activity = app_state
        .activity_service
        .update_activity(id, payload)
        .await?;
    Ok(ApiResponse::success(activity))
}

/// 活動の承認レコード一覧（承認順に並ぶ）
pub async fn list_activity_approvals_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Vec<ApprovalDto>>> {
    let approvals = app_state.activity_service.list_approvals(id).await?;
    Ok(ApiResponse::success(approvals))
}

// --- ルーター ---

pub fn activity_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/activities/{id}",
            get(get_activity_handler).patch(update_activity_handler),
        )
        .route(
            "/activities/{id}/approvals",
            get(list_activity_approvals_handler),
        )
        .with_state(app_state)
}
