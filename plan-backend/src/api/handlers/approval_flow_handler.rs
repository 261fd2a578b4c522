// plan-backend/src/api/handlers/approval_flow_handler.rs

use crate::api::dto::approval_flow_dto::{
    AddApproverRoleRequest, ApprovalFlowDto, ApproverRoleDto, CreateApprovalFlowRequest,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Router,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub async fn list_flows_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<ApprovalFlowDto>>> {
    let flows = app_state.approval_flow_service.list_flows().await?;
    Ok(ApiResponse::success(flows))
}

pub async fn create_flow_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateApprovalFlowRequest>,
) -> AppResult<impl IntoResponse> {
    user.ensure_admin()?;

    info!(
        admin_id = %user.user_id(),
        module = %payload.module.as_str(),
        "Creating approval flow"
    );

    let flow = app_state.approval_flow_service.create_flow(payload).await?;

    Ok((StatusCode::CREATED, ApiResponse::success(flow)))
}

pub async fn list_approvers_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(flow_id): Path<Uuid>,
) -> AppResult<ApiResponse<Vec<ApproverRoleDto>>> {
    let flow = app_state.approval_flow_service.get_flow(flow_id).await?;
    Ok(ApiResponse::success(flow.roles))
}

pub async fn add_approver_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(flow_id): Path<Uuid>,
    Json(payload): Json<AddApproverRoleRequest>,
) -> AppResult<impl IntoResponse> {
    user.ensure_admin()?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "approval_flow_handler::add_approver"))?;

    info!(
        admin_id = %user.user_id(),
        flow_id = %flow_id,
        approver_id = %payload.user_id,
        approval_order = payload.approval_order,
        "Adding approver role to flow"
    );

    let role = app_state
        .approval_flow_service
        .add_approver(flow_id, payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(role)))
}

pub async fn remove_approver_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((flow_id, role_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    info!(
        admin_id = %user.user_id(),
        flow_id = %flow_id,
        role_id = %role_id,
        "Removing approver role from flow"
    );

    app_state
        .approval_flow_service
        .remove_approver(flow_id, role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// --- ルーター ---

pub fn approval_flow_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/approval-flows",
            get(list_flows_handler).post(create_flow_handler),
        )
        .route(
            "/approval-flows/{id}/approvers",
            get(list_approvers_handler).post(add_approver_handler),
        )
        .route(
            "/approval-flows/{id}/approvers/{role_id}",
            delete(remove_approver_handler),
        )
        .with_state(app_state)
}
