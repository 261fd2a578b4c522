// plan-backend/src/api/handlers/organization_handler.rs

use crate::api::dto::organization_dto::{
    CreateOrganizationLevelRequest, OrganizationLevelDto, OrganizationTreeNodeDto,
    UpdateOrganizationLevelRequest,
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
    routing::get,
    Router,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub async fn list_levels_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<OrganizationLevelDto>>> {
    let levels = app_state.organization_service.list_levels().await?;
    Ok(ApiResponse::success(levels))
}

pub async fn create_level_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateOrganizationLevelRequest>,
) -> AppResult<impl IntoResponse> {
    user.ensure_admin()?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "organization_handler::create_level"))?;

    info!(
        admin_id = %user.user_id(),
        level_name = %payload.name,
        "Creating organization level"
    );

    let level = app_state
        .organization_service
        .create_level(payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(level)))
}

pub async fn get_level_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<OrganizationLevelDto>> {
    let level = app_state.organization_service.get_level(id).await?;
    Ok(ApiResponse::success(level))
}

pub async fn update_level_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrganizationLevelRequest>,
) -> AppResult<ApiResponse<OrganizationLevelDto>> {
    user.ensure_admin()?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "organization_handler::update_level"))?;

    info!(
        admin_id = %user.user_id(),
        level_id = %id,
        "Updating organization level"
    );

    let level = app_state
        .organization_service
        .update_level(id, payload)
        .await?;
    Ok(ApiResponse::success(level))
}

/// 組織ツリーを返す（Centralを根とする階層表示用）
pub async fn get_tree_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<OrganizationTreeNodeDto>>> {
    let tree = app_state.organization_service.get_tree().await?;
    Ok(ApiResponse::success(tree))
}

// --- ルーター ---

pub fn organization_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/organization/levels",
            get(list_levels_handler).post(create_level_handler),
        )
        .route(
            "/organization/levels/{id}",
            get(get_level_handler).patch(update_level_handler),
        )
        .route("/organization/tree", get(get_tree_handler))
        .with_state(app_state)
}
