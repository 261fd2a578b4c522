// plan-backend/src/api/handlers/auth_handler.rs
use crate::api::dto::auth_dto::{AuthResponse, CurrentUserResponse, SigninRequest};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use tracing::info;
use validator::Validate;

/// サインイン
pub async fn signin_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "auth_handler::signin"))?;

    info!(identifier = %payload.identifier, "Signin attempt");

    let auth_response = app_state.auth_service.signin(payload).await?;

    info!(
        user_id = %auth_response.user.id,
        "Signin successful"
    );

    Ok(ApiResponse::success(auth_response))
}

/// 認証済みユーザー自身の情報を返す
pub async fn me_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<CurrentUserResponse>> {
    let current = app_state
        .auth_service
        .get_current_user(user.user_id())
        .await?;

    Ok(ApiResponse::success(CurrentUserResponse { user: current }))
}

// --- ルーター ---

pub fn auth_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/signin", post(signin_handler))
        .route("/auth/me", get(me_handler))
        .with_state(app_state)
}
