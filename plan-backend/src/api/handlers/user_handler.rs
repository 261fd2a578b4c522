// plan-backend/src/api/handlers/user_handler.rs
use crate::api::dto::common::PaginationQuery;
use crate::api::dto::user_dto::{
    CreateUserRequest, PaginatedDirectoryDto, PaginatedUsersDto, ProfileDto, UpdateProfileRequest,
    UpdateUserRequest, UserDto,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

// --- ユーザー管理（管理者専用） ---

pub async fn list_users_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<PaginationQuery>,
) -> AppResult<ApiResponse<PaginatedUsersDto>> {
    user.ensure_admin()?;

    let users = app_state.user_service.list_users(&params).await?;
    Ok(ApiResponse::success(users))
}

pub async fn create_user_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    user.ensure_admin()?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "user_handler::create_user"))?;

    info!(
        admin_id = %user.user_id(),
        username = %payload.username,
        "Creating new user"
    );

    let created = app_state.user_service.create_user(payload).await?;

    Ok((StatusCode::CREATED, ApiResponse::success(created)))
}

pub async fn get_user_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<UserDto>> {
    user.ensure_admin()?;

    let found = app_state.user_service.get_user(id).await?;
    Ok(ApiResponse::success(found))
}

pub async fn update_user_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserDto>> {
    user.ensure_admin()?;
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "user_handler::update_user"))?;

    info!(
        admin_id = %user.user_id(),
        target_user_id = %id,
        "Updating user"
    );

    let updated = app_state.user_service.update_user(id, payload).await?;
    Ok(ApiResponse::success(updated))
}

pub async fn delete_user_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    info!(
        admin_id = %user.user_id(),
        target_user_id = %id,
        "Deleting user"
    );

    app_state
        .user_service
        .delete_user(id, user.user_id())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// --- 職員名簿 ---

pub async fn directory_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(params): Query<PaginationQuery>,
) -> AppResult<ApiResponse<PaginatedDirectoryDto>> {
    let directory = app_state.user_service.get_directory(&params).await?;
    Ok(ApiResponse::success(directory))
}

// --- 自分のプロフィール ---

pub async fn get_profile_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<ProfileDto>> {
    let profile = app_state.user_service.get_profile(user.user_id()).await?;
    Ok(ApiResponse::success(profile))
}

pub async fn update_profile_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<ProfileDto>> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "user_handler::update_profile"))?;

    info!(user_id = %user.user_id(), "Updating own profile");

    let profile = app_state
        .user_service
        .update_profile(user.user_id(), payload)
        .await?;
    Ok(ApiResponse::success(profile))
}

// --- ルーター ---

pub fn user_router(app_state: AppState) -> Router {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route("/users/directory", get(directory_handler))
        .route(
            "/users/{id}",
            get(get_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
        .route(
            "/profile",
            get(get_profile_handler).patch(update_profile_handler),
        )
        .with_state(app_state)
}
