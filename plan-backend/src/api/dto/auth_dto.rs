// plan-backend/src/api/dto/auth_dto.rs

use crate::api::dto::user_dto::UserDto;
use crate::utils::validation::common;
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- リクエストDTO ---

/// ログインリクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(length(min = common::required::MIN_LENGTH, message = "Email or username is required"))]
    pub identifier: String, // email or username

    #[validate(length(min = common::required::MIN_LENGTH, message = "Password is required"))]
    pub password: String,
}

// --- レスポンスDTO ---

/// 認証レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserDto,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthResponse {
    pub fn new(user: UserDto, access_token: String, expires_in_minutes: i64) -> Self {
        Self {
            user,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: expires_in_minutes * 60,
        }
    }
}

/// 認証済みユーザー情報レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub user: UserDto,
}
