// plan-backend/src/service/auth_service.rs

use crate::api::dto::auth_dto::{AuthResponse, SigninRequest};
use crate::api::dto::user_dto::UserDto;
use crate::db::DbPool;
use crate::domain::user_model::UserClaims;
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::UserRepository;
use crate::utils::error_helper::{internal_server_error, not_found_error};
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// 認証サービス
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    password_manager: Arc<PasswordManager>,
    jwt_manager: Arc<JwtManager>,
}

impl AuthService {
    pub fn new(
        db_pool: DbPool,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
    ) -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new(db_pool)),
            password_manager,
            jwt_manager,
        }
    }

    /// ログイン
    pub async fn signin(&self, signin_data: SigninRequest) -> AppResult<AuthResponse> {
        signin_data
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Validation failed: {}", e)))?;

        // メールアドレスまたはユーザー名で検索
        let user = self
            .user_repo
            .find_by_email_or_username(&signin_data.identifier)
            .await?
            .ok_or_else(|| {
                warn!(
                    identifier = %signin_data.identifier,
                    "Login attempt with invalid credentials"
                );
                AppError::Unauthorized("Invalid credentials".to_string())
            })?;

        // アカウント状態チェック
        if !user.is_active {
            warn!(
                user_id = %user.id,
                "Login attempt for inactive account"
            );
            return Err(AppError::Unauthorized("Account is inactive".to_string()));
        }

        // パスワード検証
        let is_valid = self
            .password_manager
            .verify_password(&signin_data.password, &user.password_hash)
            .map_err(|e| {
                internal_server_error(e, "auth_service::signin", "Authentication failed")
            })?;

        if !is_valid {
            warn!(
                user_id = %user.id,
                "Login attempt with wrong password"
            );
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        // アクセストークン発行
        let claims = UserClaims::from(&user);
        let access_token = self
            .jwt_manager
            .generate_access_token(claims)
            .map_err(|e| {
                internal_server_error(e, "auth_service::signin", "Token generation failed")
            })?;

        info!(
            user_id = %user.id,
            username = %user.username,
            "User signed in successfully"
        );

        Ok(AuthResponse::new(
            user.into(),
            access_token,
            self.jwt_manager.access_token_expiry_minutes(),
        ))
    }

    /// 認証済みユーザー自身の情報を取得
    pub async fn get_current_user(&self, user_id: Uuid) -> AppResult<UserDto> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                not_found_error("User", &user_id.to_string(), "auth_service::get_current_user")
            })?;

        Ok(user.into())
    }
}
