// plan-backend/src/middleware/auth.rs

use crate::domain::user_model::UserClaims;
use crate::error::AppError;
use crate::utils::jwt::JwtManager;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

/// JWT認証ミドルウェアの設定
#[derive(Clone)]
pub struct AuthMiddlewareConfig {
    pub jwt_manager: Arc<JwtManager>,
    /// 認証なしで通すパス（前方一致）
    pub skip_auth_paths: Vec<String>,
}

impl AuthMiddlewareConfig {
    pub fn new(jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            jwt_manager,
            skip_auth_paths: vec!["/auth/signin".to_string(), "/health".to_string()],
        }
    }
}

/// 認証済みユーザー情報を格納するエクステンション
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: UserClaims,
    pub access_token: String,
}

impl AuthenticatedUser {
    pub fn new(claims: UserClaims, access_token: String) -> Self {
        Self {
            claims,
            access_token,
        }
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.claims.user_id
    }

    /// 管理者かチェック
    pub fn is_admin(&self) -> bool {
        self.claims.is_admin
    }

    /// 管理者でなければForbidden
    pub fn ensure_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            warn!(
                user_id = %self.user_id(),
                "Admin-only operation attempted by non-admin user"
            );
            Err(AppError::Forbidden(
                "Administrator privileges required".to_string(),
            ))
        }
    }
}

/// JWT認証ミドルウェア
///
/// AuthorizationヘッダーのBearerトークンを検証し、成功したら
/// AuthenticatedUserをリクエストエクステンションに積む。
pub async fn jwt_auth_middleware(
    State(config): State<AuthMiddlewareConfig>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    if should_skip_auth(&path, &config.skip_auth_paths) {
        return Ok(next.run(request).await);
    }

    let token = extract_token(&headers).ok_or_else(|| {
        warn!(path = %path, "Missing authentication token");
        AppError::Unauthorized("Authentication required".to_string())
    })?;

    let access_claims = config
        .jwt_manager
        .verify_access_token(&token)
        .map_err(|e| {
            warn!(path = %path, error = %e, "Invalid access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    let user_claims = access_claims.user.clone();

    if !user_claims.is_active {
        warn!(
            user_id = %user_claims.user_id,
            path = %path,
            "Access attempt with inactive account"
        );
        return Err(AppError::Forbidden("Account is inactive".to_string()));
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser::new(user_claims, token));

    Ok(next.run(request).await)
}

// --- ヘルパー関数 ---

/// AuthorizationヘッダーからBearerトークンを抽出
fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer ").map(|s| s.to_string()))
}

/// 認証をスキップするパスかチェック
fn should_skip_auth(path: &str, skip_paths: &[String]) -> bool {
    skip_paths
        .iter()
        .any(|skip_path| path.starts_with(skip_path) || path == skip_path)
}

/// CORS ミドルウェア設定
pub fn cors_layer() -> tower_http::cors::CorsLayer {
    use std::env;

    // CORS_ALLOWED_ORIGINS環境変数から許可するオリジンを取得
    // 設定されていない場合はFRONTEND_URLを使用、それもなければデフォルト値
    let allowed_origin = env::var("CORS_ALLOWED_ORIGINS")
        .or_else(|_| env::var("FRONTEND_URL"))
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    let origin_header = allowed_origin
        .parse::<axum::http::HeaderValue>()
        .expect("Invalid CORS origin");

    tower_http::cors::CorsLayer::new()
        .allow_origin(origin_header)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(std::time::Duration::from_secs(3600))
}

// --- Axum Extractors ---

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn claims(is_admin: bool) -> UserClaims {
        UserClaims {
            user_id: uuid::Uuid::new_v4(),
            username: "taro".to_string(),
            email: "taro@example.com".to_string(),
            position: "regional_specialist".to_string(),
            is_admin,
            is_active: true,
        }
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        assert_eq!(extract_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_extract_token_missing_or_malformed() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc.def"));
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_should_skip_auth_matches_prefix() {
        let skip = vec!["/auth/signin".to_string(), "/health".to_string()];
        assert!(should_skip_auth("/auth/signin", &skip));
        assert!(should_skip_auth("/health", &skip));
        assert!(!should_skip_auth("/users", &skip));
    }

    #[test]
    fn test_ensure_admin() {
        let admin = AuthenticatedUser::new(claims(true), "token".to_string());
        assert!(admin.ensure_admin().is_ok());

        let member = AuthenticatedUser::new(claims(false), "token".to_string());
        assert!(matches!(
            member.ensure_admin(),
            Err(AppError::Forbidden(_))
        ));
    }
}
