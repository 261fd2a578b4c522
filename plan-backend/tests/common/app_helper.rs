// tests/common/app_helper.rs

use axum::Router;
use plan_backend::{
    api::{create_app, AppState},
    domain::user_model::{self, UserClaims},
    service::notification_service::spawn_notification_worker,
    utils::{
        email::{EmailConfig, EmailService},
        jwt::{JwtConfig, JwtManager},
        password::PasswordManager,
    },
};
use std::sync::Arc;

use crate::common;

/// テスト用のJWT設定（秘密鍵は32文字以上が必要）
fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret_key: "test-jwt-secret-key-for-integration-tests-0001".to_string(),
        access_token_expiry_minutes: 60,
        issuer: "plan-backend".to_string(),
        audience: "plan-backend-users".to_string(),
    }
}

/// テスト用アプリ一式
///
/// dbを保持しているのはインメモリSQLiteが接続と共に消えるため。
pub struct TestApp {
    pub app: Router,
    pub db: common::db::TestDatabase,
    pub jwt_manager: Arc<JwtManager>,
    pub password_manager: Arc<PasswordManager>,
}

impl TestApp {
    /// ユーザーのアクセストークンを発行
    pub fn token_for(&self, user: &user_model::Model) -> String {
        self.jwt_manager
            .generate_access_token(UserClaims::from(user))
            .expect("generate access token")
    }
}

/// アプリ全体をセットアップ（全ルーター + 認証ミドルウェア）
pub async fn setup_app() -> TestApp {
    common::init_test_env();

    let db = common::db::TestDatabase::new().await;

    let password_manager = Arc::new(PasswordManager::new_default().expect("password manager"));
    let jwt_manager = Arc::new(JwtManager::new(test_jwt_config()).expect("jwt manager"));
    let email_service = Arc::new(
        EmailService::new(EmailConfig {
            development_mode: true,
            ..Default::default()
        })
        .expect("email service"),
    );
    let notifier = spawn_notification_worker(db.connection.clone(), email_service);

    let app_state = AppState::new(
        db.connection.clone(),
        password_manager.clone(),
        jwt_manager.clone(),
        notifier,
    );

    TestApp {
        app: create_app(app_state),
        db,
        jwt_manager,
        password_manager,
    }
}
