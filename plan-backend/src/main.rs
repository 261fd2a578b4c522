// src/main.rs
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod db;
mod domain;
mod error;
mod logging;
mod middleware;
mod repository;
mod service;
mod types;
mod utils;

use crate::api::{create_app, AppState};
use crate::config::Config;
use crate::db::create_db_pool;
use crate::service::notification_service::spawn_notification_worker;
use crate::utils::email::EmailService;
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plan_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Plan Backend server...");

    // 設定を読み込む
    let app_config = Config::from_env().expect("Failed to load configuration");

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Database pool created successfully.");

    // 認証まわりのマネージャ
    let password_manager =
        Arc::new(PasswordManager::from_env().expect("Failed to initialize password manager"));
    let jwt_manager = Arc::new(JwtManager::from_env().expect("Failed to initialize JWT manager"));

    // メール送信と通知ワーカー
    let email_service =
        Arc::new(EmailService::from_env().expect("Failed to initialize email service"));
    let notifier = spawn_notification_worker(db_pool.clone(), email_service);

    // アプリケーション状態とルーター
    let app_state = AppState::new(db_pool, password_manager, jwt_manager, notifier);
    let app_router = create_app(app_state);

    // サーバーの起動
    tracing::info!(
        "Router configured. Server listening on {}",
        app_config.server_addr
    );

    let listener = TcpListener::bind(&app_config.server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
