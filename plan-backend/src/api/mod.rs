// plan-backend/src/api/mod.rs
use crate::db::DbPool;
use crate::logging::request_logging_middleware;
use crate::middleware::auth::{cors_layer, jwt_auth_middleware, AuthMiddlewareConfig};
use crate::service::{
    activity_service::ActivityService, approval_flow_service::ApprovalFlowService,
    approval_service::ApprovalService, auth_service::AuthService,
    dashboard_service::DashboardService, notification_service::ActivityNotifier,
    organization_service::OrganizationService, plan_service::PlanService,
    report_service::ReportService, user_service::UserService,
};
use crate::types::ApiResponse;
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

use handlers::{
    activity_handler::activity_router, approval_flow_handler::approval_flow_router,
    approval_handler::approval_router, auth_handler::auth_router,
    dashboard_handler::dashboard_router, organization_handler::organization_router,
    plan_handler::plan_router, user_handler::user_router,
};

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub organization_service: Arc<OrganizationService>,
    pub approval_flow_service: Arc<ApprovalFlowService>,
    pub plan_service: Arc<PlanService>,
    pub activity_service: Arc<ActivityService>,
    pub approval_service: Arc<ApprovalService>,
    pub dashboard_service: Arc<DashboardService>,
    pub report_service: Arc<ReportService>,
    pub jwt_manager: Arc<JwtManager>,
    pub db: DbPool,
}

impl AppState {
    /// サービス群を依存順に組み立てる
    pub fn new(
        db_pool: DbPool,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
        notifier: ActivityNotifier,
    ) -> Self {
        let organization_service = Arc::new(OrganizationService::new(db_pool.clone()));
        let activity_service = Arc::new(ActivityService::new(
            db_pool.clone(),
            organization_service.clone(),
        ));
        let plan_service = Arc::new(PlanService::new(db_pool.clone(), activity_service.clone()));

        Self {
            auth_service: Arc::new(AuthService::new(
                db_pool.clone(),
                password_manager.clone(),
                jwt_manager.clone(),
            )),
            user_service: Arc::new(UserService::new(db_pool.clone(), password_manager)),
            organization_service,
            approval_flow_service: Arc::new(ApprovalFlowService::new(db_pool.clone())),
            plan_service,
            activity_service,
            approval_service: Arc::new(ApprovalService::new(db_pool.clone(), notifier)),
            dashboard_service: Arc::new(DashboardService::new(db_pool.clone())),
            report_service: Arc::new(ReportService::new(db_pool.clone())),
            jwt_manager,
            db: db_pool,
        }
    }
}

/// ヘルスチェック（認証不要）
async fn health_check_handler() -> ApiResponse<serde_json::Value> {
    ApiResponse::success(serde_json::json!({ "status": "healthy" }))
}

/// 全ルーターとミドルウェアを組み上げる
pub fn create_app(app_state: AppState) -> Router {
    let auth_config = AuthMiddlewareConfig::new(app_state.jwt_manager.clone());

    Router::new()
        .merge(auth_router(app_state.clone()))
        .merge(user_router(app_state.clone()))
        .merge(organization_router(app_state.clone()))
        .merge(approval_flow_router(app_state.clone()))
        .merge(plan_router(app_state.clone()))
        .merge(activity_router(app_state.clone()))
        .merge(approval_router(app_state.clone()))
        .merge(dashboard_router(app_state))
        .route("/health", get(health_check_handler))
        .layer(middleware::from_fn_with_state(
            auth_config,
            jwt_auth_middleware,
        ))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
