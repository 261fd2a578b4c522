// plan-backend/src/api/handlers/plan_handler.rs

use crate::api::dto::activity_dto::{ActivityDto, CreateActivityRequest};
use crate::api::dto::plan_dto::{AnnualPlanDetailDto, AnnualPlanDto, CreateAnnualPlanRequest};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    body::Body,
    extract::{Json, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

// --- 年間計画 ---

pub async fn list_plans_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<AnnualPlanDto>>> {
    let plans = app_state.plan_service.list_plans(&user.claims).await?;
    Ok(ApiResponse::success(plans))
}

pub async fn create_plan_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateAnnualPlanRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "plan_handler::create_plan"))?;

    info!(
        user_id = %user.user_id(),
        year = payload.year,
        organization_level_id = %payload.organization_level_id,
        "Creating annual plan"
    );

    let plan = app_state
        .plan_service
        .create_plan(&user.claims, payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(plan)))
}

pub async fn get_plan_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<AnnualPlanDetailDto>> {
    let detail = app_state.plan_service.get_plan_detail(id).await?;
    Ok(ApiResponse::success(detail))
}

pub async fn approve_plan_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<AnnualPlanDto>> {
    info!(
        user_id = %user.user_id(),
        plan_id = %id,
        "Approving annual plan"
    );

    let plan = app_state.plan_service.approve_plan(id, &user.claims).await?;
    Ok(ApiResponse::success(plan))
}

// --- 計画配下の活動 ---

pub async fn create_activity_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(plan_id): Path<Uuid>,
    Json(payload): Json<CreateActivityRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "plan_handler::create_activity"))?;

    info!(
        user_id = %user.user_id(),
        plan_id = %plan_id,
        activity_name = %payload.name,
        "Creating activity"
    );

    let activity = app_state
        .activity_service
        .create_activity(plan_id, payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(activity)))
}

pub async fn list_plan_activities_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(plan_id): Path<Uuid>,
) -> AppResult<ApiResponse<Vec<ActivityDto>>> {
    let activities = app_state.activity_service.list_by_plan(plan_id).await?;
    Ok(ApiResponse::success(activities))
}

// --- レポート ---

/// 計画の活動一覧をCSVでダウンロードさせる
pub async fn plan_report_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(plan_id): Path<Uuid>,
) -> AppResult<Response> {
    info!(
        user_id = %user.user_id(),
        plan_id = %plan_id,
        "Downloading plan report"
    );

    let report = app_state.report_service.generate_plan_report(plan_id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        mime::TEXT_CSV.as_ref().parse().unwrap(),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", report.filename)
            .parse()
            .unwrap(),
    );

    Ok((StatusCode::OK, headers, Body::from(report.content)).into_response())
}

// --- ルーター ---

pub fn plan_router(app_state: AppState) -> Router {
    Router::new()
        .route("/plans", get(list_plans_handler).post(create_plan_handler))
        .route("/plans/{id}", get(get_plan_handler))
        .route("/plans/{id}/approve", post(approve_plan_handler))
        .route(
            "/plans/{id}/activities",
            get(list_plan_activities_handler).post(create_activity_handler),
        )
        .route("/plans/{id}/report", get(plan_report_handler))
        .with_state(app_state)
}
