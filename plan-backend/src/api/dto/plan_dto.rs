// plan-backend/src/api/dto/plan_dto.rs

use crate::api::dto::activity_dto::ActivityDto;
use crate::domain::annual_plan_model;
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// 年間計画作成リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnnualPlanRequest {
    #[validate(range(
        min = common::plan::YEAR_MIN,
        max = common::plan::YEAR_MAX,
        message = "Year must be between 2023 and 2030"
    ))]
    pub year: i32,

    pub organization_level_id: Uuid,
}

// --- レスポンスDTO ---

/// 年間計画情報レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualPlanDto {
    pub id: Uuid,
    pub year: i32,
    pub created_by: Uuid,
    pub approved: bool,
    pub approved_by: Option<Uuid>,
    pub organization_level_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<annual_plan_model::Model> for AnnualPlanDto {
    fn from(plan: annual_plan_model::Model) -> Self {
        Self {
            id: plan.id,
            year: plan.year,
            created_by: plan.created_by,
            approved: plan.approved,
            approved_by: plan.approved_by,
            organization_level_id: plan.organization_level_id,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }
}

/// 年間計画詳細レスポンス（所属する活動を含む）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualPlanDetailDto {
    #[serde(flatten)]
    pub plan: AnnualPlanDto,
    pub organization_level_name: String,
    pub activities: Vec<ActivityDto>,
}
