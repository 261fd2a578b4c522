// plan-backend/src/service/plan_service.rs

use crate::api::dto::plan_dto::{AnnualPlanDetailDto, AnnualPlanDto, CreateAnnualPlanRequest};
use crate::db::DbPool;
use crate::domain::user_model::UserClaims;
use crate::error::AppResult;
use crate::repository::annual_plan_repository::{AnnualPlanRepository, CreateAnnualPlan};
use crate::repository::organization_level_repository::OrganizationLevelRepository;
use crate::service::activity_service::ActivityService;
use crate::utils::error_helper::{
    conflict_error, forbidden_error, internal_server_error, not_found_error, validation_error,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 年間計画サービス
pub struct PlanService {
    plan_repo: Arc<AnnualPlanRepository>,
    level_repo: Arc<OrganizationLevelRepository>,
    activity_service: Arc<ActivityService>,
}

impl PlanService {
    pub fn new(db_pool: DbPool, activity_service: Arc<ActivityService>) -> Self {
        Self {
            plan_repo: Arc::new(AnnualPlanRepository::new(db_pool.clone())),
            level_repo: Arc::new(OrganizationLevelRepository::new(db_pool)),
            activity_service,
        }
    }

    /// 閲覧可能な年間計画の一覧を取得
    ///
    /// 管理者は全計画を、それ以外は自分が責任者を務める階層の計画だけを見る。
    pub async fn list_plans(&self, user: &UserClaims) -> AppResult<Vec<AnnualPlanDto>> {
        let plans = if user.is_admin {
            self.plan_repo.find_all().await?
        } else {
            let directed = self.level_repo.find_by_director(user.user_id).await?;
            let level_ids: Vec<Uuid> = directed.iter().map(|level| level.id).collect();
            self.plan_repo.find_by_level_ids(&level_ids).await?
        };

        Ok(plans.into_iter().map(AnnualPlanDto::from).collect())
    }

    /// 年間計画を作成
    pub async fn create_plan(
        &self,
        user: &UserClaims,
        request: CreateAnnualPlanRequest,
    ) -> AppResult<AnnualPlanDto> {
        self.level_repo
            .find_by_id(request.organization_level_id)
            .await?
            .ok_or_else(|| {
                validation_error("organization_level_id", "Organization level does not exist")
            })?;

        // 同一年度・同一階層の計画は1件まで
        if self
            .plan_repo
            .find_by_year_and_level(request.year, request.organization_level_id)
            .await?
            .is_some()
        {
            return Err(conflict_error(
                "An annual plan already exists for this year and organization level",
                "plan_service::create_plan",
            ));
        }

        let plan = self
            .plan_repo
            .create(CreateAnnualPlan {
                year: request.year,
                created_by: user.user_id,
                organization_level_id: request.organization_level_id,
            })
            .await?;

        info!(
            plan_id = %plan.id,
            year = plan.year,
            organization_level_id = %plan.organization_level_id,
            created_by = %user.user_id,
            "Annual plan created successfully"
        );

        Ok(plan.into())
    }

    /// 年間計画の詳細（所属する活動を含む）を取得
    pub async fn get_plan_detail(&self, plan_id: Uuid) -> AppResult<AnnualPlanDetailDto> {
        let plan = self
            .plan_repo
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Annual plan",
                    &plan_id.to_string(),
                    "plan_service::get_plan_detail",
                )
            })?;

        let level = self
            .level_repo
            .find_by_id(plan.organization_level_id)
            .await?
            .ok_or_else(|| {
                internal_server_error(
                    format!(
                        "Organization level {} referenced by plan {} is missing",
                        plan.organization_level_id, plan_id
                    ),
                    "plan_service::get_plan_detail",
                    "Failed to load annual plan",
                )
            })?;

        let activities = self.activity_service.list_by_plan(plan_id).await?;

        Ok(AnnualPlanDetailDto {
            plan: plan.into(),
            organization_level_name: level.name,
            activities,
        })
    }

    /// 年間計画を承認済みにする
    ///
    /// 承認できるのは管理者か、その計画の階層の責任者だけ。
    pub async fn approve_plan(&self, plan_id: Uuid, user: &UserClaims) -> AppResult<AnnualPlanDto> {
        let plan = self
            .plan_repo
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Annual plan",
                    &plan_id.to_string(),
                    "plan_service::approve_plan",
                )
            })?;

        if plan.approved {
            return Err(conflict_error(
                "Annual plan is already approved",
                "plan_service::approve_plan",
            ));
        }

        if !user.is_admin {
            let level = self
                .level_repo
                .find_by_id(plan.organization_level_id)
                .await?
                .ok_or_else(|| {
                    internal_server_error(
                        format!(
                            "Organization level {} referenced by plan {} is missing",
                            plan.organization_level_id, plan_id
                        ),
                        "plan_service::approve_plan",
                        "Failed to load annual plan",
                    )
                })?;

            if level.director_id != user.user_id {
                return Err(forbidden_error(
                    "Only the level director or an administrator can approve this plan",
                    "plan_service::approve_plan",
                    Some(&user.user_id.to_string()),
                ));
            }
        }

        let approved = self
            .plan_repo
            .approve(plan_id, user.user_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Annual plan",
                    &plan_id.to_string(),
                    "plan_service::approve_plan",
                )
            })?;

        info!(
            plan_id = %plan_id,
            approved_by = %user.user_id,
            "Annual plan approved"
        );

        Ok(approved.into())
    }
}
