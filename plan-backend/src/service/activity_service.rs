// plan-backend/src/service/activity_service.rs

use crate::api::dto::activity_dto::{ActivityDto, CreateActivityRequest, UpdateActivityRequest};
use crate::api::dto::approval_dto::ApprovalDto;
use crate::db::DbPool;
use crate::domain::activity_model;
use crate::error::AppResult;
use crate::repository::activity_repository::{
    ActivityRepository, CreateActivity, UpdateActivity,
};
use crate::repository::annual_plan_repository::AnnualPlanRepository;
use crate::repository::approval_repository::ApprovalRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::organization_service::OrganizationService;
use crate::utils::error_helper::{not_found_error, validation_error};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 活動サービス
///
/// 活動の作成時に承認ワークフローを起動する。承認レコードの組み立ては
/// リポジトリが同一トランザクションで行う。
pub struct ActivityService {
    activity_repo: Arc<ActivityRepository>,
    approval_repo: Arc<ApprovalRepository>,
    plan_repo: Arc<AnnualPlanRepository>,
    user_repo: Arc<UserRepository>,
    organization_service: Arc<OrganizationService>,
}

impl ActivityService {
    pub fn new(db_pool: DbPool, organization_service: Arc<OrganizationService>) -> Self {
        Self {
            activity_repo: Arc::new(ActivityRepository::new(db_pool.clone())),
            approval_repo: Arc::new(ApprovalRepository::new(db_pool.clone())),
            plan_repo: Arc::new(AnnualPlanRepository::new(db_pool.clone())),
            user_repo: Arc::new(UserRepository::new(db_pool)),
            organization_service,
        }
    }

    /// 活動を作成し、承認ワークフローを起動する
    ///
    /// 解決された承認者1人につき1件のPending承認レコードが、
    /// 活動本体と同一トランザクションで作成される。
    pub async fn create_activity(
        &self,
        plan_id: Uuid,
        request: CreateActivityRequest,
    ) -> AppResult<ActivityDto> {
        let plan = self
            .plan_repo
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Annual plan",
                    &plan_id.to_string(),
                    "activity_service::create_activity",
                )
            })?;

        Self::validate_dates(request.start_date, request.end_date)?;

        // 担当者は計画と同じ組織レベルに所属していなければならない
        let responsible = self
            .user_repo
            .find_by_id(request.responsible_id)
            .await?
            .ok_or_else(|| {
                validation_error("responsible_id", "Responsible user does not exist")
            })?;

        if !responsible.is_active {
            return Err(validation_error(
                "responsible_id",
                "Responsible user is inactive",
            ));
        }

        if responsible.organization_level_id != Some(plan.organization_level_id) {
            return Err(validation_error(
                "responsible_id",
                "Responsible user must belong to the plan's organization level",
            ));
        }

        // 承認者列を解決してから、活動と承認レコードをまとめて永続化
        let approver_ids = self
            .organization_service
            .resolve_approvers(plan.organization_level_id)
            .await?;

        let (activity, approvals) = self
            .activity_repo
            .create_with_approvals(
                CreateActivity {
                    plan_id,
                    name: request.name,
                    description: request.description.unwrap_or_default(),
                    responsible_id: request.responsible_id,
                    start_date: request.start_date,
                    end_date: request.end_date,
                },
                &approver_ids,
            )
            .await?;

        info!(
            activity_id = %activity.id,
            plan_id = %plan_id,
            approval_count = approvals.len(),
            "Activity created with approval workflow"
        );

        let mut dto = ActivityDto::from(activity);
        dto.responsible_name = Some(responsible.full_name());
        Ok(dto)
    }

    /// 活動を更新
    ///
    /// Approved / Rejected は承認ワークフロー専用の状態であり、
    /// 手動での出入りは拒否される。
    pub async fn update_activity(
        &self,
        activity_id: Uuid,
        request: UpdateActivityRequest,
    ) -> AppResult<ActivityDto> {
        let activity = self
            .activity_repo
            .find_by_id(activity_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Activity",
                    &activity_id.to_string(),
                    "activity_service::update_activity",
                )
            })?;

        // ステータス遷移の検証
        if let Some(new_status) = request.status {
            let current = activity.status();
            if !current.can_transition_to(new_status) {
                return Err(validation_error(
                    "status",
                    &format!(
                        "Cannot change status from {} to {} manually",
                        current.as_str(),
                        new_status.as_str()
                    ),
                ));
            }
        }

        // 更新後の日付の並びを検証
        let effective_start = request.start_date.unwrap_or(activity.start_date);
        let effective_end = request.end_date.unwrap_or(activity.end_date);
        Self::validate_dates(effective_start, effective_end)?;

        // 担当者変更時は計画のレベル所属を再検証
        if let Some(responsible_id) = request.responsible_id {
            let plan = self
                .plan_repo
                .find_by_id(activity.plan_id)
                .await?
                .ok_or_else(|| {
                    not_found_error(
                        "Annual plan",
                        &activity.plan_id.to_string(),
                        "activity_service::update_activity",
                    )
                })?;

            let responsible = self
                .user_repo
                .find_by_id(responsible_id)
                .await?
                .ok_or_else(|| {
                    validation_error("responsible_id", "Responsible user does not exist")
                })?;

            if responsible.organization_level_id != Some(plan.organization_level_id) {
                return Err(validation_error(
                    "responsible_id",
                    "Responsible user must belong to the plan's organization level",
                ));
            }
        }

        let updated = self
            .activity_repo
            .update(
                activity_id,
                UpdateActivity {
                    name: request.name,
                    description: request.description,
                    responsible_id: request.responsible_id,
                    start_date: request.start_date,
                    end_date: request.end_date,
                    status: request.status.map(|s| s.as_str().to_string()),
                    progress: request.progress,
                },
            )
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Activity",
                    &activity_id.to_string(),
                    "activity_service::update_activity",
                )
            })?;

        info!(activity_id = %activity_id, "Activity updated successfully");

        self.enrich_one(updated).await
    }

    /// 活動を取得
    pub async fn get_activity(&self, activity_id: Uuid) -> AppResult<ActivityDto> {
        let activity = self
            .activity_repo
            .find_by_id(activity_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Activity",
                    &activity_id.to_string(),
                    "activity_service::get_activity",
                )
            })?;

        self.enrich_one(activity).await
    }

    /// 計画に属する活動一覧を取得
    pub async fn list_by_plan(&self, plan_id: Uuid) -> AppResult<Vec<ActivityDto>> {
        self.plan_repo
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Annual plan",
                    &plan_id.to_string(),
                    "activity_service::list_by_plan",
                )
            })?;

        let activities = self.activity_repo.find_by_plan(plan_id).await?;
        self.enrich_activities(activities).await
    }

    /// 活動の承認レコード一覧を承認順で取得
    pub async fn list_approvals(&self, activity_id: Uuid) -> AppResult<Vec<ApprovalDto>> {
        self.activity_repo
            .find_by_id(activity_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Activity",
                    &activity_id.to_string(),
                    "activity_service::list_approvals",
                )
            })?;

        let approvals = self.approval_repo.find_by_activity(activity_id).await?;

        // 承認者名を一括で補完
        let approver_ids: Vec<Uuid> = approvals.iter().map(|a| a.approver_id).collect();
        let approvers = self.user_repo.find_by_ids(&approver_ids).await?;
        let names: HashMap<Uuid, String> = approvers
            .into_iter()
            .map(|u| (u.id, u.full_name()))
            .collect();

        Ok(approvals
            .into_iter()
            .map(|approval| {
                let name = names.get(&approval.approver_id).cloned();
                let mut dto = ApprovalDto::from(approval);
                dto.approver_name = name;
                dto
            })
            .collect())
    }

    async fn enrich_one(&self, activity: activity_model::Model) -> AppResult<ActivityDto> {
        let name = self
            .user_repo
            .find_by_id(activity.responsible_id)
            .await?
            .map(|u| u.full_name());
        let mut dto = ActivityDto::from(activity);
        dto.responsible_name = name;
        Ok(dto)
    }

    /// 担当者名を一括で補完する
    async fn enrich_activities(
        &self,
        activities: Vec<activity_model::Model>,
    ) -> AppResult<Vec<ActivityDto>> {
        let responsible_ids: Vec<Uuid> = activities.iter().map(|a| a.responsible_id).collect();
        let users = self.user_repo.find_by_ids(&responsible_ids).await?;
        let names: HashMap<Uuid, String> =
            users.into_iter().map(|u| (u.id, u.full_name())).collect();

        Ok(activities
            .into_iter()
            .map(|activity| {
                let name = names.get(&activity.responsible_id).cloned();
                let mut dto = ActivityDto::from(activity);
                dto.responsible_name = name;
                dto
            })
            .collect())
    }

    fn validate_dates(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<()> {
        if end_date < start_date {
            return Err(validation_error(
                "end_date",
                "End date must not be before start date",
            ));
        }
        Ok(())
    }
}
