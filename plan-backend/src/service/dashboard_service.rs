// plan-backend/src/service/dashboard_service.rs

use crate::api::dto::dashboard_dto::{
    ActivityStatusCountsDto, DashboardSummaryDto, LevelProgressDto,
};
use crate::db::DbPool;
use crate::domain::activity_status::ActivityStatus;
use crate::error::AppResult;
use crate::repository::activity_repository::ActivityRepository;
use crate::repository::annual_plan_repository::AnnualPlanRepository;
use crate::repository::organization_level_repository::OrganizationLevelRepository;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// ダッシュボードサービス
pub struct DashboardService {
    plan_repo: Arc<AnnualPlanRepository>,
    activity_repo: Arc<ActivityRepository>,
    level_repo: Arc<OrganizationLevelRepository>,
}

impl DashboardService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            plan_repo: Arc::new(AnnualPlanRepository::new(db_pool.clone())),
            activity_repo: Arc::new(ActivityRepository::new(db_pool.clone())),
            level_repo: Arc::new(OrganizationLevelRepository::new(db_pool)),
        }
    }

    /// 全体サマリを集計
    pub async fn get_summary(&self) -> AppResult<DashboardSummaryDto> {
        let total_plans = self.plan_repo.count().await?;
        let approved_plans = self.plan_repo.count_approved().await?;
        let total_activities = self.activity_repo.count().await?;

        let activities_by_status = ActivityStatusCountsDto {
            pending: self
                .activity_repo
                .count_by_status(ActivityStatus::Pending.as_str())
                .await?,
            in_progress: self
                .activity_repo
                .count_by_status(ActivityStatus::InProgress.as_str())
                .await?,
            completed: self
                .activity_repo
                .count_by_status(ActivityStatus::Completed.as_str())
                .await?,
            approved: self
                .activity_repo
                .count_by_status(ActivityStatus::Approved.as_str())
                .await?,
            rejected: self
                .activity_repo
                .count_by_status(ActivityStatus::Rejected.as_str())
                .await?,
        };

        let average_progress_by_level = self.average_progress_by_level().await?;

        Ok(DashboardSummaryDto {
            total_plans,
            approved_plans,
            total_activities,
            activities_by_status,
            average_progress_by_level,
        })
    }

    /// 組織レベル別の平均進捗を集計
    ///
    /// 活動は計画経由でレベルに紐づく。活動のないレベルも件数0で返す。
    async fn average_progress_by_level(&self) -> AppResult<Vec<LevelProgressDto>> {
        let mut totals: HashMap<Uuid, (u64, i64)> = HashMap::new();
        for (activity, plan) in self.activity_repo.find_all_with_plans().await? {
            let Some(plan) = plan else {
                continue;
            };
            let entry = totals.entry(plan.organization_level_id).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += i64::from(activity.progress);
        }

        let mut items: Vec<LevelProgressDto> = self
            .level_repo
            .find_all()
            .await?
            .into_iter()
            .map(|level| {
                let (count, sum) = totals.get(&level.id).copied().unwrap_or((0, 0));
                let average = if count == 0 {
                    0.0
                } else {
                    sum as f64 / count as f64
                };
                LevelProgressDto {
                    organization_level_id: level.id,
                    level_name: level.name,
                    activity_count: count,
                    average_progress: average,
                }
            })
            .collect();

        items.sort_by(|a, b| a.level_name.cmp(&b.level_name));
        Ok(items)
    }
}
