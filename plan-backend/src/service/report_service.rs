// plan-backend/src/service/report_service.rs

use crate::db::DbPool;
use crate::error::AppResult;
use crate::repository::activity_repository::ActivityRepository;
use crate::repository::annual_plan_repository::AnnualPlanRepository;
use crate::repository::organization_level_repository::OrganizationLevelRepository;
use crate::repository::user_repository::UserRepository;
use crate::utils::error_helper::{internal_server_error, not_found_error};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 生成済みレポート（ダウンロード用のファイル名と本文）
#[derive(Debug, Clone)]
pub struct PlanReport {
    pub filename: String,
    pub content: Vec<u8>,
}

/// レポートサービス
///
/// 年間計画の活動一覧をCSVに書き出す。先頭に計画のメタ情報行、
/// 空行を挟んでヘッダ行、以降は活動1件につき1行。
pub struct ReportService {
    plan_repo: Arc<AnnualPlanRepository>,
    activity_repo: Arc<ActivityRepository>,
    level_repo: Arc<OrganizationLevelRepository>,
    user_repo: Arc<UserRepository>,
}

impl ReportService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            plan_repo: Arc::new(AnnualPlanRepository::new(db_pool.clone())),
            activity_repo: Arc::new(ActivityRepository::new(db_pool.clone())),
            level_repo: Arc::new(OrganizationLevelRepository::new(db_pool.clone())),
            user_repo: Arc::new(UserRepository::new(db_pool)),
        }
    }

    /// 計画の活動レポートをCSVで生成
    pub async fn generate_plan_report(&self, plan_id: Uuid) -> AppResult<PlanReport> {
        let plan = self
            .plan_repo
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Annual plan",
                    &plan_id.to_string(),
                    "report_service::generate_plan_report",
                )
            })?;

        let level_name = self
            .level_repo
            .find_by_id(plan.organization_level_id)
            .await?
            .map(|level| level.name)
            .unwrap_or_default();

        let activities = self.activity_repo.find_by_plan(plan_id).await?;

        // 担当者名を一括で解決
        let responsible_ids: Vec<Uuid> = activities.iter().map(|a| a.responsible_id).collect();
        let users = self.user_repo.find_by_ids(&responsible_ids).await?;
        let names: HashMap<Uuid, String> =
            users.into_iter().map(|u| (u.id, u.full_name())).collect();

        // メタ情報行とヘッダ行で列数が異なるのでflexibleで書く
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        let context = "report_service::generate_plan_report";
        let year = plan.year.to_string();
        writer
            .write_record(["Annual Plan", year.as_str(), level_name.as_str()])
            .map_err(|e| internal_server_error(e, context, "Failed to generate report"))?;
        writer
            .write_record([""])
            .map_err(|e| internal_server_error(e, context, "Failed to generate report"))?;
        writer
            .write_record(["Activity", "Responsible", "Status", "Progress"])
            .map_err(|e| internal_server_error(e, context, "Failed to generate report"))?;

        for activity in &activities {
            let responsible = names
                .get(&activity.responsible_id)
                .cloned()
                .unwrap_or_default();
            let progress = format!("{}%", activity.progress);
            writer
                .write_record([
                    activity.name.as_str(),
                    responsible.as_str(),
                    activity.status().display_name(),
                    progress.as_str(),
                ])
                .map_err(|e| internal_server_error(e, context, "Failed to generate report"))?;
        }

        let content = writer
            .into_inner()
            .map_err(|e| internal_server_error(e, context, "Failed to generate report"))?;

        info!(
            plan_id = %plan_id,
            activity_count = activities.len(),
            "Plan report generated"
        );

        Ok(PlanReport {
            filename: format!("plan_{}.csv", plan_id),
            content,
        })
    }
}
