// plan-backend/src/api/dto/dashboard_dto.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- レスポンスDTO ---

/// 活動ステータス別の件数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityStatusCountsDto {
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub approved: u64,
    pub rejected: u64,
}

/// 組織レベル別の平均進捗
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelProgressDto {
    pub organization_level_id: Uuid,
    pub level_name: String,
    pub activity_count: u64,
    pub average_progress: f64,
}

/// ダッシュボード集計レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummaryDto {
    pub total_plans: u64,
    pub approved_plans: u64,
    pub total_activities: u64,
    pub activities_by_status: ActivityStatusCountsDto,
    pub average_progress_by_level: Vec<LevelProgressDto>,
}
