// plan-backend/src/api/dto/activity_dto.rs

use crate::domain::activity_model;
use crate::domain::activity_status::ActivityStatus;
use crate::utils::validation::common;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// 活動作成リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateActivityRequest {
    #[validate(
        length(
            min = common::activity::NAME_MIN_LENGTH,
            max = common::activity::NAME_MAX_LENGTH,
            message = "Activity name must be between 1 and 200 characters"
        ),
        custom(function = common::validate_activity_name)
    )]
    pub name: String,

    #[validate(length(
        max = common::activity::DESCRIPTION_MAX_LENGTH,
        message = "Description must be at most 2000 characters"
    ))]
    pub description: Option<String>,

    pub responsible_id: Uuid,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,
}

/// 活動更新リクエスト
///
/// Some のフィールドだけ更新する。承認済み・却下済みへの手動遷移は
/// サービス層で拒否される。
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateActivityRequest {
    #[validate(
        length(
            min = common::activity::NAME_MIN_LENGTH,
            max = common::activity::NAME_MAX_LENGTH,
            message = "Activity name must be between 1 and 200 characters"
        ),
        custom(function = common::validate_activity_name)
    )]
    pub name: Option<String>,

    #[validate(length(
        max = common::activity::DESCRIPTION_MAX_LENGTH,
        message = "Description must be at most 2000 characters"
    ))]
    pub description: Option<String>,

    pub responsible_id: Option<Uuid>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    pub status: Option<ActivityStatus>,

    #[validate(range(
        min = common::activity::PROGRESS_MIN,
        max = common::activity::PROGRESS_MAX,
        message = "Progress must be between 0 and 100"
    ))]
    pub progress: Option<i32>,
}

// --- レスポンスDTO ---

/// 活動情報レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDto {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub name: String,
    pub description: String,
    pub responsible_id: Uuid,
    pub responsible_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<activity_model::Model> for ActivityDto {
    fn from(activity: activity_model::Model) -> Self {
        Self {
            id: activity.id,
            plan_id: activity.plan_id,
            name: activity.name,
            description: activity.description,
            responsible_id: activity.responsible_id,
            // 担当者名はサービス層がユーザー一括取得で補完する
            responsible_name: None,
            start_date: activity.start_date,
            end_date: activity.end_date,
            status: activity.status,
            progress: activity.progress,
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }
}
