// plan-backend/src/api/dto/organization_dto.rs

use crate::domain::level_type::LevelType;
use crate::domain::organization_level_model;
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// 組織レベル作成リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrganizationLevelRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom(function = common::validate_not_empty_or_whitespace)
    )]
    pub name: String,

    pub level_type: LevelType,

    pub parent_id: Option<Uuid>,

    pub director_id: Uuid,
}

/// 組織レベル更新リクエスト
///
/// 種別と親は作成後に変更できない。名称とディレクターのみ差し替え可能。
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOrganizationLevelRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom(function = common::validate_not_empty_or_whitespace)
    )]
    pub name: Option<String>,

    pub director_id: Option<Uuid>,
}

// --- レスポンスDTO ---

/// 組織レベル情報レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationLevelDto {
    pub id: Uuid,
    pub name: String,
    pub level_type: String,
    pub parent_id: Option<Uuid>,
    pub director_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<organization_level_model::Model> for OrganizationLevelDto {
    fn from(level: organization_level_model::Model) -> Self {
        Self {
            id: level.id,
            name: level.name,
            level_type: level.level_type,
            parent_id: level.parent_id,
            director_id: level.director_id,
            created_at: level.created_at,
            updated_at: level.updated_at,
        }
    }
}

/// 組織ツリーの1ノード（子レベルを再帰的に含む）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationTreeNodeDto {
    pub id: Uuid,
    pub name: String,
    pub level_type: String,
    pub director_id: Uuid,
    pub director_name: Option<String>,
    pub children: Vec<OrganizationTreeNodeDto>,
}
