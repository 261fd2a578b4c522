// plan-backend/src/api/dto/approval_flow_dto.rs

use crate::domain::approval_flow_model;
use crate::domain::approver_role_model;
use crate::domain::workflow_module::WorkflowModule;
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// 承認フロー作成リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateApprovalFlowRequest {
    pub module: WorkflowModule,
}

/// 承認者ロール追加リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddApproverRoleRequest {
    pub user_id: Uuid,

    #[validate(
        length(
            min = common::required::MIN_LENGTH,
            max = common::approval::ROLE_NAME_MAX_LENGTH,
            message = "Role name must be between 1 and 100 characters"
        ),
        custom(function = common::validate_not_empty_or_whitespace)
    )]
    pub role_name: String,

    #[validate(range(min = 1, message = "Approval order must be at least 1"))]
    pub approval_order: i32,
}

// --- レスポンスDTO ---

/// 承認者ロール情報レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproverRoleDto {
    pub id: Uuid,
    pub flow_id: Uuid,
    pub user_id: Uuid,
    pub approver_name: Option<String>,
    pub role_name: String,
    pub approval_order: i32,
}

impl From<approver_role_model::Model> for ApproverRoleDto {
    fn from(role: approver_role_model::Model) -> Self {
        Self {
            id: role.id,
            flow_id: role.flow_id,
            user_id: role.user_id,
            // 名前はサービス層がユーザー一括取得で補完する
            approver_name: None,
            role_name: role.role_name,
            approval_order: role.approval_order,
        }
    }
}

/// 承認フロー情報レスポンス（承認者ロールを順序どおりに含む）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalFlowDto {
    pub id: Uuid,
    pub module: String,
    pub roles: Vec<ApproverRoleDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApprovalFlowDto {
    pub fn new(flow: approval_flow_model::Model, roles: Vec<ApproverRoleDto>) -> Self {
        Self {
            id: flow.id,
            module: flow.module,
            roles,
            created_at: flow.created_at,
            updated_at: flow.updated_at,
        }
    }
}
