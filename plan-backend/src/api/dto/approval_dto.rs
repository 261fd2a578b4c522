// plan-backend/src/api/dto/approval_dto.rs

use crate::domain::approval_model;
use crate::utils::validation::common;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// 承認判定の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

impl ApprovalDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// 承認判定リクエスト
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DecideApprovalRequest {
    pub decision: ApprovalDecision,

    #[validate(length(
        max = common::approval::COMMENTS_MAX_LENGTH,
        message = "Comments must be at most 2000 characters"
    ))]
    pub comments: Option<String>,
}

// --- レスポンスDTO ---

/// 承認レコード情報レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalDto {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub approver_id: Uuid,
    pub approver_name: Option<String>,
    pub status: String,
    pub approval_order: i32,
    pub decided_at: Option<DateTime<Utc>>,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

impl From<approval_model::Model> for ApprovalDto {
    fn from(approval: approval_model::Model) -> Self {
        Self {
            id: approval.id,
            activity_id: approval.activity_id,
            approver_id: approval.approver_id,
            // 名前はサービス層がユーザー一括取得で補完する
            approver_name: None,
            status: approval.status,
            approval_order: approval.approval_order,
            decided_at: approval.decided_at,
            comments: approval.comments,
            created_at: approval.created_at,
        }
    }
}

/// 承認待ち一覧の1エントリ（対象活動の概要付き）
///
/// actionable は「自分より前の承認順がすべて確定済みで、
/// いま判定を下せる」ことを表す。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingApprovalDto {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub activity_name: String,
    pub activity_status: String,
    pub activity_end_date: NaiveDate,
    pub approval_order: i32,
    pub actionable: bool,
    pub created_at: DateTime<Utc>,
}

/// 判定結果レスポンス（確定した承認と、状態が動いた場合の活動ステータス）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalDecisionResultDto {
    pub approval: ApprovalDto,
    pub activity_status: String,
    pub activity_finalized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_deserializes_snake_case() {
        let decision: ApprovalDecision = serde_json::from_str(r#""approved""#).unwrap();
        assert!(decision.is_approved());

        let decision: ApprovalDecision = serde_json::from_str(r#""rejected""#).unwrap();
        assert!(!decision.is_approved());

        assert!(serde_json::from_str::<ApprovalDecision>(r#""maybe""#).is_err());
    }

    #[test]
    fn test_decide_request_comment_length() {
        let valid = DecideApprovalRequest {
            decision: ApprovalDecision::Approved,
            comments: Some("Looks good".to_string()),
        };
        assert!(valid.validate().is_ok());

        let too_long = DecideApprovalRequest {
            decision: ApprovalDecision::Rejected,
            comments: Some("x".repeat(2001)),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_approval_dto_from_model() {
        let approval = approval_model::Model {
            id: Uuid::new_v4(),
            activity_id: Uuid::new_v4(),
            approver_id: Uuid::new_v4(),
            status: "pending".to_string(),
            approval_order: 1,
            decided_at: None,
            comments: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let dto = ApprovalDto::from(approval.clone());
        assert_eq!(dto.id, approval.id);
        assert_eq!(dto.status, "pending");
        assert_eq!(dto.decided_at, None);
        assert_eq!(dto.approver_name, None);
    }
}
