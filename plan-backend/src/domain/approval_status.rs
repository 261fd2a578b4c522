// plan-backend/src/domain/approval_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 個々の承認レコードの状態を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// 文字列からApprovalStatusに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// ApprovalStatusを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// すべての有効なステータスを取得
    pub fn all() -> Vec<Self> {
        vec![Self::Pending, Self::Approved, Self::Rejected]
    }

    /// 未判定かチェック
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// 判定済み（変更不可）かチェック
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// ステータスの表示名を取得
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl Default for ApprovalStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid approval status: '{}'. Valid statuses are: {}",
                s,
                Self::all()
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

// データベースとの変換用
impl From<ApprovalStatus> for String {
    fn from(status: ApprovalStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<String> for ApprovalStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            ApprovalStatus::from_str("pending"),
            Some(ApprovalStatus::Pending)
        );
        assert_eq!(
            ApprovalStatus::from_str("APPROVED"),
            Some(ApprovalStatus::Approved)
        );
        assert_eq!(
            ApprovalStatus::from_str("rejected"),
            Some(ApprovalStatus::Rejected)
        );
        assert_eq!(ApprovalStatus::from_str("unknown"), None);
    }

    #[test]
    fn test_status_checks() {
        assert!(ApprovalStatus::Pending.is_pending());
        assert!(!ApprovalStatus::Approved.is_pending());

        assert!(ApprovalStatus::Approved.is_terminal());
        assert!(ApprovalStatus::Rejected.is_terminal());
        assert!(!ApprovalStatus::Pending.is_terminal());
    }

    #[test]
    fn test_default() {
        assert_eq!(ApprovalStatus::default(), ApprovalStatus::Pending);
    }

    #[test]
    fn test_serde() {
        let status = ApprovalStatus::Approved;
        let serialized = serde_json::to_string(&status).unwrap();
        assert_eq!(serialized, r#""approved""#);

        let deserialized: ApprovalStatus = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, ApprovalStatus::Approved);
    }
}
