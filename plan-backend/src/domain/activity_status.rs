// plan-backend/src/domain/activity_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// アクティビティの状態を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Pending,
    InProgress,
    Completed,
    Approved,
    Rejected,
}

impl ActivityStatus {
    /// 文字列からActivityStatusに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// ActivityStatusを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// すべての有効なステータスを取得
    pub fn all() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::InProgress,
            Self::Completed,
            Self::Approved,
            Self::Rejected,
        ]
    }

    /// 承認フローによって確定した終端状態かチェック
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// 承認フロー専用の状態かチェック（手動更新は不可）
    pub fn is_workflow_controlled(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// ステータスがアクティブ状態かチェック（未完了）
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    /// 有効な手動ステータス遷移かチェック
    ///
    /// Approved / Rejected への遷移と、そこからの離脱は
    /// 承認フロー側でのみ行われる。
    pub fn can_transition_to(&self, new_status: Self) -> bool {
        match (self, new_status) {
            // 同じステータスは常に有効
            (current, new) if current == &new => true,

            // 終端状態からの手動離脱は不可
            (Self::Approved | Self::Rejected, _) => false,

            // 終端状態への手動遷移は不可
            (_, Self::Approved | Self::Rejected) => false,

            // Pending / InProgress / Completed 間は自由に行き来できる
            _ => true,
        }
    }

    /// ステータスの表示名を取得
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl Default for ActivityStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid activity status: '{}'. Valid statuses are: {}",
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
impl From<ActivityStatus> for String {
    fn from(status: ActivityStatus) -> Self {
        status.as_str().to_string()
    }
}

impl TryFrom<String> for ActivityStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for ActivityStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            ActivityStatus::from_str("pending"),
            Some(ActivityStatus::Pending)
        );
        assert_eq!(
            ActivityStatus::from_str("PENDING"),
            Some(ActivityStatus::Pending)
        );
        assert_eq!(
            ActivityStatus::from_str("in_progress"),
            Some(ActivityStatus::InProgress)
        );
        assert_eq!(
            ActivityStatus::from_str("completed"),
            Some(ActivityStatus::Completed)
        );
        assert_eq!(
            ActivityStatus::from_str("approved"),
            Some(ActivityStatus::Approved)
        );
        assert_eq!(
            ActivityStatus::from_str("rejected"),
            Some(ActivityStatus::Rejected)
        );
        assert_eq!(ActivityStatus::from_str("invalid"), None);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(ActivityStatus::Pending.to_string(), "pending");
        assert_eq!(ActivityStatus::InProgress.to_string(), "in_progress");
        assert_eq!(ActivityStatus::Completed.to_string(), "completed");
        assert_eq!(ActivityStatus::Approved.to_string(), "approved");
        assert_eq!(ActivityStatus::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_status_checks() {
        assert!(ActivityStatus::Approved.is_terminal());
        assert!(ActivityStatus::Rejected.is_terminal());
        assert!(!ActivityStatus::Pending.is_terminal());
        assert!(!ActivityStatus::Completed.is_terminal());

        assert!(ActivityStatus::Pending.is_active());
        assert!(ActivityStatus::InProgress.is_active());
        assert!(!ActivityStatus::Approved.is_active());
    }

    #[test]
    fn test_manual_transitions() {
        // 同じステータスは常に有効
        assert!(ActivityStatus::Pending.can_transition_to(ActivityStatus::Pending));

        // 通常状態間は自由
        assert!(ActivityStatus::Pending.can_transition_to(ActivityStatus::InProgress));
        assert!(ActivityStatus::InProgress.can_transition_to(ActivityStatus::Completed));
        assert!(ActivityStatus::Completed.can_transition_to(ActivityStatus::InProgress));

        // 終端状態への手動遷移は不可
        assert!(!ActivityStatus::Pending.can_transition_to(ActivityStatus::Approved));
        assert!(!ActivityStatus::Completed.can_transition_to(ActivityStatus::Rejected));

        // 終端状態からの手動離脱も不可
        assert!(!ActivityStatus::Approved.can_transition_to(ActivityStatus::Pending));
        assert!(!ActivityStatus::Rejected.can_transition_to(ActivityStatus::InProgress));
    }

    #[test]
    fn test_default() {
        assert_eq!(ActivityStatus::default(), ActivityStatus::Pending);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "pending".parse::<ActivityStatus>().unwrap(),
            ActivityStatus::Pending
        );
        assert!("invalid".parse::<ActivityStatus>().is_err());
    }

    #[test]
    fn test_serde() {
        let status = ActivityStatus::InProgress;
        let serialized = serde_json::to_string(&status).unwrap();
        assert_eq!(serialized, r#""in_progress""#);

        let deserialized: ActivityStatus = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, ActivityStatus::InProgress);
    }
}
