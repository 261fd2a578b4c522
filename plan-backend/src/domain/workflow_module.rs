// plan-backend/src/domain/workflow_module.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 承認フローを構成できる業務モジュールを表すenum
///
/// 現時点で承認エンジンが動くのは AnnualPlan のみ。
/// 他のモジュールはフロー定義だけ先行して登録できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowModule {
    AnnualPlan,
    MonthlyPlan,
    IndividualPlan,
    Risks,
    NonConformity,
}

impl WorkflowModule {
    /// 文字列からWorkflowModuleに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "annual_plan" => Some(Self::AnnualPlan),
            "monthly_plan" => Some(Self::MonthlyPlan),
            "individual_plan" => Some(Self::IndividualPlan),
            "risks" => Some(Self::Risks),
            "non_conformity" => Some(Self::NonConformity),
            _ => None,
        }
    }

    /// WorkflowModuleを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnnualPlan => "annual_plan",
            Self::MonthlyPlan => "monthly_plan",
            Self::IndividualPlan => "individual_plan",
            Self::Risks => "risks",
            Self::NonConformity => "non_conformity",
        }
    }

    /// すべての有効なモジュールを取得
    pub fn all() -> Vec<Self> {
        vec![
            Self::AnnualPlan,
            Self::MonthlyPlan,
            Self::IndividualPlan,
            Self::Risks,
            Self::NonConformity,
        ]
    }

    /// モジュールの表示名を取得
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AnnualPlan => "Annual Plan",
            Self::MonthlyPlan => "Monthly Plan",
            Self::IndividualPlan => "Individual Plan",
            Self::Risks => "Risks",
            Self::NonConformity => "Non-Conformity",
        }
    }
}

impl fmt::Display for WorkflowModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WorkflowModule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid workflow module: '{}'. Valid modules are: {}",
                s,
                Self::all()
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

// データベースとの変換用
impl From<WorkflowModule> for String {
    fn from(module: WorkflowModule) -> Self {
        module.as_str().to_string()
    }
}

impl TryFrom<String> for WorkflowModule {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
