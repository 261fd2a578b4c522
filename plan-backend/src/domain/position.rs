// plan-backend/src/domain/position.rs

use crate::domain::level_type::LevelType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ユーザーの職位を表すenum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    GeneralDirector,
    RegionalDirector,
    BaseUnitDirector,
    RegionalSpecialist,
    BaseUnitSpecialist,
    SystemAdmin,
}

impl Position {
    /// 文字列からPositionに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general_director" => Some(Self::GeneralDirector),
            "regional_director" => Some(Self::RegionalDirector),
            "base_unit_director" => Some(Self::BaseUnitDirector),
            "regional_specialist" => Some(Self::RegionalSpecialist),
            "base_unit_specialist" => Some(Self::BaseUnitSpecialist),
            "system_admin" => Some(Self::SystemAdmin),
            _ => None,
        }
    }

    /// Positionを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralDirector => "general_director",
            Self::RegionalDirector => "regional_director",
            Self::BaseUnitDirector => "base_unit_director",
            Self::RegionalSpecialist => "regional_specialist",
            Self::BaseUnitSpecialist => "base_unit_specialist",
            Self::SystemAdmin => "system_admin",
        }
    }

    /// すべての有効な職位を取得
    pub fn all() -> Vec<Self> {
        vec![
            Self::GeneralDirector,
            Self::RegionalDirector,
            Self::BaseUnitDirector,
            Self::RegionalSpecialist,
            Self::BaseUnitSpecialist,
            Self::SystemAdmin,
        ]
    }

    /// ディレクター職かチェック
    pub fn is_director(&self) -> bool {
        matches!(
            self,
            Self::GeneralDirector | Self::RegionalDirector | Self::BaseUnitDirector
        )
    }

    /// スペシャリスト職かチェック
    pub fn is_specialist(&self) -> bool {
        matches!(self, Self::RegionalSpecialist | Self::BaseUnitSpecialist)
    }

    /// 直属の上司が必須かチェック
    pub fn requires_boss(&self) -> bool {
        self.is_specialist()
    }

    /// 職位が要求する組織レベル種別を取得
    ///
    /// ディレクター職のみレベル種別と厳密に紐づく。
    /// スペシャリストと SystemAdmin には制約がない。
    pub fn required_level_type(&self) -> Option<LevelType> {
        match self {
            Self::GeneralDirector => Some(LevelType::Central),
            Self::RegionalDirector => Some(LevelType::Regional),
            Self::BaseUnitDirector => Some(LevelType::BaseUnit),
            Self::RegionalSpecialist | Self::BaseUnitSpecialist | Self::SystemAdmin => None,
        }
    }

    /// 指定レベル種別のディレクターに要求される職位を取得
    pub fn director_for(level_type: LevelType) -> Self {
        match level_type {
            LevelType::Central => Self::GeneralDirector,
            LevelType::Regional => Self::RegionalDirector,
            LevelType::BaseUnit => Self::BaseUnitDirector,
        }
    }

    /// 職位の表示名を取得
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::GeneralDirector => "General Director",
            Self::RegionalDirector => "Regional Director",
            Self::BaseUnitDirector => "Base Unit Director",
            Self::RegionalSpecialist => "Regional Specialist",
            Self::BaseUnitSpecialist => "Base Unit Specialist",
            Self::SystemAdmin => "System Administrator",
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::RegionalSpecialist
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid position: '{}'. Valid positions are: {}",
                s,
                Self::all()
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

// データベースとの変換用
impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.as_str().to_string()
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
