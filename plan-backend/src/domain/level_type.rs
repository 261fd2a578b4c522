// plan-backend/src/domain/level_type.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 組織レベルの種別を表すenum
///
/// Central を頂点に、Regional と BaseUnit がどちらも
/// Central 直下にぶら下がる2層構造。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelType {
    Central,
    Regional,
    BaseUnit,
}

impl LevelType {
    /// 文字列からLevelTypeに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "central" => Some(Self::Central),
            "regional" => Some(Self::Regional),
            "base_unit" => Some(Self::BaseUnit),
            _ => None,
        }
    }

    /// LevelTypeを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Central => "central",
            Self::Regional => "regional",
            Self::BaseUnit => "base_unit",
        }
    }

    /// すべての有効なレベル種別を取得
    pub fn all() -> Vec<Self> {
        vec![Self::Central, Self::Regional, Self::BaseUnit]
    }

    /// 親レベルが必須かチェック（Central のみルートになれる）
    pub fn requires_parent(&self) -> bool {
        !matches!(self, Self::Central)
    }

    /// 許可される親レベルの種別を取得
    ///
    /// Regional も BaseUnit も Central の直下に置く。
    pub fn allowed_parent_type(&self) -> Option<Self> {
        match self {
            Self::Central => None,
            Self::Regional | Self::BaseUnit => Some(Self::Central),
        }
    }

    /// レベル種別の表示名を取得
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Central => "Central",
            Self::Regional => "Regional",
            Self::BaseUnit => "Base Unit",
        }
    }
}

impl fmt::Display for LevelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LevelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid level type: '{}'. Valid types are: {}",
                s,
                Self::all()
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

// データベースとの変換用
impl From<LevelType> for String {
    fn from(level_type: LevelType) -> Self {
        level_type.as_str().to_string()
    }
}

impl TryFrom<String> for LevelType {
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
        assert_eq!(LevelType::from_str("central"), Some(LevelType::Central));
        assert_eq!(LevelType::from_str("Regional"), Some(LevelType::Regional));
        assert_eq!(LevelType::from_str("BASE_UNIT"), Some(LevelType::BaseUnit));
        assert_eq!(LevelType::from_str("department"), None);
    }

    #[test]
    fn test_parent_rules() {
        assert!(!LevelType::Central.requires_parent());
        assert!(LevelType::Regional.requires_parent());
        assert!(LevelType::BaseUnit.requires_parent());

        assert_eq!(LevelType::Central.allowed_parent_type(), None);
        assert_eq!(
            LevelType::Regional.allowed_parent_type(),
            Some(LevelType::Central)
        );
        assert_eq!(
            LevelType::BaseUnit.allowed_parent_type(),
            Some(LevelType::Central)
        );
    }

    #[test]
    fn test_to_string() {
        assert_eq!(LevelType::Central.to_string(), "central");
        assert_eq!(LevelType::Regional.to_string(), "regional");
        assert_eq!(LevelType::BaseUnit.to_string(), "base_unit");
    }

    #[test]
    fn test_serde() {
        let level_type = LevelType::BaseUnit;
        let serialized = serde_json::to_string(&level_type).unwrap();
        assert_eq!(serialized, r#""base_unit""#);

        let deserialized: LevelType = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, LevelType::BaseUnit);
    }
}
