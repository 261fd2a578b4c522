// plan-backend/src/utils/validation.rs

//! 共通バリデーション定数とカスタムバリデーション関数
//!
//! DTOファイル間で重複するバリデーションルールを統一管理します。

pub mod common {
    use once_cell::sync::Lazy;
    use regex::Regex;
    use validator::ValidationError;

    // =============================================================================
    // バリデーション定数
    // =============================================================================

    /// ユーザー名の制約
    pub mod username {
        pub const MIN_LENGTH: u64 = 3;
        pub const MAX_LENGTH: u64 = 30;
    }

    /// 必須フィールドの最低長
    pub mod required {
        pub const MIN_LENGTH: u64 = 1;
    }

    /// パスワードの制約
    pub mod password {
        pub const MIN_LENGTH: u64 = 8;
    }

    /// 年度計画の制約
    pub mod plan {
        pub const YEAR_MIN: i32 = 2023;
        pub const YEAR_MAX: i32 = 2030;
    }

    /// アクティビティ関連の制約
    pub mod activity {
        pub const NAME_MIN_LENGTH: u64 = 1;
        pub const NAME_MAX_LENGTH: u64 = 200;
        pub const DESCRIPTION_MAX_LENGTH: u64 = 2000;
        pub const PROGRESS_MIN: i32 = 0;
        pub const PROGRESS_MAX: i32 = 100;
    }

    /// 承認コメント・役割名の制約
    pub mod approval {
        pub const COMMENTS_MAX_LENGTH: u64 = 2000;
        pub const ROLE_NAME_MAX_LENGTH: u64 = 100;
    }

    // =============================================================================
    // バリデーション正規表現
    // =============================================================================

    /// ユーザー名の正規表現パターン
    pub static USERNAME_REGEX: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid username regex"));

    // =============================================================================
    // カスタムバリデーション関数
    // =============================================================================

    /// ユーザー名の形式をバリデーション
    pub fn validate_username(username: &str) -> Result<(), ValidationError> {
        if !USERNAME_REGEX.is_match(username) {
            return Err(ValidationError::new("invalid_username_format"));
        }
        Ok(())
    }

    /// 文字列が空白のみでないかをチェック
    pub fn validate_not_empty_or_whitespace(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            let mut error = ValidationError::new("empty_or_whitespace");
            error.message = Some("Field cannot be empty or contain only whitespace".into());
            return Err(error);
        }
        Ok(())
    }

    /// アクティビティ名のバリデーション
    pub fn validate_activity_name(name: &str) -> Result<(), ValidationError> {
        validate_not_empty_or_whitespace(name)?;

        if name.contains('\0') || name.contains('\r') || name.contains('\n') {
            let mut error = ValidationError::new("invalid_characters");
            error.message =
                Some("Name cannot contain null, carriage return, or newline characters".into());
            return Err(error);
        }

        Ok(())
    }
}
