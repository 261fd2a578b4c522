// plan-backend/src/api/dto/user_dto.rs

use crate::api::dto::PaginatedResponse;
use crate::domain::position::Position;
use crate::domain::user_model;
use crate::domain::user_profile_model;
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// ユーザー作成リクエスト（管理者用）
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(
            min = common::username::MIN_LENGTH,
            max = common::username::MAX_LENGTH,
            message = "Username must be between 3 and 30 characters"
        ),
        custom(function = common::validate_username)
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = common::password::MIN_LENGTH, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(custom(function = common::validate_not_empty_or_whitespace))]
    pub first_name: String,

    #[validate(custom(function = common::validate_not_empty_or_whitespace))]
    pub last_name: String,

    pub position: Position,

    pub organization_level_id: Option<Uuid>,

    pub boss_id: Option<Uuid>,

    pub is_admin: Option<bool>,
}

/// ユーザー更新リクエスト（管理者用）
///
/// Some のフィールドだけ更新する。None は「変更なし」。
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = common::password::MIN_LENGTH, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    #[validate(custom(function = common::validate_not_empty_or_whitespace))]
    pub first_name: Option<String>,

    #[validate(custom(function = common::validate_not_empty_or_whitespace))]
    pub last_name: Option<String>,

    pub position: Option<Position>,

    pub organization_level_id: Option<Uuid>,

    pub boss_id: Option<Uuid>,

    pub is_admin: Option<bool>,

    pub is_active: Option<bool>,
}

/// プロフィール更新リクエスト（本人用）
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 500, message = "Address must be at most 500 characters"))]
    pub address: Option<String>,

    pub profile_picture_key: Option<String>,

    pub signature_key: Option<String>,
}

// --- レスポンスDTO ---

/// ユーザー情報レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub position: String,
    pub organization_level_id: Option<Uuid>,
    pub boss_id: Option<Uuid>,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user_model::Model> for UserDto {
    fn from(user: user_model::Model) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name,
            position: user.position,
            organization_level_id: user.organization_level_id,
            boss_id: user.boss_id,
            is_admin: user.is_admin,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// プロフィール情報レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDto {
    pub user_id: Uuid,
    pub phone: String,
    pub address: String,
    pub profile_picture_key: Option<String>,
    pub signature_key: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<user_profile_model::Model> for ProfileDto {
    fn from(profile: user_profile_model::Model) -> Self {
        Self {
            user_id: profile.user_id,
            phone: profile.phone,
            address: profile.address,
            profile_picture_key: profile.profile_picture_key,
            signature_key: profile.signature_key,
            updated_at: profile.updated_at,
        }
    }
}

/// 職員名簿の1エントリ（ユーザー情報 + 連絡先）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDirectoryEntryDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub position: String,
    pub organization_level_id: Option<Uuid>,
    pub phone: String,
    pub address: String,
}

impl From<(user_model::Model, Option<user_profile_model::Model>)> for UserDirectoryEntryDto {
    fn from((user, profile): (user_model::Model, Option<user_profile_model::Model>)) -> Self {
        let full_name = user.full_name();
        let (phone, address) = profile
            .map(|p| (p.phone, p.address))
            .unwrap_or_default();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name,
            position: user.position,
            organization_level_id: user.organization_level_id,
            phone,
            address,
        }
    }
}

/// ページネーション付きユーザー一覧
pub type PaginatedUsersDto = PaginatedResponse<UserDto>;

/// ページネーション付き職員名簿
pub type PaginatedDirectoryDto = PaginatedResponse<UserDirectoryEntryDto>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> user_model::Model {
        user_model::Model {
            id: Uuid::new_v4(),
            username: "tyamada".to_string(),
            email: "tyamada@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Taro".to_string(),
            last_name: "Yamada".to_string(),
            position: "base_unit_specialist".to_string(),
            organization_level_id: Some(Uuid::new_v4()),
            boss_id: Some(Uuid::new_v4()),
            is_admin: false,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_dto_from_model() {
        let user = sample_user();
        let user_id = user.id;
        let dto = UserDto::from(user);
        assert_eq!(dto.id, user_id);
        assert_eq!(dto.full_name, "Taro Yamada");
        assert_eq!(dto.position, "base_unit_specialist");
    }

    #[test]
    fn test_create_user_request_validation() {
        let valid = CreateUserRequest {
            username: "tyamada".to_string(),
            email: "tyamada@example.com".to_string(),
            password: "MyUniqueP@ssw0rd91".to_string(),
            first_name: "Taro".to_string(),
            last_name: "Yamada".to_string(),
            position: Position::BaseUnitSpecialist,
            organization_level_id: None,
            boss_id: None,
            is_admin: None,
        };
        assert!(valid.validate().is_ok());

        let bad_email = CreateUserRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = CreateUserRequest {
            password: "short".to_string(),
            ..valid.clone()
        };
        assert!(short_password.validate().is_err());

        let blank_name = CreateUserRequest {
            first_name: "   ".to_string(),
            ..valid
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_update_user_request_allows_partial() {
        let partial = UpdateUserRequest {
            email: None,
            password: None,
            first_name: Some("Jiro".to_string()),
            last_name: None,
            position: None,
            organization_level_id: None,
            boss_id: None,
            is_admin: None,
            is_active: None,
        };
        assert!(partial.validate().is_ok());
    }

    #[test]
    fn test_directory_entry_without_profile() {
        let user = sample_user();
        let entry = UserDirectoryEntryDto::from((user, None));
        assert_eq!(entry.phone, "");
        assert_eq!(entry.address, "");
    }
}
