// plan-backend/src/service/user_service.rs

use crate::api::dto::common::{PaginatedResponse, PaginationQuery};
use crate::api::dto::user_dto::{
    CreateUserRequest, PaginatedDirectoryDto, PaginatedUsersDto, ProfileDto, UpdateProfileRequest,
    UpdateUserRequest, UserDto,
};
use crate::db::DbPool;
use crate::domain::position::Position;
use crate::error::{AppError, AppResult};
use crate::repository::organization_level_repository::OrganizationLevelRepository;
use crate::repository::user_profile_repository::{UpdateProfile, UserProfileRepository};
use crate::repository::user_repository::{CreateUser, UpdateUser, UserRepository};
use crate::utils::error_helper::{conflict_error, not_found_error, validation_error};
use crate::utils::password::PasswordManager;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// ユーザー管理サービス
pub struct UserService {
    user_repo: Arc<UserRepository>,
    profile_repo: Arc<UserProfileRepository>,
    level_repo: Arc<OrganizationLevelRepository>,
    password_manager: Arc<PasswordManager>,
}

impl UserService {
    pub fn new(db_pool: DbPool, password_manager: Arc<PasswordManager>) -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new(db_pool.clone())),
            profile_repo: Arc::new(UserProfileRepository::new(db_pool.clone())),
            level_repo: Arc::new(OrganizationLevelRepository::new(db_pool)),
            password_manager,
        }
    }

    // --- 管理者用CRUD ---

    /// ユーザー一覧をページネーション付きで取得
    pub async fn list_users(&self, query: &PaginationQuery) -> AppResult<PaginatedUsersDto> {
        let (page, per_page) = query.get_pagination();
        let (users, total_count) = self.user_repo.find_all_paginated(page, per_page).await?;

        Ok(PaginatedResponse::new(
            users.into_iter().map(UserDto::from).collect(),
            page,
            per_page,
            total_count,
        ))
    }

    /// ユーザー情報を取得
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<UserDto> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                not_found_error("User", &user_id.to_string(), "user_service::get_user")
            })?;

        Ok(user.into())
    }

    /// ユーザーを作成（プロフィールも同時に作成する）
    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserDto> {
        // 重複チェック
        if self.user_repo.find_by_email(&request.email).await?.is_some() {
            return Err(conflict_error(
                "Email address is already registered",
                "user_service::create_user",
            ));
        }

        if self
            .user_repo
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(conflict_error(
                "Username is already taken",
                "user_service::create_user",
            ));
        }

        // 職位・組織・上司の組み合わせを検証
        self.validate_assignment(
            request.position,
            request.organization_level_id,
            request.boss_id,
            None,
        )
        .await?;

        // パスワード強度チェックとハッシュ化
        self.password_manager
            .validate_password_strength(&request.password)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let password_hash = self
            .password_manager
            .hash_password(&request.password)
            .map_err(|e| {
                AppError::InternalServerError(format!("Password hashing failed: {}", e))
            })?;

        let user = self
            .user_repo
            .create(CreateUser {
                username: request.username,
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                position: request.position.as_str().to_string(),
                organization_level_id: request.organization_level_id,
                boss_id: request.boss_id,
                is_admin: request.is_admin,
                is_active: Some(true),
            })
            .await?;

        // 空のプロフィールを用意しておく
        self.profile_repo.create_for_user(user.id).await?;

        info!(
            user_id = %user.id,
            username = %user.username,
            position = %user.position,
            "User created successfully"
        );

        Ok(user.into())
    }

    /// ユーザーを更新
    ///
    /// Some のフィールドだけ反映する。職位・組織・上司は更新後の
    /// 組み合わせで検証し直す。
    pub async fn update_user(&self, user_id: Uuid, request: UpdateUserRequest) -> AppResult<UserDto> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                not_found_error("User", &user_id.to_string(), "user_service::update_user")
            })?;

        // メールアドレス変更時は重複チェック
        if let Some(email) = &request.email {
            if let Some(existing) = self.user_repo.find_by_email(email).await? {
                if existing.id != user_id {
                    return Err(conflict_error(
                        "Email address is already registered",
                        "user_service::update_user",
                    ));
                }
            }
        }

        // 更新後の職位・組織・上司の組み合わせを検証
        let effective_position = request.position.unwrap_or_else(|| user.position());
        let effective_level = request.organization_level_id.or(user.organization_level_id);
        let effective_boss = request.boss_id.or(user.boss_id);
        self.validate_assignment(
            effective_position,
            effective_level,
            effective_boss,
            Some(user_id),
        )
        .await?;

        // パスワード変更時は強度チェックとハッシュ化
        let password_hash = match &request.password {
            Some(password) => {
                self.password_manager
                    .validate_password_strength(password)
                    .map_err(|e| AppError::ValidationError(e.to_string()))?;
                Some(self.password_manager.hash_password(password).map_err(|e| {
                    AppError::InternalServerError(format!("Password hashing failed: {}", e))
                })?)
            }
            None => None,
        };

        let updated = self
            .user_repo
            .update(
                user_id,
                UpdateUser {
                    email: request.email,
                    first_name: request.first_name,
                    last_name: request.last_name,
                    position: request.position.map(|p| p.as_str().to_string()),
                    organization_level_id: request.organization_level_id,
                    boss_id: request.boss_id,
                    password_hash,
                    is_admin: request.is_admin,
                    is_active: request.is_active,
                },
            )
            .await?
            .ok_or_else(|| {
                not_found_error("User", &user_id.to_string(), "user_service::update_user")
            })?;

        info!(user_id = %user_id, "User updated successfully");

        Ok(updated.into())
    }

    /// ユーザーを削除
    pub async fn delete_user(&self, user_id: Uuid, current_user_id: Uuid) -> AppResult<()> {
        if user_id == current_user_id {
            return Err(conflict_error(
                "Cannot delete your own account",
                "user_service::delete_user",
            ));
        }

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                not_found_error("User", &user_id.to_string(), "user_service::delete_user")
            })?;

        // 組織レベルのディレクターはそのまま消せない
        let directed_levels = self.level_repo.find_by_director(user_id).await?;
        if !directed_levels.is_empty() {
            return Err(conflict_error(
                "User directs organization levels and cannot be deleted",
                "user_service::delete_user",
            ));
        }

        // 部下がいる上司もそのまま消せない
        let subordinates = self.user_repo.count_subordinates(user_id).await?;
        if subordinates > 0 {
            return Err(conflict_error(
                "User has subordinates and cannot be deleted",
                "user_service::delete_user",
            ));
        }

        self.user_repo.delete(user_id).await?;

        info!(
            user_id = %user_id,
            username = %user.username,
            "User deleted successfully"
        );

        Ok(())
    }

    // --- 職員名簿・プロフィール ---

    /// アクティブユーザーの職員名簿を取得
    pub async fn get_directory(&self, query: &PaginationQuery) -> AppResult<PaginatedDirectoryDto> {
        let (page, per_page) = query.get_pagination();
        let (entries, total_count) = self
            .user_repo
            .find_directory_paginated(page, per_page)
            .await?;

        Ok(PaginatedResponse::new(
            entries.into_iter().map(Into::into).collect(),
            page,
            per_page,
            total_count,
        ))
    }

    /// 本人のプロフィールを取得（未作成なら空で作成する）
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<ProfileDto> {
        if let Some(profile) = self.profile_repo.find_by_user_id(user_id).await? {
            return Ok(profile.into());
        }

        let profile = self.profile_repo.create_for_user(user_id).await?;
        Ok(profile.into())
    }

    /// 本人のプロフィールを更新
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> AppResult<ProfileDto> {
        let profile = self
            .profile_repo
            .update_for_user(
                user_id,
                UpdateProfile {
                    phone: request.phone,
                    address: request.address,
                    profile_picture_key: request.profile_picture_key,
                    signature_key: request.signature_key,
                },
            )
            .await?;

        info!(user_id = %user_id, "Profile updated successfully");

        Ok(profile.into())
    }

    // --- 内部検証 ---

    /// 職位・組織レベル・上司の組み合わせを検証
    ///
    /// ディレクター職は所属レベルの種別と一致していなければならない。
    /// スペシャリストには上司が必須。自分自身を上司にはできない。
    async fn validate_assignment(
        &self,
        position: Position,
        organization_level_id: Option<Uuid>,
        boss_id: Option<Uuid>,
        self_id: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(boss_id) = boss_id {
            if Some(boss_id) == self_id {
                return Err(validation_error("boss_id", "User cannot be their own boss"));
            }

            if self.user_repo.find_by_id(boss_id).await?.is_none() {
                return Err(validation_error("boss_id", "Boss user does not exist"));
            }
        }

        if position.requires_boss() && boss_id.is_none() {
            return Err(validation_error(
                "boss_id",
                "Specialists must have a boss assigned",
            ));
        }

        if let Some(level_id) = organization_level_id {
            let level = self
                .level_repo
                .find_by_id(level_id)
                .await?
                .ok_or_else(|| {
                    validation_error("organization_level_id", "Organization level does not exist")
                })?;

            if let Some(required) = position.required_level_type() {
                if level.level_type() != required {
                    return Err(validation_error(
                        "organization_level_id",
                        &format!(
                            "{} must be assigned to a {} level",
                            position.display_name(),
                            required.display_name()
                        ),
                    ));
                }
            }
        }

        Ok(())
    }
}
