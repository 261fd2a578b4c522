// plan-backend/src/repository/user_repository.rs

use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use crate::domain::user_profile_model;
use sea_orm::entity::*;
use sea_orm::{Condition, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use sea_orm::{DbConn, DbErr, DeleteResult, Set};
use uuid::Uuid;

#[derive(Debug)]
pub struct UserRepository {
    db: DbConn,
}

impl UserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    // --- 基本CRUD操作 ---

    /// ユーザーをIDで検索
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find_by_id(id).one(&self.db).await
    }

    /// 複数のユーザーをIDでまとめて検索
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<user_model::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        UserEntity::find()
            .filter(user_model::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
    }

    /// ユーザーをメールアドレスで検索
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// ユーザーをユーザー名で検索
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// メールアドレスまたはユーザー名でユーザーを検索
    pub async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(
                Condition::any()
                    .add(user_model::Column::Email.eq(identifier))
                    .add(user_model::Column::Username.eq(identifier)),
            )
            .one(&self.db)
            .await
    }

    /// ページネーション付きでユーザーを取得
    pub async fn find_all_paginated(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<user_model::Model>, u64), DbErr> {
        let page_size = std::cmp::min(page_size, 100); // 最大100件
        let offset = (page - 1) * page_size;

        let users = UserEntity::find()
            .order_by(user_model::Column::Username, Order::Asc)
            .limit(page_size)
            .offset(offset)
            .all(&self.db)
            .await?;

        let total_count = UserEntity::find().count(&self.db).await?;

        Ok((users, total_count))
    }

    /// 職員名簿用にアクティブユーザーとプロフィールをまとめて取得
    pub async fn find_directory_paginated(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<
        (
            Vec<(user_model::Model, Option<user_profile_model::Model>)>,
            u64,
        ),
        DbErr,
    > {
        let page_size = std::cmp::min(page_size, 100);
        let offset = (page - 1) * page_size;

        let entries = UserEntity::find()
            .find_also_related(user_profile_model::Entity)
            .filter(user_model::Column::IsActive.eq(true))
            .order_by(user_model::Column::Username, Order::Asc)
            .limit(page_size)
            .offset(offset)
            .all(&self.db)
            .await?;

        let total_count = UserEntity::find()
            .filter(user_model::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;

        Ok((entries, total_count))
    }

    /// ユーザーを作成
    pub async fn create(&self, create_user: CreateUser) -> Result<user_model::Model, DbErr> {
        let new_user = UserActiveModel {
            username: Set(create_user.username),
            email: Set(create_user.email),
            password_hash: Set(create_user.password_hash),
            first_name: Set(create_user.first_name),
            last_name: Set(create_user.last_name),
            position: Set(create_user.position),
            organization_level_id: Set(create_user.organization_level_id),
            boss_id: Set(create_user.boss_id),
            is_admin: Set(create_user.is_admin.unwrap_or(false)),
            is_active: Set(create_user.is_active.unwrap_or(true)),
            ..UserActiveModel::new()
        };

        new_user.insert(&self.db).await
    }

    /// ユーザーを更新
    pub async fn update(
        &self,
        id: Uuid,
        update_user: UpdateUser,
    ) -> Result<Option<user_model::Model>, DbErr> {
        let user = match UserEntity::find_by_id(id).one(&self.db).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        let mut active_model: UserActiveModel = user.clone().into();
        let mut changed = false;

        if let Some(email) = update_user.email {
            active_model.email = Set(email);
            changed = true;
        }

        if let Some(first_name) = update_user.first_name {
            active_model.first_name = Set(first_name);
            changed = true;
        }

        if let Some(last_name) = update_user.last_name {
            active_model.last_name = Set(last_name);
            changed = true;
        }

        if let Some(position) = update_user.position {
            active_model.position = Set(position);
            changed = true;
        }

        if update_user.organization_level_id.is_some() {
            active_model.organization_level_id = Set(update_user.organization_level_id);
            changed = true;
        }

        if update_user.boss_id.is_some() {
            active_model.boss_id = Set(update_user.boss_id);
            changed = true;
        }

        if let Some(password_hash) = update_user.password_hash {
            active_model.password_hash = Set(password_hash);
            changed = true;
        }

        if let Some(is_admin) = update_user.is_admin {
            active_model.is_admin = Set(is_admin);
            changed = true;
        }

        if let Some(is_active) = update_user.is_active {
            active_model.is_active = Set(is_active);
            changed = true;
        }

        if changed {
            Ok(Some(active_model.update(&self.db).await?))
        } else {
            Ok(Some(user)) // 何も変更がなければ元のユーザーを返す
        }
    }

    /// ユーザーを削除
    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, DbErr> {
        UserEntity::delete_by_id(id).exec(&self.db).await
    }

    /// 指定ユーザーを上司としているユーザー数
    pub async fn count_subordinates(&self, boss_id: Uuid) -> Result<u64, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::BossId.eq(boss_id))
            .count(&self.db)
            .await
    }
}

// --- DTOと関連構造体 ---

/// ユーザー作成用構造体
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub organization_level_id: Option<Uuid>,
    pub boss_id: Option<Uuid>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

/// ユーザー更新用構造体
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub organization_level_id: Option<Uuid>,
    pub boss_id: Option<Uuid>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}
