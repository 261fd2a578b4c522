// plan-backend/src/repository/user_profile_repository.rs

use crate::domain::user_profile_model::{
    self, ActiveModel as ProfileActiveModel, Entity as ProfileEntity,
};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, QueryFilter, Set};
use uuid::Uuid;

#[derive(Debug)]
pub struct UserProfileRepository {
    db: DbConn,
}

impl UserProfileRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// ユーザーIDでプロフィールを検索
    pub async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<user_profile_model::Model>, DbErr> {
        ProfileEntity::find()
            .filter(user_profile_model::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// 空のプロフィールを作成（ユーザー作成直後に呼ばれる）
    pub async fn create_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<user_profile_model::Model, DbErr> {
        let new_profile = ProfileActiveModel {
            user_id: Set(user_id),
            phone: Set(String::new()),
            address: Set(String::new()),
            ..ProfileActiveModel::new()
        };

        new_profile.insert(&self.db).await
    }

    /// プロフィールを更新（存在しなければ作成してから更新）
    pub async fn update_for_user(
        &self,
        user_id: Uuid,
        update_profile: UpdateProfile,
    ) -> Result<user_profile_model::Model, DbErr> {
        let profile = match self.find_by_user_id(user_id).await? {
            Some(p) => p,
            None => self.create_for_user(user_id).await?,
        };

        let mut active_model: ProfileActiveModel = profile.clone().into();
        let mut changed = false;

        if let Some(phone) = update_profile.phone {
            active_model.phone = Set(phone);
            changed = true;
        }

        if let Some(address) = update_profile.address {
            active_model.address = Set(address);
            changed = true;
        }

        if update_profile.profile_picture_key.is_some() {
            active_model.profile_picture_key = Set(update_profile.profile_picture_key);
            changed = true;
        }

        if update_profile.signature_key.is_some() {
            active_model.signature_key = Set(update_profile.signature_key);
            changed = true;
        }

        if changed {
            active_model.update(&self.db).await
        } else {
            Ok(profile)
        }
    }
}

// --- DTOと関連構造体 ---

/// プロフィール更新用構造体
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub profile_picture_key: Option<String>,
    pub signature_key: Option<String>,
}
