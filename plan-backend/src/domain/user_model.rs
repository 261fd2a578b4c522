// plan-backend/src/domain/user_model.rs

use super::position::Position;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)] // パスワードハッシュは絶対にシリアライズしない
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    pub position: String,

    // organization_levels との相互参照になるため、DB上は外部キーを張らず
    // サービス層で存在チェックする
    #[sea_orm(nullable)]
    pub organization_level_id: Option<Uuid>,

    #[sea_orm(nullable)]
    pub boss_id: Option<Uuid>,

    pub is_admin: bool,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "crate::domain::user_profile_model::Entity")]
    Profile,

    #[sea_orm(
        has_many = "crate::domain::organization_level_model::Entity",
        from = "Column::Id",
        to = "crate::domain::organization_level_model::Column::DirectorId"
    )]
    DirectedLevels,

    #[sea_orm(
        has_many = "crate::domain::approval_model::Entity",
        from = "Column::Id",
        to = "crate::domain::approval_model::Column::ApproverId"
    )]
    Approvals,
}

// リレーション実装
impl Related<crate::domain::user_profile_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<crate::domain::organization_level_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DirectedLevels.def()
    }
}

impl Related<crate::domain::approval_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approvals.def()
    }
}

impl Model {
    /// 表示用のフルネームを取得（姓名が空ならusernameにフォールバック）
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let trimmed = name.trim();
        if trimmed.is_empty() {
            self.username.clone()
        } else {
            trimmed.to_string()
        }
    }

    /// 職位をenumとして取得
    pub fn position(&self) -> Position {
        Position::from_str(&self.position).unwrap_or_default()
    }
}

/// JWTに埋め込むユーザー情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub position: String,
    pub is_admin: bool,
    pub is_active: bool,
}

impl UserClaims {
    /// 認証可能かチェック
    pub fn can_authenticate(&self) -> bool {
        self.is_active
    }

    /// 職位をenumとして取得
    pub fn position(&self) -> Position {
        Position::from_str(&self.position).unwrap_or_default()
    }
}

impl From<&Model> for UserClaims {
    fn from(user: &Model) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            position: user.position.clone(),
            is_admin: user.is_admin,
            is_active: user.is_active,
        }
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            // 更新の場合のみ updated_at を更新
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}
