// plan-backend/src/repository/organization_level_repository.rs

use crate::domain::organization_level_model::{
    self, ActiveModel as LevelActiveModel, Entity as LevelEntity,
};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Debug)]
pub struct OrganizationLevelRepository {
    db: DbConn,
}

impl OrganizationLevelRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 組織階層をIDで検索
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<organization_level_model::Model>, DbErr> {
        LevelEntity::find_by_id(id).one(&self.db).await
    }

    /// 全階層を取得（ツリー構築用に種別、名前の順で返す）
    pub async fn find_all(&self) -> Result<Vec<organization_level_model::Model>, DbErr> {
        LevelEntity::find()
            .order_by(organization_level_model::Column::LevelType, Order::Asc)
            .order_by(organization_level_model::Column::Name, Order::Asc)
            .all(&self.db)
            .await
    }

    /// 直下の子階層を取得
    pub async fn find_children(
        &self,
        parent_id: Uuid,
    ) -> Result<Vec<organization_level_model::Model>, DbErr> {
        LevelEntity::find()
            .filter(organization_level_model::Column::ParentId.eq(parent_id))
            .order_by(organization_level_model::Column::Name, Order::Asc)
            .all(&self.db)
            .await
    }

    /// 指定ユーザーが責任者になっている階層を取得
    pub async fn find_by_director(
        &self,
        director_id: Uuid,
    ) -> Result<Vec<organization_level_model::Model>, DbErr> {
        LevelEntity::find()
            .filter(organization_level_model::Column::DirectorId.eq(director_id))
            .all(&self.db)
            .await
    }

    /// 名前と種別の組み合わせで検索（一意制約の事前チェック用）
    pub async fn find_by_name_and_type(
        &self,
        name: &str,
        level_type: &str,
    ) -> Result<Option<organization_level_model::Model>, DbErr> {
        LevelEntity::find()
            .filter(organization_level_model::Column::Name.eq(name))
            .filter(organization_level_model::Column::LevelType.eq(level_type))
            .one(&self.db)
            .await
    }

    /// 組織階層を作成
    pub async fn create(
        &self,
        create_level: CreateOrganizationLevel,
    ) -> Result<organization_level_model::Model, DbErr> {
        let new_level = LevelActiveModel {
            name: Set(create_level.name),
            level_type: Set(create_level.level_type),
            parent_id: Set(create_level.parent_id),
            director_id: Set(create_level.director_id),
            ..LevelActiveModel::new()
        };

        new_level.insert(&self.db).await
    }

    /// 組織階層を更新
    pub async fn update(
        &self,
        id: Uuid,
        update_level: UpdateOrganizationLevel,
    ) -> Result<Option<organization_level_model::Model>, DbErr> {
        let level = match LevelEntity::find_by_id(id).one(&self.db).await? {
            Some(l) => l,
            None => return Ok(None),
        };

        let mut active_model: LevelActiveModel = level.clone().into();
        let mut changed = false;

        if let Some(name) = update_level.name {
            active_model.name = Set(name);
            changed = true;
        }

        if let Some(level_type) = update_level.level_type {
            active_model.level_type = Set(level_type);
            changed = true;
        }

        if update_level.parent_id.is_some() {
            active_model.parent_id = Set(update_level.parent_id);
            changed = true;
        }

        if let Some(director_id) = update_level.director_id {
            active_model.director_id = Set(director_id);
            changed = true;
        }

        if changed {
            Ok(Some(active_model.update(&self.db).await?))
        } else {
            Ok(Some(level))
        }
    }
}

// --- DTOと関連構造体 ---

/// 組織階層作成用構造体
#[derive(Debug, Clone)]
pub struct CreateOrganizationLevel {
    pub name: String,
    pub level_type: String,
    pub parent_id: Option<Uuid>,
    pub director_id: Uuid,
}

/// 組織階層更新用構造体
#[derive(Debug, Clone, Default)]
pub struct UpdateOrganizationLevel {
    pub name: Option<String>,
    pub level_type: Option<String>,
    pub parent_id: Option<Uuid>,
    pub director_id: Option<Uuid>,
}
