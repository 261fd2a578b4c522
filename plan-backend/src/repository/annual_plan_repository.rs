// plan-backend/src/repository/annual_plan_repository.rs

use crate::domain::annual_plan_model::{
    self, ActiveModel as PlanActiveModel, Entity as PlanEntity,
};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Debug)]
pub struct AnnualPlanRepository {
    db: DbConn,
}

impl AnnualPlanRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 年間計画をIDで検索
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<annual_plan_model::Model>, DbErr> {
        PlanEntity::find_by_id(id).one(&self.db).await
    }

    /// 全計画を年度の新しい順で取得
    pub async fn find_all(&self) -> Result<Vec<annual_plan_model::Model>, DbErr> {
        PlanEntity::find()
            .order_by(annual_plan_model::Column::Year, Order::Desc)
            .order_by(annual_plan_model::Column::CreatedAt, Order::Desc)
            .all(&self.db)
            .await
    }

    /// 指定した階層群の計画のみを取得（責任者向けの絞り込み）
    pub async fn find_by_level_ids(
        &self,
        level_ids: &[Uuid],
    ) -> Result<Vec<annual_plan_model::Model>, DbErr> {
        if level_ids.is_empty() {
            return Ok(Vec::new());
        }
        PlanEntity::find()
            .filter(annual_plan_model::Column::OrganizationLevelId.is_in(level_ids.iter().copied()))
            .order_by(annual_plan_model::Column::Year, Order::Desc)
            .order_by(annual_plan_model::Column::CreatedAt, Order::Desc)
            .all(&self.db)
            .await
    }

    /// 年度と階層の組み合わせで検索（一意制約の事前チェック用）
    pub async fn find_by_year_and_level(
        &self,
        year: i32,
        organization_level_id: Uuid,
    ) -> Result<Option<annual_plan_model::Model>, DbErr> {
        PlanEntity::find()
            .filter(annual_plan_model::Column::Year.eq(year))
            .filter(annual_plan_model::Column::OrganizationLevelId.eq(organization_level_id))
            .one(&self.db)
            .await
    }

    /// 年間計画を作成
    pub async fn create(
        &self,
        create_plan: CreateAnnualPlan,
    ) -> Result<annual_plan_model::Model, DbErr> {
        let new_plan = PlanActiveModel {
            year: Set(create_plan.year),
            created_by: Set(create_plan.created_by),
            organization_level_id: Set(create_plan.organization_level_id),
            approved: Set(false),
            ..PlanActiveModel::new()
        };

        new_plan.insert(&self.db).await
    }

    /// 計画を承認済みにする
    pub async fn approve(
        &self,
        id: Uuid,
        approved_by: Uuid,
    ) -> Result<Option<annual_plan_model::Model>, DbErr> {
        let plan = match PlanEntity::find_by_id(id).one(&self.db).await? {
            Some(p) => p,
            None => return Ok(None),
        };

        let mut active_model: PlanActiveModel = plan.into();
        active_model.approved = Set(true);
        active_model.approved_by = Set(Some(approved_by));

        Ok(Some(active_model.update(&self.db).await?))
    }

    /// 計画の総数
    pub async fn count(&self) -> Result<u64, DbErr> {
        PlanEntity::find().count(&self.db).await
    }

    /// 承認済み計画の数
    pub async fn count_approved(&self) -> Result<u64, DbErr> {
        PlanEntity::find()
            .filter(annual_plan_model::Column::Approved.eq(true))
            .count(&self.db)
            .await
    }
}

// --- DTOと関連構造体 ---

/// 年間計画作成用構造体
#[derive(Debug, Clone)]
pub struct CreateAnnualPlan {
    pub year: i32,
    pub created_by: Uuid,
    pub organization_level_id: Uuid,
}
