// plan-backend/src/repository/approval_flow_repository.rs

use crate::domain::approval_flow_model::{
    self, ActiveModel as FlowActiveModel, Entity as FlowEntity,
};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Debug)]
pub struct ApprovalFlowRepository {
    db: DbConn,
}

impl ApprovalFlowRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 承認フローをIDで検索
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<approval_flow_model::Model>, DbErr> {
        FlowEntity::find_by_id(id).one(&self.db).await
    }

    /// 全フローを取得
    pub async fn find_all(&self) -> Result<Vec<approval_flow_model::Model>, DbErr> {
        FlowEntity::find()
            .order_by(approval_flow_model::Column::Module, Order::Asc)
            .all(&self.db)
            .await
    }

    /// モジュール名でフローを検索
    pub async fn find_by_module(
        &self,
        module: &str,
    ) -> Result<Option<approval_flow_model::Model>, DbErr> {
        FlowEntity::find()
            .filter(approval_flow_model::Column::Module.eq(module))
            .one(&self.db)
            .await
    }

    /// 承認フローを作成
    pub async fn create(&self, module: String) -> Result<approval_flow_model::Model, DbErr> {
        let new_flow = FlowActiveModel {
            module: Set(module),
            ..FlowActiveModel::new()
        };

        new_flow.insert(&self.db).await
    }
}
