// plan-backend/src/repository/approver_role_repository.rs

use crate::domain::approver_role_model::{
    self, ActiveModel as RoleActiveModel, Entity as RoleEntity,
};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, DeleteResult, Order, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Debug)]
pub struct ApproverRoleRepository {
    db: DbConn,
}

impl ApproverRoleRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 承認者ロールをIDで検索
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<approver_role_model::Model>, DbErr> {
        RoleEntity::find_by_id(id).one(&self.db).await
    }

    /// フローに属するロールを承認順で取得
    pub async fn find_by_flow(
        &self,
        flow_id: Uuid,
    ) -> Result<Vec<approver_role_model::Model>, DbErr> {
        RoleEntity::find()
            .filter(approver_role_model::Column::FlowId.eq(flow_id))
            .order_by(approver_role_model::Column::ApprovalOrder, Order::Asc)
            .all(&self.db)
            .await
    }

    /// フロー内の特定ユーザーのロールを検索
    pub async fn find_by_flow_and_user(
        &self,
        flow_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<approver_role_model::Model>, DbErr> {
        RoleEntity::find()
            .filter(approver_role_model::Column::FlowId.eq(flow_id))
            .filter(approver_role_model::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// フロー内の特定順位のロールを検索
    pub async fn find_by_flow_and_order(
        &self,
        flow_id: Uuid,
        approval_order: i32,
    ) -> Result<Option<approver_role_model::Model>, DbErr> {
        RoleEntity::find()
            .filter(approver_role_model::Column::FlowId.eq(flow_id))
            .filter(approver_role_model::Column::ApprovalOrder.eq(approval_order))
            .one(&self.db)
            .await
    }

    /// 承認者ロールを作成
    pub async fn create(
        &self,
        create_role: CreateApproverRole,
    ) -> Result<approver_role_model::Model, DbErr> {
        let new_role = RoleActiveModel {
            flow_id: Set(create_role.flow_id),
            user_id: Set(create_role.user_id),
            role_name: Set(create_role.role_name),
            approval_order: Set(create_role.approval_order),
            ..RoleActiveModel::new()
        };

        new_role.insert(&self.db).await
    }

    /// 承認者ロールを削除
    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, DbErr> {
        RoleEntity::delete_by_id(id).exec(&self.db).await
    }
}

// --- DTOと関連構造体 ---

/// 承認者ロール作成用構造体
#[derive(Debug, Clone)]
pub struct CreateApproverRole {
    pub flow_id: Uuid,
    pub user_id: Uuid,
    pub role_name: String,
    pub approval_order: i32,
}
