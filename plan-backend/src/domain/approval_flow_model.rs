// plan-backend/src/domain/approval_flow_model.rs

use super::workflow_module::WorkflowModule;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "approval_flows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub module: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        has_many = "crate::domain::approver_role_model::Entity",
        from = "Column::Id",
        to = "crate::domain::approver_role_model::Column::FlowId"
    )]
    ApproverRoles,
}

impl Related<crate::domain::approver_role_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApproverRoles.def()
    }
}

impl Model {
    /// 対象モジュールをenumとして取得
    pub fn module(&self) -> Option<WorkflowModule> {
        WorkflowModule::from_str(&self.module)
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
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}
