// plan-backend/src/domain/approval_model.rs

use super::approval_status::ApprovalStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

/// アクティビティ1件に対する、1承認者分の判定レコード
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "approvals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub activity_id: Uuid,

    pub approver_id: Uuid,

    pub status: String,

    /// アクティビティ内での承認順序（1始まり）
    pub approval_order: i32,

    /// 判定確定時に一度だけ刻印され、以後変更されない
    #[sea_orm(nullable)]
    pub decided_at: Option<DateTime<Utc>>,

    #[sea_orm(column_type = "Text")]
    pub comments: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::activity_model::Entity",
        from = "Column::ActivityId",
        to = "crate::domain::activity_model::Column::Id"
    )]
    Activity,

    #[sea_orm(
        belongs_to = "crate::domain::user_model::Entity",
        from = "Column::ApproverId",
        to = "crate::domain::user_model::Column::Id"
    )]
    Approver,
}

impl Related<crate::domain::activity_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approver.def()
    }
}

impl Model {
    /// 判定ステータスをenumとして取得
    pub fn status(&self) -> ApprovalStatus {
        ApprovalStatus::from_str(&self.status).unwrap_or_default()
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
