// plan-backend/src/domain/activity_model.rs

use super::activity_status::ActivityStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub plan_id: Uuid,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub responsible_id: Uuid,

    pub start_date: Date,

    pub end_date: Date,

    pub status: String,

    /// 進捗率 0〜100
    pub progress: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::annual_plan_model::Entity",
        from = "Column::PlanId",
        to = "crate::domain::annual_plan_model::Column::Id"
    )]
    Plan,

    #[sea_orm(
        belongs_to = "crate::domain::user_model::Entity",
        from = "Column::ResponsibleId",
        to = "crate::domain::user_model::Column::Id"
    )]
    Responsible,

    #[sea_orm(
        has_many = "crate::domain::approval_model::Entity",
        from = "Column::Id",
        to = "crate::domain::approval_model::Column::ActivityId"
    )]
    Approvals,
}

impl Related<crate::domain::annual_plan_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responsible.def()
    }
}

impl Related<crate::domain::approval_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Approvals.def()
    }
}

impl Model {
    /// ステータスをenumとして取得
    pub fn status(&self) -> ActivityStatus {
        ActivityStatus::from_str(&self.status).unwrap_or_default()
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
