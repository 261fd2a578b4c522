// plan-backend/src/domain/annual_plan_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "annual_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub year: i32,

    pub created_by: Uuid,

    pub approved: bool,

    #[sea_orm(nullable)]
    pub approved_by: Option<Uuid>,

    pub organization_level_id: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::organization_level_model::Entity",
        from = "Column::OrganizationLevelId",
        to = "crate::domain::organization_level_model::Column::Id"
    )]
    OrganizationLevel,

    #[sea_orm(
        has_many = "crate::domain::activity_model::Entity",
        from = "Column::Id",
        to = "crate::domain::activity_model::Column::PlanId"
    )]
    Activities,
}

impl Related<crate::domain::organization_level_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrganizationLevel.def()
    }
}

impl Related<crate::domain::activity_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
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
