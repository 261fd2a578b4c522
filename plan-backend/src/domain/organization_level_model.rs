// plan-backend/src/domain/organization_level_model.rs

use super::level_type::LevelType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization_levels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    pub level_type: String,

    #[sea_orm(nullable)]
    pub parent_id: Option<Uuid>,

    pub director_id: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::user_model::Entity",
        from = "Column::DirectorId",
        to = "crate::domain::user_model::Column::Id"
    )]
    Director,

    #[sea_orm(
        has_many = "crate::domain::annual_plan_model::Entity",
        from = "Column::Id",
        to = "crate::domain::annual_plan_model::Column::OrganizationLevelId"
    )]
    AnnualPlans,
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Director.def()
    }
}

impl Related<crate::domain::annual_plan_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnnualPlans.def()
    }
}

impl Model {
    /// レベル種別をenumとして取得
    pub fn level_type(&self) -> LevelType {
        LevelType::from_str(&self.level_type).unwrap_or(LevelType::BaseUnit)
    }

    /// 表示用の名称（種別込み）を取得
    pub fn display_label(&self) -> String {
        format!("{}: {}", self.level_type().display_name(), self.name)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        let level = Model {
            id: Uuid::new_v4(),
            name: "North Region".to_string(),
            level_type: "regional".to_string(),
            parent_id: None,
            director_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(level.display_label(), "Regional: North Region");
        assert_eq!(level.level_type(), LevelType::Regional);
    }
}
