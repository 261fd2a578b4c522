// plan-backend/src/repository/activity_repository.rs

use crate::domain::activity_model::{
    self, ActiveModel as ActivityActiveModel, Entity as ActivityEntity,
};
use crate::domain::activity_status::ActivityStatus;
use crate::domain::annual_plan_model;
use crate::domain::approval_model::{self, ActiveModel as ApprovalActiveModel};
use crate::domain::approval_status::ApprovalStatus;
use chrono::NaiveDate;
use sea_orm::entity::*;
use sea_orm::{
    DbConn, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

#[derive(Debug)]
pub struct ActivityRepository {
    db: DbConn,
}

impl ActivityRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 活動をIDで検索
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<activity_model::Model>, DbErr> {
        ActivityEntity::find_by_id(id).one(&self.db).await
    }

    /// 複数の活動をIDでまとめて取得
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<activity_model::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        ActivityEntity::find()
            .filter(activity_model::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
    }

    /// 計画に属する活動を開始日順で取得
    pub async fn find_by_plan(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<activity_model::Model>, DbErr> {
        ActivityEntity::find()
            .filter(activity_model::Column::PlanId.eq(plan_id))
            .order_by(activity_model::Column::StartDate, Order::Asc)
            .order_by(activity_model::Column::Name, Order::Asc)
            .all(&self.db)
            .await
    }

    /// 活動と承認レコードをまとめて作成
    ///
    /// 承認者リストの並び順がそのまま承認順（1始まり）になる。
    pub async fn create_with_approvals(
        &self,
        create_activity: CreateActivity,
        approver_ids: &[Uuid],
    ) -> Result<(activity_model::Model, Vec<approval_model::Model>), DbErr> {
        // トランザクションを開始
        let txn = self.db.begin().await?;

        let new_activity = ActivityActiveModel {
            plan_id: Set(create_activity.plan_id),
            name: Set(create_activity.name),
            description: Set(create_activity.description),
            responsible_id: Set(create_activity.responsible_id),
            start_date: Set(create_activity.start_date),
            end_date: Set(create_activity.end_date),
            status: Set(ActivityStatus::Pending.as_str().to_string()),
            progress: Set(0),
            ..ActivityActiveModel::new()
        };

        let activity = new_activity.insert(&txn).await?;

        let mut approvals = Vec::with_capacity(approver_ids.len());

        for (index, approver_id) in approver_ids.iter().enumerate() {
            let new_approval = ApprovalActiveModel {
                activity_id: Set(activity.id),
                approver_id: Set(*approver_id),
                status: Set(ApprovalStatus::Pending.as_str().to_string()),
                approval_order: Set(index as i32 + 1),
                comments: Set(String::new()),
                ..ApprovalActiveModel::new()
            };

            let approval = new_approval.insert(&txn).await?;
            approvals.push(approval);
        }

        // トランザクションをコミット
        txn.commit().await?;

        Ok((activity, approvals))
    }

    /// 活動を更新
    pub async fn update(
        &self,
        id: Uuid,
        update_activity: UpdateActivity,
    ) -> Result<Option<activity_model::Model>, DbErr> {
        let activity = match ActivityEntity::find_by_id(id).one(&self.db).await? {
            Some(a) => a,
            None => return Ok(None),
        };

        let mut active_model: ActivityActiveModel = activity.clone().into();
        let mut changed = false;

        if let Some(name) = update_activity.name {
            active_model.name = Set(name);
            changed = true;
        }

        if let Some(description) = update_activity.description {
            active_model.description = Set(description);
            changed = true;
        }

        if let Some(responsible_id) = update_activity.responsible_id {
            active_model.responsible_id = Set(responsible_id);
            changed = true;
        }

        if let Some(start_date) = update_activity.start_date {
            active_model.start_date = Set(start_date);
            changed = true;
        }

        if let Some(end_date) = update_activity.end_date {
            active_model.end_date = Set(end_date);
            changed = true;
        }

        if let Some(status) = update_activity.status {
            active_model.status = Set(status);
            changed = true;
        }

        if let Some(progress) = update_activity.progress {
            active_model.progress = Set(progress);
            changed = true;
        }

        if changed {
            Ok(Some(active_model.update(&self.db).await?))
        } else {
            Ok(Some(activity))
        }
    }

    /// 活動の総数
    pub async fn count(&self) -> Result<u64, DbErr> {
        ActivityEntity::find().count(&self.db).await
    }

    /// ステータス別の活動数
    pub async fn count_by_status(&self, status: &str) -> Result<u64, DbErr> {
        ActivityEntity::find()
            .filter(activity_model::Column::Status.eq(status))
            .count(&self.db)
            .await
    }

    /// 全活動を所属計画と一緒に取得（ダッシュボードの集計用）
    pub async fn find_all_with_plans(
        &self,
    ) -> Result<Vec<(activity_model::Model, Option<annual_plan_model::Model>)>, DbErr> {
        ActivityEntity::find()
            .find_also_related(annual_plan_model::Entity)
            .all(&self.db)
            .await
    }
}

// --- DTOと関連構造体 ---

/// 活動作成用構造体
#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub plan_id: Uuid,
    pub name: String,
    pub description: String,
    pub responsible_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// 活動更新用構造体
#[derive(Debug, Clone, Default)]
pub struct UpdateActivity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub responsible_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub progress: Option<i32>,
}
