// plan-backend/src/repository/approval_repository.rs

use crate::domain::activity_model::{
    self, ActiveModel as ActivityActiveModel, Entity as ActivityEntity,
};
use crate::domain::activity_status::ActivityStatus;
use crate::domain::approval_model::{
    self, ActiveModel as ApprovalActiveModel, Entity as ApprovalEntity,
};
use crate::domain::approval_status::ApprovalStatus;
use chrono::Utc;
use sea_orm::entity::*;
use sea_orm::{
    DbConn, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

#[derive(Debug)]
pub struct ApprovalRepository {
    db: DbConn,
}

impl ApprovalRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 承認レコードをIDで検索
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<approval_model::Model>, DbErr> {
        ApprovalEntity::find_by_id(id).one(&self.db).await
    }

    /// 活動に紐づく承認レコードを承認順で取得
    pub async fn find_by_activity(
        &self,
        activity_id: Uuid,
    ) -> Result<Vec<approval_model::Model>, DbErr> {
        ApprovalEntity::find()
            .filter(approval_model::Column::ActivityId.eq(activity_id))
            .order_by(approval_model::Column::ApprovalOrder, Order::Asc)
            .all(&self.db)
            .await
    }

    /// 複数の活動の承認レコードをまとめて取得（順番待ち判定の一括計算用）
    pub async fn find_by_activity_ids(
        &self,
        activity_ids: &[Uuid],
    ) -> Result<Vec<approval_model::Model>, DbErr> {
        if activity_ids.is_empty() {
            return Ok(Vec::new());
        }
        ApprovalEntity::find()
            .filter(approval_model::Column::ActivityId.is_in(activity_ids.iter().copied()))
            .order_by(approval_model::Column::ApprovalOrder, Order::Asc)
            .all(&self.db)
            .await
    }

    /// 指定承認者の未処理レコードを古い順で取得
    pub async fn find_pending_by_approver(
        &self,
        approver_id: Uuid,
    ) -> Result<Vec<approval_model::Model>, DbErr> {
        ApprovalEntity::find()
            .filter(approval_model::Column::ApproverId.eq(approver_id))
            .filter(approval_model::Column::Status.eq(ApprovalStatus::Pending.as_str()))
            .order_by(approval_model::Column::CreatedAt, Order::Asc)
            .all(&self.db)
            .await
    }

    /// 指定承認者の未処理レコード数
    pub async fn count_pending_by_approver(&self, approver_id: Uuid) -> Result<u64, DbErr> {
        ApprovalEntity::find()
            .filter(approval_model::Column::ApproverId.eq(approver_id))
            .filter(approval_model::Column::Status.eq(ApprovalStatus::Pending.as_str()))
            .count(&self.db)
            .await
    }

    /// 承認判定を確定し、同一トランザクション内で活動ステータスを再集計する
    pub async fn decide(
        &self,
        approval_id: Uuid,
        approver_id: Uuid,
        approved: bool,
        comments: String,
    ) -> Result<DecideOutcome, DbErr> {
        // トランザクションを開始
        let txn = self.db.begin().await?;

        let approval = match ApprovalEntity::find_by_id(approval_id).one(&txn).await? {
            Some(a) => a,
            None => {
                txn.rollback().await?;
                return Ok(DecideOutcome::NotFound);
            }
        };

        // 担当承認者以外は判定できない
        if approval.approver_id != approver_id {
            txn.rollback().await?;
            return Ok(DecideOutcome::WrongApprover);
        }

        // 一度確定したレコードは再判定できない
        if approval.status().is_terminal() {
            txn.rollback().await?;
            return Ok(DecideOutcome::AlreadyDecided);
        }

        let activity = match ActivityEntity::find_by_id(approval.activity_id)
            .one(&txn)
            .await?
        {
            Some(a) => a,
            None => {
                txn.rollback().await?;
                return Ok(DecideOutcome::NotFound);
            }
        };

        // 活動側がすでに確定していたら受け付けない
        if activity.status().is_terminal() {
            txn.rollback().await?;
            return Ok(DecideOutcome::ActivityClosed);
        }

        let siblings = ApprovalEntity::find()
            .filter(approval_model::Column::ActivityId.eq(approval.activity_id))
            .order_by(approval_model::Column::ApprovalOrder, Order::Asc)
            .all(&txn)
            .await?;

        // 自分より前の承認順が未処理の間は判定できない
        if let Some(waiting) = siblings
            .iter()
            .find(|s| s.approval_order < approval.approval_order && !s.status().is_terminal())
        {
            let waiting_order = waiting.approval_order;
            txn.rollback().await?;
            return Ok(DecideOutcome::NotYourTurn { waiting_order });
        }

        // 判定を刻印（decided_at はここで一度だけ設定される）
        let new_status = if approved {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        };

        let mut active_model: ApprovalActiveModel = approval.into();
        active_model.status = Set(new_status.as_str().to_string());
        active_model.decided_at = Set(Some(Utc::now()));
        active_model.comments = Set(comments);
        let decided = active_model.update(&txn).await?;

        // 同一トランザクション内で活動ステータスを再集計
        let mut statuses: Vec<ApprovalStatus> = siblings
            .iter()
            .filter(|s| s.id != decided.id)
            .map(|s| s.status())
            .collect();
        statuses.push(decided.status());

        let next_activity_status = if statuses.contains(&ApprovalStatus::Rejected) {
            Some(ActivityStatus::Rejected)
        } else if statuses.iter().all(|s| *s == ApprovalStatus::Approved) {
            Some(ActivityStatus::Approved)
        } else {
            None
        };

        let (activity, activity_finalized) = match next_activity_status {
            Some(status) => {
                let mut activity_active: ActivityActiveModel = activity.into();
                activity_active.status = Set(status.as_str().to_string());
                (activity_active.update(&txn).await?, true)
            }
            None => (activity, false),
        };

        // トランザクションをコミット
        txn.commit().await?;

        Ok(DecideOutcome::Decided {
            approval: decided,
            activity,
            activity_finalized,
        })
    }
}

// --- DTOと関連構造体 ---

/// 承認判定の結果
#[derive(Debug)]
pub enum DecideOutcome {
    /// 承認レコードまたは対象の活動が存在しない
    NotFound,
    /// 担当承認者ではない
    WrongApprover,
    /// すでに判定済み
    AlreadyDecided,
    /// 活動側がすでに確定している
    ActivityClosed,
    /// 前の承認順が未処理
    NotYourTurn { waiting_order: i32 },
    /// 判定が確定した
    Decided {
        approval: approval_model::Model,
        activity: activity_model::Model,
        /// 今回の判定で活動ステータスが確定したか
        activity_finalized: bool,
    },
}
