// plan-backend/src/service/approval_service.rs

use crate::api::dto::approval_dto::{
    ApprovalDecisionResultDto, ApprovalDto, DecideApprovalRequest, PendingApprovalDto,
};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::repository::activity_repository::ActivityRepository;
use crate::repository::approval_repository::{ApprovalRepository, DecideOutcome};
use crate::repository::user_repository::UserRepository;
use crate::service::notification_service::{ActivityDecidedEvent, ActivityNotifier};
use crate::utils::error_helper::{conflict_error, forbidden_error, not_found_error, validation_error};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 承認サービス
///
/// 判定本体（順序チェック、活動ステータスの集約、decided_atの刻印）は
/// リポジトリが単一トランザクションで処理する。ここでは結果の解釈と
/// 通知の発火だけを行う。
pub struct ApprovalService {
    approval_repo: Arc<ApprovalRepository>,
    activity_repo: Arc<ActivityRepository>,
    user_repo: Arc<UserRepository>,
    notifier: ActivityNotifier,
}

impl ApprovalService {
    pub fn new(db_pool: DbPool, notifier: ActivityNotifier) -> Self {
        Self {
            approval_repo: Arc::new(ApprovalRepository::new(db_pool.clone())),
            activity_repo: Arc::new(ActivityRepository::new(db_pool.clone())),
            user_repo: Arc::new(UserRepository::new(db_pool)),
            notifier,
        }
    }

    /// 自分宛の未判定承認一覧を取得
    ///
    /// actionable は「自分より前の承認順がすべて確定済みで、いま判定を
    /// 下せる」ことを表す。活動側がすでに確定している場合は常に false。
    pub async fn list_my_pending(&self, approver_id: Uuid) -> AppResult<Vec<PendingApprovalDto>> {
        let pending = self.approval_repo.find_pending_by_approver(approver_id).await?;
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        // 対象の活動と、同じ活動に連なる承認レコードを一括で引く
        let activity_ids: Vec<Uuid> = pending.iter().map(|a| a.activity_id).collect();
        let activities = self.activity_repo.find_by_ids(&activity_ids).await?;
        let activities_by_id: HashMap<Uuid, _> =
            activities.into_iter().map(|a| (a.id, a)).collect();

        let siblings = self.approval_repo.find_by_activity_ids(&activity_ids).await?;
        let mut siblings_by_activity: HashMap<Uuid, Vec<(i32, bool)>> = HashMap::new();
        for sibling in &siblings {
            siblings_by_activity
                .entry(sibling.activity_id)
                .or_default()
                .push((sibling.approval_order, sibling.status().is_pending()));
        }

        let mut items = Vec::with_capacity(pending.len());
        for approval in pending {
            let Some(activity) = activities_by_id.get(&approval.activity_id) else {
                // 活動が消えた承認レコードは一覧に出さない
                continue;
            };

            let prior_all_decided = siblings_by_activity
                .get(&approval.activity_id)
                .map(|orders| {
                    orders
                        .iter()
                        .all(|(order, is_pending)| {
                            *order >= approval.approval_order || !is_pending
                        })
                })
                .unwrap_or(true);

            let actionable = prior_all_decided && !activity.status().is_terminal();

            items.push(PendingApprovalDto {
                id: approval.id,
                activity_id: approval.activity_id,
                activity_name: activity.name.clone(),
                activity_status: activity.status.clone(),
                activity_end_date: activity.end_date,
                approval_order: approval.approval_order,
                actionable,
                created_at: approval.created_at,
            });
        }

        Ok(items)
    }

    /// 承認判定を下す
    pub async fn decide(
        &self,
        approval_id: Uuid,
        approver_id: Uuid,
        request: DecideApprovalRequest,
    ) -> AppResult<ApprovalDecisionResultDto> {
        let outcome = self
            .approval_repo
            .decide(
                approval_id,
                approver_id,
                request.decision.is_approved(),
                request.comments.clone().unwrap_or_default(),
            )
            .await?;

        match outcome {
            DecideOutcome::NotFound => Err(not_found_error(
                "Approval",
                &approval_id.to_string(),
                "approval_service::decide",
            )),
            DecideOutcome::WrongApprover => Err(forbidden_error(
                "You are not the assigned approver for this approval",
                "approval_service::decide",
                Some(&approver_id.to_string()),
            )),
            DecideOutcome::AlreadyDecided => Err(conflict_error(
                "Approval has already been decided",
                "approval_service::decide",
            )),
            DecideOutcome::ActivityClosed => Err(conflict_error(
                "Activity has already reached a final status",
                "approval_service::decide",
            )),
            DecideOutcome::NotYourTurn { waiting_order } => Err(validation_error(
                "approval_order",
                &format!(
                    "Earlier approvals are still pending (waiting on order {})",
                    waiting_order
                ),
            )),
            DecideOutcome::Decided {
                approval,
                activity,
                activity_finalized,
            } => {
                info!(
                    approval_id = %approval.id,
                    activity_id = %activity.id,
                    decision = %approval.status,
                    activity_finalized,
                    "Approval decision recorded"
                );

                // 判定のたびに担当者へ通知（ベストエフォート）
                self.notifier.notify(ActivityDecidedEvent {
                    activity_id: activity.id,
                    activity_name: activity.name.clone(),
                    responsible_id: activity.responsible_id,
                    decision: approval.status(),
                    comments: request.comments.unwrap_or_default(),
                });

                let approver_name = self
                    .user_repo
                    .find_by_id(approval.approver_id)
                    .await?
                    .map(|u| u.full_name());

                let activity_status = activity.status.clone();
                let mut dto = ApprovalDto::from(approval);
                dto.approver_name = approver_name;

                Ok(ApprovalDecisionResultDto {
                    approval: dto,
                    activity_status,
                    activity_finalized,
                })
            }
        }
    }
}
