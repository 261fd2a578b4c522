// plan-backend/src/service/notification_service.rs

use crate::db::DbPool;
use crate::domain::approval_status::ApprovalStatus;
use crate::repository::user_repository::UserRepository;
use crate::utils::email::EmailService;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// 承認判定をワーカーへ渡すイベント（判定が下るたびに1件）
#[derive(Debug, Clone)]
pub struct ActivityDecidedEvent {
    pub activity_id: Uuid,
    pub activity_name: String,
    pub responsible_id: Uuid,
    pub decision: ApprovalStatus,
    pub comments: String,
}

/// 承認サービスから通知ワーカーへの送信ハンドル
#[derive(Clone)]
pub struct ActivityNotifier {
    tx: mpsc::UnboundedSender<ActivityDecidedEvent>,
}

impl ActivityNotifier {
    /// 判定イベントをワーカーへ送る
    ///
    /// ワーカーが停止していても呼び出し元は失敗しない。
    pub fn notify(&self, event: ActivityDecidedEvent) {
        if self.tx.send(event).is_err() {
            warn!("Notification worker is not running, event dropped");
        }
    }
}

/// 通知ワーカーを起動して送信ハンドルを返す
///
/// メール送信の失敗はwarnログに残して握り潰す。
/// 承認リクエスト側には一切波及しない。
pub fn spawn_notification_worker(
    db_pool: DbPool,
    email_service: Arc<EmailService>,
) -> ActivityNotifier {
    let (tx, mut rx) = mpsc::unbounded_channel::<ActivityDecidedEvent>();
    let user_repo = UserRepository::new(db_pool);

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            deliver(&user_repo, &email_service, event).await;
        }
        info!("Notification worker stopped");
    });

    ActivityNotifier { tx }
}

async fn deliver(user_repo: &UserRepository, email_service: &EmailService, event: ActivityDecidedEvent) {
    let responsible = match user_repo.find_by_id(event.responsible_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(
                activity_id = %event.activity_id,
                responsible_id = %event.responsible_id,
                "Responsible user not found, notification skipped"
            );
            return;
        }
        Err(e) => {
            warn!(
                activity_id = %event.activity_id,
                error = %e,
                "Failed to load responsible user, notification skipped"
            );
            return;
        }
    };

    match email_service
        .send_activity_decision_email(
            &responsible.email,
            &responsible.full_name(),
            &event.activity_name,
            event.decision.display_name(),
            &event.comments,
        )
        .await
    {
        Ok(()) => {
            info!(
                activity_id = %event.activity_id,
                user_id = %responsible.id,
                decision = %event.decision,
                "Activity decision notification sent"
            );
        }
        Err(e) => {
            warn!(
                activity_id = %event.activity_id,
                user_id = %responsible.id,
                error = %e,
                "Failed to send activity decision email"
            );
        }
    }
}
