// plan-backend/src/utils/email.rs
#![allow(dead_code)]

use crate::error::{AppError, AppResult};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use tracing::{error, info};

/// メール送信エラー
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP configuration error: {0}")]
    ConfigurationError(String),

    #[error("Failed to send email: {0}")]
    SendError(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Missing email configuration")]
    MissingConfiguration,
}

/// メール設定
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP サーバーホスト
    pub smtp_host: String,
    /// SMTP サーバーポート
    pub smtp_port: u16,
    /// SMTP ユーザー名
    pub smtp_username: String,
    /// SMTP パスワード
    pub smtp_password: String,
    /// 送信者メールアドレス
    pub from_email: String,
    /// 送信者名
    pub from_name: String,
    /// TLS を使用するか
    pub use_tls: bool,
    /// 開発モードかどうか（ログ出力のみ）
    pub development_mode: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: "user".to_string(),
            smtp_password: "password".to_string(),
            from_email: "noreply@example.com".to_string(),
            from_name: "OrgPlan".to_string(),
            use_tls: true,
            development_mode: true, // 開発環境ではデフォルトで true
        }
    }
}

impl EmailConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, EmailError> {
        let development_mode = env::var("EMAIL_DEVELOPMENT_MODE")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        // 開発モードの場合はデフォルト設定を返す
        if development_mode {
            return Ok(Self {
                development_mode: true,
                ..Default::default()
            });
        }

        // 本番環境の設定
        let smtp_host = env::var("SMTP_HOST").map_err(|_| EmailError::MissingConfiguration)?;

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .map_err(|_| EmailError::ConfigurationError("Invalid SMTP port".to_string()))?;

        let smtp_username =
            env::var("SMTP_USERNAME").map_err(|_| EmailError::MissingConfiguration)?;

        let smtp_password =
            env::var("SMTP_PASSWORD").map_err(|_| EmailError::MissingConfiguration)?;

        let from_email = env::var("FROM_EMAIL").map_err(|_| EmailError::MissingConfiguration)?;

        let from_name = env::var("FROM_NAME").unwrap_or_else(|_| "OrgPlan".to_string());

        let use_tls = env::var("SMTP_USE_TLS")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_email,
            from_name,
            use_tls,
            development_mode: false,
        })
    }

    /// 設定の検証
    pub fn validate(&self) -> Result<(), EmailError> {
        if self.development_mode {
            return Ok(()); // 開発モードでは検証をスキップ
        }

        if self.smtp_host.is_empty() {
            return Err(EmailError::ConfigurationError(
                "SMTP host is required".to_string(),
            ));
        }

        if self.smtp_username.is_empty() {
            return Err(EmailError::ConfigurationError(
                "SMTP username is required".to_string(),
            ));
        }

        if self.smtp_password.is_empty() {
            return Err(EmailError::ConfigurationError(
                "SMTP password is required".to_string(),
            ));
        }

        if self.from_email.is_empty() {
            return Err(EmailError::ConfigurationError(
                "From email is required".to_string(),
            ));
        }

        // メールアドレスの形式チェック
        if !is_valid_email(&self.from_email) {
            return Err(EmailError::InvalidAddress(self.from_email.clone()));
        }

        Ok(())
    }
}

/// メールテンプレート
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// テンプレート名
    pub name: String,
    /// 件名
    pub subject: String,
    /// HTMLボディ
    pub html_body: String,
    /// テキストボディ
    pub text_body: String,
}

/// メール送信内容
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 宛先メールアドレス
    pub to_email: String,
    /// 宛先名
    pub to_name: Option<String>,
    /// 件名
    pub subject: String,
    /// HTMLボディ
    pub html_body: String,
    /// テキストボディ
    pub text_body: String,
}

/// メール送信サービス
pub struct EmailService {
    config: EmailConfig,
    // 開発モードでは None（ログ出力のみ）
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl EmailService {
    /// 新しいEmailServiceを作成
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        config.validate()?;

        let mailer = if config.development_mode {
            None
        } else {
            let credentials = Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            );

            let builder = if config.use_tls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| EmailError::ConfigurationError(e.to_string()))?
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            };

            Some(
                builder
                    .port(config.smtp_port)
                    .credentials(credentials)
                    .build(),
            )
        };

        Ok(Self { config, mailer })
    }

    /// 環境変数から設定を読み込んでEmailServiceを作成
    pub fn from_env() -> Result<Self, EmailError> {
        let config = EmailConfig::from_env()?;
        Self::new(config)
    }

    /// メールを送信
    pub async fn send_email(&self, message: EmailMessage) -> AppResult<()> {
        // メールアドレスの検証
        if !is_valid_email(&message.to_email) {
            return Err(AppError::ValidationError(format!(
                "Invalid email address: {}",
                message.to_email
            )));
        }

        let Some(mailer) = &self.mailer else {
            // 開発モードではログ出力のみ
            self.log_email(&message);
            return Ok(());
        };

        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| {
                AppError::InternalServerError(format!("Invalid from address: {}", e))
            })?;

        let to: Mailbox = match &message.to_name {
            Some(name) => format!("{} <{}>", name, message.to_email).parse(),
            None => message.to_email.parse(),
        }
        .map_err(|e| AppError::ValidationError(format!("Invalid email address: {}", e)))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|e| AppError::InternalServerError(format!("Failed to build email: {}", e)))?;

        mailer.send(email).await.map_err(|e| {
            error!(
                to_email = %mask_email(&message.to_email),
                error = %e,
                "Failed to send email"
            );
            AppError::InternalServerError(format!("Failed to send email: {}", e))
        })?;

        info!(
            to_email = %mask_email(&message.to_email),
            subject = %message.subject,
            "Email sent successfully"
        );

        Ok(())
    }

    /// 活動の承認結果メールを送信
    pub async fn send_activity_decision_email(
        &self,
        to_email: &str,
        to_name: &str,
        activity_name: &str,
        decision: &str,
        comments: &str,
    ) -> AppResult<()> {
        let template = self.get_activity_decision_template(to_name, activity_name, decision, comments);

        let message = EmailMessage {
            to_email: to_email.to_string(),
            to_name: Some(to_name.to_string()),
            subject: template.subject,
            html_body: template.html_body,
            text_body: template.text_body,
        };

        self.send_email(message).await
    }

    /// 開発モードでのメールログ出力
    fn log_email(&self, message: &EmailMessage) {
        info!("📧 EMAIL (Development Mode)");
        info!(
            "To: {} <{}>",
            message.to_name.as_deref().unwrap_or(""),
            message.to_email
        );
        info!("Subject: {}", message.subject);
        info!("--- Text Body ---");
        info!("{}", message.text_body);
        info!("--- End Email ---");
    }

    // --- テンプレートメソッド ---

    /// 活動承認結果テンプレート
    fn get_activity_decision_template(
        &self,
        name: &str,
        activity_name: &str,
        decision: &str,
        comments: &str,
    ) -> EmailTemplate {
        let subject = format!("Activity {}: {} - OrgPlan", decision, activity_name);

        let comments_text = if comments.trim().is_empty() {
            "(no comments)".to_string()
        } else {
            comments.to_string()
        };

        let html_body = format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <meta charset="utf-8">
                <title>Activity Decision</title>
            </head>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h1 style="color: #007bff;">Activity {decision}</h1>
                    <p>Hello {name},</p>
                    <p>An approver has recorded a decision on an activity you are responsible for.</p>
                    <div style="background-color: #f8f9fa; padding: 15px; border-left: 4px solid #007bff; margin: 20px 0;">
                        <strong>Activity:</strong> {activity_name}<br>
                        <strong>Decision:</strong> {decision}<br>
                        <strong>Comments:</strong> {comments}
                    </div>
                    <p>You can review the details in the annual plan dashboard.</p>
                    <hr style="margin: 30px 0; border: none; border-top: 1px solid #eee;">
                    <p style="font-size: 12px; color: #666;">
                        OrgPlan - Annual Plan Management System
                    </p>
                </div>
            </body>
            </html>
            "#,
            name = name,
            activity_name = activity_name,
            decision = decision,
            comments = comments_text
        );

        let text_body = format!(
            r#"
Activity {decision} - OrgPlan

Hello {name},

An approver has recorded a decision on an activity you are responsible for.

Activity: {activity_name}
Decision: {decision}
Comments: {comments}

You can review the details in the annual plan dashboard.

---
OrgPlan - Annual Plan Management System
            "#,
            name = name,
            activity_name = activity_name,
            decision = decision,
            comments = comments_text
        );

        EmailTemplate {
            name: "activity_decision".to_string(),
            subject,
            html_body,
            text_body,
        }
    }
}

// --- ユーティリティ関数 ---

/// 簡単なメールアドレス検証
fn is_valid_email(email: &str) -> bool {
    if email.is_empty() {
        return false;
    }

    // @が一つだけあること
    let at_count = email.matches('@').count();
    if at_count != 1 {
        return false;
    }

    // @で分割
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local, domain) = (parts[0], parts[1]);

    // ローカル部とドメイン部が空でないこと
    if local.is_empty() || domain.is_empty() {
        return false;
    }

    // ドメイン部に.が含まれること
    if !domain.contains('.') {
        return false;
    }

    // ドメイン部が.で始まったり終わったりしないこと
    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    true
}

/// メールアドレスをマスク
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = if local.len() <= 2 {
            "*".repeat(local.len())
        } else {
            format!("{}****", &local[..1])
        };
        format!("{}{}", masked_local, domain)
    } else {
        "****@****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("user.name@domain.co.jp"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("test@"));
        assert!(!is_valid_email("test"));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("test@example.com"), "t****@example.com");
        assert_eq!(mask_email("ab@example.com"), "**@example.com");
        assert_eq!(mask_email("a@example.com"), "*@example.com");
        assert_eq!(mask_email("invalid"), "****@****");
    }

    #[tokio::test]
    async fn test_email_service_development_mode() {
        let config = EmailConfig {
            development_mode: true,
            ..Default::default()
        };

        let email_service = EmailService::new(config).unwrap();

        let message = EmailMessage {
            to_email: "test@example.com".to_string(),
            to_name: Some("Test User".to_string()),
            subject: "Test Subject".to_string(),
            html_body: "<p>Test HTML</p>".to_string(),
            text_body: "Test Text".to_string(),
        };

        // 開発モードではエラーが発生しない
        let result = email_service.send_email(message).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected() {
        let email_service = EmailService::new(EmailConfig::default()).unwrap();

        let message = EmailMessage {
            to_email: "not-an-address".to_string(),
            to_name: None,
            subject: "Test".to_string(),
            html_body: String::new(),
            text_body: String::new(),
        };

        assert!(email_service.send_email(message).await.is_err());
    }

    #[test]
    fn test_activity_decision_template() {
        let email_service = EmailService::new(EmailConfig::default()).unwrap();

        let template = email_service.get_activity_decision_template(
            "Maria Ruiz",
            "Safety training",
            "Approved",
            "Looks good",
        );

        assert_eq!(template.name, "activity_decision");
        assert!(template.subject.contains("Approved"));
        assert!(template.text_body.contains("Safety training"));
        assert!(template.text_body.contains("Looks good"));

        // コメントが空の場合はプレースホルダを使う
        let empty = email_service.get_activity_decision_template(
            "Maria Ruiz",
            "Safety training",
            "Rejected",
            "  ",
        );
        assert!(empty.text_body.contains("(no comments)"));
    }
}
