//! # 検証リクエスト受付サービス
//!
//! 1 件のリクエストを次の段階で処理する。
//!
//! ```text
//! Received → Normalized → Formatted → Sent → Acknowledged
//!     │           │            │        │
//!     └───────────┴────────────┴────────┴──→ Failed（エラーレスポンス）
//! ```
//!
//! - 正規化に失敗した場合は参照 ID を採番しない
//! - メール送信は 1 リクエストにつき 1 回だけ試行し、リトライしない
//! - 参照 ID は送信に成功した場合のみクライアントに返す

use std::sync::Arc;

use cardcheck_domain::{
    clock::Clock,
    language::Language,
    notification::NotificationError,
    reference::{ReferenceId, ReferenceIdGenerator},
    request::normalize,
    DomainError,
};
use cardcheck_infra::notification::NotificationSender;
use cardcheck_shared::{
    event_log::{error, event},
    log_business_event,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use strum::Display;

use super::TemplateRenderer;
use crate::error::ApiError;

/// 受付処理の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionStage {
    Received,
    Normalized,
    Formatted,
    Sent,
    Acknowledged,
}

/// 受付サービスの設定
#[derive(Debug, Clone)]
pub struct VerificationSettings {
    /// 通知先アドレス
    pub admin_address:    Option<String>,
    /// `language` が未指定・未対応の場合の言語
    pub default_language: Language,
}

/// 受付完了時に返す情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReceipt {
    pub reference:    ReferenceId,
    pub submitted_at: DateTime<Utc>,
}

/// 検証リクエスト受付サービス
///
/// 状態を持たないため、複数のリクエストから `Arc` で共有する。
pub struct VerificationService {
    sender:     Arc<dyn NotificationSender>,
    renderer:   TemplateRenderer,
    references: ReferenceIdGenerator,
    clock:      Arc<dyn Clock>,
    settings:   VerificationSettings,
}

impl VerificationService {
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        renderer: TemplateRenderer,
        references: ReferenceIdGenerator,
        clock: Arc<dyn Clock>,
        settings: VerificationSettings,
    ) -> Self {
        Self {
            sender,
            renderer,
            references,
            clock,
            settings,
        }
    }

    /// リクエストを受け付け、管理者にメールを送信する
    pub async fn submit(&self, payload: &Value) -> Result<VerificationReceipt, ApiError> {
        tracing::debug!(stage = %SubmissionStage::Received, "検証リクエストを受信");

        let request = normalize(payload, self.settings.default_language).inspect_err(|e| {
            let missing_fields = match e {
                DomainError::MissingFields { fields, .. } => fields.join(","),
                DomainError::Validation(_) => String::new(),
            };
            log_business_event!(
                event.category = event::category::VERIFICATION,
                event.action = event::action::VERIFICATION_REJECTED,
                event.result = event::result::FAILURE,
                error.category = error::category::INPUT,
                error.kind = error::kind::VALIDATION,
                missing_fields = %missing_fields,
                error = %e,
                "検証リクエストを拒否"
            );
        })?;

        let reference = self.references.generate();
        let submitted_at = self.clock.now();
        tracing::debug!(
            stage = %SubmissionStage::Normalized,
            reference = %reference,
            "検証リクエストを正規化"
        );
        log_business_event!(
            event.category = event::category::VERIFICATION,
            event.action = event::action::VERIFICATION_RECEIVED,
            event.result = event::result::SUCCESS,
            event.reference = %reference,
            verification.card_type = request.card_type.as_deref().unwrap_or_default(),
            verification.amount = %request.amount_label(),
            verification.language = request.language.code(),
            "検証リクエストを受付"
        );

        let email = self
            .settings
            .admin_address
            .as_deref()
            .ok_or_else(|| NotificationError::NotConfigured("通知先アドレスが未設定です".to_string()))
            .and_then(|recipient| {
                self.renderer
                    .render(&request, &reference, submitted_at, recipient)
            })
            .map_err(|e| self.notification_failed(&reference, SubmissionStage::Formatted, e))?;
        tracing::debug!(
            stage = %SubmissionStage::Formatted,
            reference = %reference,
            subject = %email.subject,
            "通知メールを生成"
        );

        self.sender
            .send_email(&email)
            .await
            .map_err(|e| self.notification_failed(&reference, SubmissionStage::Sent, e))?;

        log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::NOTIFICATION_SENT,
            event.result = event::result::SUCCESS,
            event.reference = %reference,
            notification.recipient = %email.to,
            "通知メール送信成功"
        );
        tracing::debug!(
            stage = %SubmissionStage::Acknowledged,
            reference = %reference,
            "検証リクエストの受付完了"
        );

        Ok(VerificationReceipt {
            reference,
            submitted_at,
        })
    }

    /// 通知段階の失敗を記録し、API エラーに変換する
    fn notification_failed(
        &self,
        reference: &ReferenceId,
        stage: SubmissionStage,
        e: NotificationError,
    ) -> ApiError {
        let kind = match e {
            NotificationError::TemplateFailed(_) => error::kind::TEMPLATE,
            NotificationError::SendFailed(_) | NotificationError::NotConfigured(_) => {
                error::kind::MAIL_TRANSPORT
            }
        };
        tracing::error!(
            error.category = error::category::EXTERNAL_SERVICE,
            error.kind = kind,
            stage = %stage,
            reference = %reference,
            error = %e,
            "通知メールの処理に失敗"
        );
        log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::NOTIFICATION_FAILED,
            event.result = event::result::FAILURE,
            event.reference = %reference,
            "通知メール送信失敗"
        );
        ApiError::Notification(e)
    }
}
