//! # テスト用 Recording 通知送信
//!
//! 送信されたメールをメモリに記録する。失敗モードでは毎回 `SendFailed` を返す。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! cardcheck-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use cardcheck_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationSender {
    sent:      Arc<Mutex<Vec<EmailMessage>>>,
    attempts:  Arc<Mutex<usize>>,
    fail_with: Option<String>,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に送信失敗を返す送信者
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// 送信に成功したメール
    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 失敗を含む送信試行回数
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        *self.attempts.lock().unwrap_or_else(PoisonError::into_inner) += 1;

        if let Some(reason) = &self.fail_with {
            return Err(NotificationError::SendFailed(reason.clone()));
        }

        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email.clone());
        Ok(())
    }
}
