//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **実装**: SMTP（本番 / Mailpit 開発用）、Noop（送信無効化）、Recording（テスト用）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **リトライなし**: 送信失敗はそのまま呼び出し元に返す

mod noop;
#[cfg(any(test, feature = "test-utils"))]
mod recording;
mod smtp;

use async_trait::async_trait;
use cardcheck_domain::notification::{EmailMessage, NotificationError};
pub use noop::NoopNotificationSender;
#[cfg(any(test, feature = "test-utils"))]
pub use recording::RecordingNotificationSender;
pub use smtp::{SmtpNotificationSender, SmtpSettings};

/// メール送信トレイト
///
/// 検証リクエスト 1 件につき 1 回だけ呼ばれる。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
