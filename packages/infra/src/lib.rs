//! # CardCheck インフラ層
//!
//! 外部システム（SMTP サーバー）との通信を担当する。
//!
//! ## 設計方針
//!
//! ドメイン層で定義された [`EmailMessage`](cardcheck_domain::notification::EmailMessage) を
//! 受け取り、具体的な送信手段をカプセル化する。API 層は
//! [`NotificationSender`](notification::NotificationSender) trait にのみ依存する。
//!
//! ## モジュール構成
//!
//! - [`notification`] - メール送信（SMTP / Noop / Recording）

pub mod notification;

pub use notification::NotificationSender;
