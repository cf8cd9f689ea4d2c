//! # ユースケース層
//!
//! 検証リクエストの受付フローを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: 送信・時刻・乱数を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - [`notification`]: 通知メールの生成
//! - [`verification`]: 正規化 → 採番 → メール生成 → 送信の統合サービス

pub mod notification;
pub mod verification;

pub use notification::TemplateRenderer;
pub use verification::{SubmissionStage, VerificationReceipt, VerificationService, VerificationSettings};
