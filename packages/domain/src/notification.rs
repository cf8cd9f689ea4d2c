//! # 通知
//!
//! 管理者メールボックスへ送る通知メールのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **送信は 1 回のみ**: 送信失敗はリトライもキューイングもせず、呼び出し元にエラーを返す
//! - **テンプレート分離**: メール生成（TemplateRenderer）は api クレート、送信は infra クレート

use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// 送信に必要な設定（宛先・認証情報）がない
    #[error("通知設定が不足しています: {0}")]
    NotConfigured(String),
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス（管理者メールボックス）
    pub to:        String,
    /// 返信先（クライアントのメールアドレス）
    pub reply_to:  Option<String>,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}
