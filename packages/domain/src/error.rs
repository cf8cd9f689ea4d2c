//! # ドメイン層エラー定義
//!
//! 受信ペイロードが受付条件を満たさない場合のエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `MissingFields` | 400 Bad Request | フォールバック解決後も必須項目がない |
//! | `Validation` | 400 Bad Request | ペイロードの形が不正（オブジェクトでない等） |
//!
//! ## 使用例
//!
//! ```rust
//! use cardcheck_domain::DomainError;
//!
//! let error = DomainError::MissingFields {
//!     fields:   vec!["email"],
//!     received: serde_json::json!({ "amount": 50 }),
//! };
//! assert_eq!(error.to_string(), "必須項目が不足しています: email");
//! ```

use serde_json::Value;
use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// 参照 ID は正規化成功後にのみ採番されるため、このエラーには参照 ID が含まれない。
#[derive(Debug, Error)]
pub enum DomainError {
    /// 必須項目の不足
    ///
    /// `received` には受信したペイロードをそのまま保持し、
    /// エラーレスポンスとログでデバッグに使う。
    #[error("必須項目が不足しています: {}", .fields.join(", "))]
    MissingFields {
        /// 不足している正規化後のフィールド名（`email`, `amount`）
        fields:   Vec<&'static str>,
        /// 受信したペイロード
        received: Value,
    },

    /// バリデーションエラー
    ///
    /// ペイロードが JSON オブジェクトでない場合など、項目単位の判定ができないときに使う。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
