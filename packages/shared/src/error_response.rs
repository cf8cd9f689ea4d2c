//! # エラーレスポンス
//!
//! フロントエンドに返す統一エラー形式 `{ "success": false, "error": "..." }` を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - HTTP ステータスは API 層の `ApiError` が決定する
//! - 補助フィールド（`received`, `availableRoutes` 等）は該当するエラーでのみ出力する
//! - `error` の文言はフロントエンドの表示言語（フランス語）に合わせる

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 必須項目不足時のメッセージ
pub const MSG_MISSING_FIELDS: &str = "Données manquantes";
/// 不正なリクエストボディ時のメッセージ
pub const MSG_BAD_REQUEST: &str = "Requête invalide";
/// 内部エラー時のメッセージ（詳細は返さない）
pub const MSG_INTERNAL_ERROR: &str = "Erreur serveur";
/// 未定義ルート時のメッセージ
pub const MSG_NOT_FOUND: &str = "Route non trouvée";
/// レート制限超過時のメッセージ
pub const MSG_TOO_MANY_REQUESTS: &str = "Trop de demandes, veuillez réessayer plus tard";

/// エラーレスポンス
///
/// すべてのエラーはこの形式で返す。`success` は常に `false`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success:          bool,
    pub error:            String,
    /// 不足していた正規化後のフィールド名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_fields:   Option<Vec<String>>,
    /// 受信したペイロード（バリデーションエラーのデバッグ用）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received:         Option<Value>,
    /// 利用可能なルート一覧（404 のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_routes: Option<Vec<String>>,
    /// 再試行までの秒数（429 のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after:      Option<u64>,
}

impl ErrorResponse {
    /// 汎用コンストラクタ
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success:          false,
            error:            error.into(),
            missing_fields:   None,
            received:         None,
            available_routes: None,
            retry_after:      None,
        }
    }

    /// 400 必須項目不足
    ///
    /// 受信ペイロードをそのまま `received` に含める。
    pub fn missing_fields(fields: Vec<String>, received: Value) -> Self {
        Self {
            missing_fields: Some(fields),
            received: Some(received),
            ..Self::new(MSG_MISSING_FIELDS)
        }
    }

    /// 400 不正なリクエスト
    pub fn bad_request() -> Self {
        Self::new(MSG_BAD_REQUEST)
    }

    /// 404 Not Found
    pub fn not_found(available_routes: Vec<String>) -> Self {
        Self {
            available_routes: Some(available_routes),
            ..Self::new(MSG_NOT_FOUND)
        }
    }

    /// 429 Too Many Requests
    pub fn too_many_requests(retry_after_secs: u64) -> Self {
        Self {
            retry_after: Some(retry_after_secs),
            ..Self::new(MSG_TOO_MANY_REQUESTS)
        }
    }

    /// 500 Internal Server Error
    ///
    /// error は固定値（内部情報を漏らさないため）。
    pub fn internal_error() -> Self {
        Self::new(MSG_INTERNAL_ERROR)
    }
}
