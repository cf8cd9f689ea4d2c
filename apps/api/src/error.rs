//! # API エラー定義
//!
//! API で発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンスボディは常に [`ErrorResponse`] のエンベロープ（`success: false`）。
//! 内部エラーの詳細はクライアントに返さず、ログにのみ残す。
//!
//! | エラー種別 | HTTP ステータス |
//! |-----------|----------------|
//! | `MissingFields` / `Validation` / `BadRequest` | 400 Bad Request |
//! | `NotFound` | 404 Not Found |
//! | `RateLimited` | 429 Too Many Requests（`Retry-After` 付き） |
//! | `Notification` | 500 Internal Server Error |

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use cardcheck_domain::{DomainError, notification::NotificationError};
use cardcheck_shared::ErrorResponse;
use serde_json::Value;
use thiserror::Error;

use crate::handler::AVAILABLE_ROUTES;

/// API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 必須項目の不足
    #[error("必須項目が不足しています: {}", .fields.join(", "))]
    MissingFields {
        fields:   Vec<&'static str>,
        received: Value,
    },

    /// ペイロードの形が不正
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// JSON として解釈できないボディ
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 存在しないルート
    #[error("ルートが見つかりません")]
    NotFound,

    /// レート制限超過
    #[error("レート制限を超過しました（{retry_after_secs} 秒後に再試行可能）")]
    RateLimited { retry_after_secs: u64 },

    /// メールの組み立て・送信の失敗
    #[error("通知エラー: {0}")]
    Notification(#[from] NotificationError),
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::MissingFields { fields, received } => {
                Self::MissingFields { fields, received }
            }
            DomainError::Validation(msg) => Self::Validation(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingFields { fields, received } => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::missing_fields(
                    fields.into_iter().map(str::to_string).collect(),
                    received,
                )),
            )
                .into_response(),
            ApiError::Validation(_) | ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request())).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::not_found(
                    AVAILABLE_ROUTES.iter().map(|r| (*r).to_string()).collect(),
                )),
            )
                .into_response(),
            ApiError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, HeaderValue::from(retry_after_secs))],
                Json(ErrorResponse::too_many_requests(retry_after_secs)),
            )
                .into_response(),
            ApiError::Notification(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response(),
        }
    }
}
