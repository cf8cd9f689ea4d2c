//! # 未定義ルートのフォールバック
//!
//! 未定義のパス、および定義済みパスへの未対応メソッドに 404 を返す。

use axum::http::{Method, Uri};

use crate::error::ApiError;

/// 公開しているルート一覧（404 レスポンスに含める）
pub const AVAILABLE_ROUTES: &[&str] = &["GET /api/health", "GET /api/stats", "POST /api/verify-card"];

/// フォールバックハンドラ
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    tracing::debug!(%method, %uri, "未定義のルートへのリクエスト");
    ApiError::NotFound
}
