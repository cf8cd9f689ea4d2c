//! # CardCheck 共有ユーティリティ
//!
//! API サーバーと各パッケージで共通して使用するレスポンス型・ログ基盤を提供する。
//!
//! ## 設計方針
//!
//! - domain / infra / api のいずれからも依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は持たない（`IntoResponse` 変換は API 層の責務）

pub mod error_response;
pub mod event_log;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::{HealthResponse, StatsResponse};
