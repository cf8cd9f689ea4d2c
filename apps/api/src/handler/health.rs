//! # ヘルスチェック・統計ハンドラ
//!
//! ロードバランサーや監視システムからの死活監視に使う。
//! 外部サービス（SMTP）への接続は確認せず、プロセス自体の状態のみを返す。
//!
//! ```text
//! $ curl http://localhost:3001/api/health
//! {"status":"OK","timestamp":"2026-10-16T09:30:00Z","service":"cardcheck-api","version":"0.1.0"}
//! ```

use std::{sync::Arc, time::Instant};

use axum::{Json, extract::State};
use cardcheck_domain::clock::Clock;
use cardcheck_shared::{HealthResponse, StatsResponse};

/// サービス名
pub const SERVICE_NAME: &str = "cardcheck-api";

/// プロセス情報ハンドラの共有状態
pub struct SystemState {
    pub clock:       Arc<dyn Clock>,
    /// プロセス起動時刻
    pub started_at:  Instant,
    pub environment: String,
}

/// `GET /api/health`
///
/// 常に 200 OK を返す。
pub async fn health_check(State(state): State<Arc<SystemState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
        state.clock.now(),
    ))
}

/// `GET /api/stats`
pub async fn stats(State(state): State<Arc<SystemState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        uptime:      state.started_at.elapsed().as_secs(),
        version:     env!("CARGO_PKG_VERSION").to_string(),
        environment: state.environment.clone(),
        timestamp:   state.clock.now(),
    })
}
