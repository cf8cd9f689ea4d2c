//! # レート制限ミドルウェア
//!
//! クライアント IP ごとのスライディングウィンドウでリクエスト数を制限する。
//! `POST /api/verify-card` にのみ適用する。
//!
//! 状態はプロセス内のみで保持し、再起動で消える。
//! 複数インスタンス間では共有しない。
//!
//! ## クライアント IP の決定
//!
//! - `trust_proxy = true`: `X-Forwarded-For` の末尾要素（直前のプロキシが付与した接続元）
//! - それ以外: TCP 接続元アドレス（`ConnectInfo`）
//! - どちらも取れない場合は `"unknown"` を 1 クライアントとして扱う

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::error::ApiError;

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";

/// 判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    /// 制限超過。`retry_after` 経過後に最も古い記録がウィンドウから外れる
    Limited { retry_after: Duration },
}

/// スライディングウィンドウ方式のレート制限
#[derive(Debug, Clone)]
pub struct RateLimiter {
    requests:     Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    max_requests: usize,
    window:       Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// リクエストを記録し、許可するか判定する
    ///
    /// 拒否したリクエストは記録しない。
    pub async fn check(&self, client: &str) -> RateDecision {
        self.check_at(client, Instant::now()).await
    }

    async fn check_at(&self, client: &str, now: Instant) -> RateDecision {
        let mut requests = self.requests.lock().await;
        let timestamps = requests.entry(client.to_string()).or_default();

        prune(timestamps, now, self.window);

        if timestamps.len() >= self.max_requests {
            let retry_after = timestamps
                .front()
                .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.window);
            return RateDecision::Limited { retry_after };
        }

        timestamps.push_back(now);
        RateDecision::Allowed
    }

    /// ウィンドウ外の記録と空になったクライアントを削除する
    ///
    /// 定期的に呼び出してメモリ使用量を抑える。
    pub async fn cleanup(&self) {
        self.cleanup_at(Instant::now()).await;
    }

    async fn cleanup_at(&self, now: Instant) {
        let mut requests = self.requests.lock().await;
        requests.retain(|_, timestamps| {
            prune(timestamps, now, self.window);
            !timestamps.is_empty()
        });
    }

    /// 記録中のクライアント数
    pub async fn tracked_clients(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// ウィンドウごとに [`cleanup`](Self::cleanup) を実行するタスクを起動する
    pub fn spawn_cleanup(&self) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(limiter.window);
            loop {
                interval.tick().await;
                limiter.cleanup().await;
                let clients = limiter.tracked_clients().await;
                tracing::debug!(clients, "レート制限の記録を掃除");
            }
        })
    }
}

fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while timestamps
        .front()
        .is_some_and(|oldest| now.duration_since(*oldest) >= window)
    {
        timestamps.pop_front();
    }
}

/// レート制限ミドルウェアの状態
#[derive(Debug, Clone)]
pub struct RateLimitState {
    pub limiter:     RateLimiter,
    pub trust_proxy: bool,
}

/// レート制限ミドルウェア
pub async fn rate_limit(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_key(&request, state.trust_proxy);

    match state.limiter.check(&client).await {
        RateDecision::Allowed => next.run(request).await,
        RateDecision::Limited { retry_after } => {
            let retry_after_secs = ceil_secs(retry_after);
            tracing::warn!(
                client = %client,
                retry_after_secs,
                "レート制限を超過"
            );
            ApiError::RateLimited { retry_after_secs }.into_response()
        }
    }
}

/// レート制限のキーとなるクライアント IP
fn client_key(request: &Request<Body>, trust_proxy: bool) -> String {
    if trust_proxy
        && let Some(forwarded) = request
            .headers()
            .get(FORWARDED_FOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.rsplit(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    {
        return forwarded.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// 秒単位に切り上げる（`Retry-After` は整数秒）
fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
