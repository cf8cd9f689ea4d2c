//! # CardCheck API サーバー
//!
//! ギフトカード検証リクエストを受け付け、管理者にメールで中継する HTTP サービス。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 説明 |
//! |---------|------|------|
//! | GET | `/api/health` | ヘルスチェック |
//! | GET | `/api/stats` | 稼働時間・バージョン |
//! | POST | `/api/verify-card` | 検証リクエストの受付（JSON / フォーム、レート制限あり） |
//!
//! それ以外のルートには利用可能なルート一覧を含む 404 を返す。
//!
//! ## モジュール構成
//!
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`extract`] - JSON / フォームのリクエストボディ
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`middleware`] - レート制限
//! - [`usecase`] - 受付フローとメール生成
//!
//! ## 使用例
//!
//! ```rust,ignore
//! let config = AppConfig::from_env()?;
//! let app = build_app(&config, dependencies)?;
//! axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod middleware;
pub mod usecase;

use std::{sync::Arc, time::Instant};

use axum::{
    Router,
    http::{
        HeaderValue,
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::from_fn_with_state,
    routing::{get, post},
};
use cardcheck_domain::{
    clock::Clock,
    notification::NotificationError,
    reference::{RandomSource, ReferenceIdGenerator},
};
use cardcheck_infra::NotificationSender;
use cardcheck_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::AppConfig,
    handler::{
        SystemState,
        VerificationState,
        health_check,
        not_found,
        stats,
        verify_card,
    },
    middleware::{RateLimitState, RateLimiter, rate_limit},
    usecase::{TemplateRenderer, VerificationService, VerificationSettings},
};

/// 外部から注入する依存
///
/// 本番では SMTP 送信・システム時刻・スレッド乱数、テストでは記録用送信・固定時刻・固定乱数を渡す。
pub struct AppDependencies {
    pub sender:       Arc<dyn NotificationSender>,
    pub clock:        Arc<dyn Clock>,
    pub random:       Arc<dyn RandomSource>,
    pub rate_limiter: RateLimiter,
}

/// ルーターを構築する
///
/// レイヤーはリクエスト到着順に
/// `SetRequestId → Trace → PropagateRequestId → CORS → ルート` の順で適用される。
pub fn build_app(config: &AppConfig, deps: AppDependencies) -> Result<Router, NotificationError> {
    let renderer = TemplateRenderer::new(config.notification.site_url.clone())?;
    let service = VerificationService::new(
        deps.sender,
        renderer,
        ReferenceIdGenerator::new(deps.clock.clone(), deps.random),
        deps.clock.clone(),
        VerificationSettings {
            admin_address:    config.notification.admin_address.clone(),
            default_language: config.default_language,
        },
    );

    let system_state = Arc::new(SystemState {
        clock:       deps.clock,
        started_at:  Instant::now(),
        environment: config.environment.clone(),
    });
    let verification_state = Arc::new(VerificationState { service });
    let rate_limit_state = RateLimitState {
        limiter:     deps.rate_limiter,
        trust_proxy: config.rate_limit.trust_proxy,
    };

    // レート制限は POST のみに掛け、未対応メソッドのフォールバックには掛けない
    let verification_routes = Router::new()
        .route(
            "/api/verify-card",
            post(verify_card).route_layer(from_fn_with_state(rate_limit_state, rate_limit)),
        )
        .with_state(verification_state);

    Ok(Router::new()
        .route("/api/health", get(health_check))
        .route("/api/stats", get(stats))
        .with_state(system_state)
        .merge(verification_routes)
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(cors_layer(&config.cors.allowed_origins))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7)))
}

/// 許可リスト方式の CORS レイヤー
///
/// ヘッダー値として不正なオリジンは警告して除外する。
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|e| tracing::warn!(%origin, error = %e, "不正な CORS オリジンを無視"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
