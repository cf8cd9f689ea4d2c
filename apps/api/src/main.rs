//! # CardCheck API サーバー
//!
//! ギフトカード検証リクエストを受け付け、管理者にメールで中継する。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（Mailpit 等のローカル SMTP）
//! SMTP_HOST=localhost SMTP_PORT=1025 SMTP_TLS=false cargo run -p cardcheck-api
//!
//! # SMTP を使わない場合
//! NOTIFICATION_BACKEND=noop cargo run -p cardcheck-api
//! ```
//!
//! 環境変数の一覧は [`cardcheck_api::config`] を参照。

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use cardcheck_api::{
    AppDependencies,
    build_app,
    config::{AppConfig, NotificationBackend},
    handler::health::SERVICE_NAME,
    middleware::RateLimiter,
};
use cardcheck_domain::{clock::SystemClock, reference::ThreadRngSource};
use cardcheck_infra::{
    NotificationSender,
    notification::{NoopNotificationSender, SmtpNotificationSender},
};
use cardcheck_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在しなくてもエラーにしない）
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env(SERVICE_NAME));
    let _app_span = tracing::info_span!("app", service = SERVICE_NAME).entered();

    let config = AppConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "CardCheck API を起動します: {}:{} (environment: {})",
        config.server.host,
        config.server.port,
        config.environment
    );

    let sender: Arc<dyn NotificationSender> = match config.notification.backend {
        NotificationBackend::Smtp => {
            tracing::info!(
                host = %config.notification.smtp.host,
                port = config.notification.smtp.port,
                "通知バックエンド: SMTP"
            );
            Arc::new(
                SmtpNotificationSender::new(&config.notification.smtp)
                    .context("SMTP 送信の初期化に失敗しました")?,
            )
        }
        NotificationBackend::Noop => {
            tracing::info!("通知バックエンド: Noop（メールは送信されません）");
            Arc::new(NoopNotificationSender)
        }
    };

    if config.notification.admin_address.is_none() {
        tracing::warn!(
            "通知先アドレスが未設定です（ADMIN_EMAIL / EMAIL_USER）。検証リクエストは 500 になります"
        );
    }

    let rate_limiter = RateLimiter::new(
        config.rate_limit.max_requests,
        config.rate_limit.window,
    );
    let _cleanup = rate_limiter.spawn_cleanup();

    let app = build_app(
        &config,
        AppDependencies {
            sender,
            clock: Arc::new(SystemClock),
            random: Arc::new(ThreadRngSource),
            rate_limiter,
        },
    )
    .context("ルーターの構築に失敗しました")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("CardCheck API が起動しました: {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
