//! 統合テスト共通のルーター構築ヘルパー

#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header::CONTENT_TYPE},
};
use cardcheck_api::{AppDependencies, build_app, config::AppConfig, middleware::RateLimiter};
use cardcheck_domain::{clock::FixedClock, reference::SequenceRandomSource};
use cardcheck_infra::notification::RecordingNotificationSender;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

pub const ADMIN_EMAIL: &str = "admin@checkcardpro.com";

/// `FixedClock` の時刻と `[10, 11, 12, 1]` の乱数から採番される参照 ID
pub const EXPECTED_REFERENCE: &str = "VFMVARO4W0ABC1";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub sender: RecordingNotificationSender,
}

/// 既定の設定（通知先あり、プロキシ信頼）で構築する
pub fn test_app() -> TestApp {
    test_app_with(RecordingNotificationSender::new(), &[])
}

/// 送信者と追加の環境変数を指定して構築する
pub fn test_app_with(sender: RecordingNotificationSender, overrides: &[(&str, &str)]) -> TestApp {
    let mut vars: HashMap<String, String> = [
        ("ADMIN_EMAIL", ADMIN_EMAIL),
        ("TRUST_PROXY", "true"),
        ("ENVIRONMENT", "test"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in overrides {
        vars.insert((*k).to_string(), (*v).to_string());
    }
    let config = AppConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();

    let router = build_app(
        &config,
        AppDependencies {
            sender:       Arc::new(sender.clone()),
            clock:        Arc::new(FixedClock::new(now())),
            random:       Arc::new(SequenceRandomSource::new(vec![10, 11, 12, 1])),
            rate_limiter: RateLimiter::new(
                config.rate_limit.max_requests,
                Duration::from_secs(900),
            ),
        },
    )
    .unwrap();

    TestApp { router, sender }
}

pub fn post_json(body: &Value) -> Request<Body> {
    post_raw(&body.to_string())
}

pub fn post_raw(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/verify-card")
        .header(CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "203.0.113.7")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/verify-card")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-forwarded-for", "203.0.113.7")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
