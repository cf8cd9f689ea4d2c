//! # ルーター全体の統合テスト
//!
//! ヘルスチェック、未定義ルート、Request ID、CORS を検証する。

mod common;

use axum::{
    body::Body,
    http::{
        Method,
        Request,
        StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_REQUEST_METHOD,
            ORIGIN,
        },
    },
};
use common::{body_json, get, now, test_app};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn ヘルスチェックはokを返す() {
    let response = test_app().router.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "status": "OK",
            "timestamp": now(),
            "service": "cardcheck-api",
            "version": env!("CARGO_PKG_VERSION")
        })
    );
}

#[tokio::test]
async fn statsは実行環境を返す() {
    let response = test_app().router.oneshot(get("/api/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["environment"], json!("test"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    assert!(body["uptime"].is_u64());
}

#[rstest]
#[case(Method::GET, "/api/unknown")]
#[case(Method::GET, "/")]
#[case(Method::GET, "/api/verify-card")]
#[case(Method::DELETE, "/api/health")]
#[tokio::test]
async fn 未定義のルートは利用可能なルート一覧付きの404(#[case] method: Method, #[case] uri: &str) {
    let app = test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "Route non trouvée",
            "availableRoutes": ["GET /api/health", "GET /api/stats", "POST /api/verify-card"]
        })
    );
    assert_eq!(app.sender.attempts(), 0);
}

#[tokio::test]
async fn レスポンスにuuid_v7のrequest_idが付く() {
    let response = test_app().router.oneshot(get("/api/health")).await.unwrap();

    let request_id = response.headers()["x-request-id"].to_str().unwrap();
    let uuid = Uuid::parse_str(request_id).unwrap();
    assert_eq!(uuid.get_version_num(), 7);
}

#[tokio::test]
async fn クライアント提供のrequest_idはそのまま返す() {
    let response = test_app()
        .router
        .oneshot(
            Request::builder()
                .uri("/api/unknown")
                .header("x-request-id", "client-request-id-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "client-request-id-123");
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/verify-card")
        .header(ORIGIN, origin)
        .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn 許可オリジンのプリフライトは資格情報付きで許可する() {
    let response = test_app()
        .router
        .oneshot(preflight("https://checkcardpro.com"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://checkcardpro.com"
    );
    assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn 許可されていないオリジンにはcorsヘッダーを付けない() {
    let response = test_app()
        .router
        .oneshot(preflight("https://evil.example"))
        .await
        .unwrap();

    assert!(
        !response
            .headers()
            .contains_key(ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
