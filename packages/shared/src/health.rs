//! # ヘルスチェック・統計の共通型
//!
//! `GET /api/health` と `GET /api/stats` が返すレスポンス型を提供する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// ## 使用例
///
/// ```
/// use cardcheck_shared::HealthResponse;
///
/// let response = HealthResponse::ok("cardcheck-api", "0.1.0", chrono::Utc::now());
/// assert_eq!(response.status, "OK");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 稼働状態（常に `"OK"`）
    pub status:    String,
    pub timestamp: DateTime<Utc>,
    /// サービス名
    pub service:   String,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version:   String,
}

impl HealthResponse {
    pub fn ok(service: impl Into<String>, version: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            status:    "OK".to_string(),
            timestamp: now,
            service:   service.into(),
            version:   version.into(),
        }
    }
}

/// プロセス統計レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    /// プロセス起動からの経過秒数
    pub uptime:      u64,
    pub version:     String,
    /// 実行環境（`development` / `production` 等）
    pub environment: String,
    pub timestamp:   DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_health_responseのserializeで正しいjson形状にする() {
        let response = HealthResponse::ok("cardcheck-api", "0.1.0", fixed_now());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            json!({
                "status": "OK",
                "timestamp": "2026-10-16T09:30:00Z",
                "service": "cardcheck-api",
                "version": "0.1.0"
            })
        );
    }

    #[test]
    fn test_stats_responseのserializeで正しいjson形状にする() {
        let response = StatsResponse {
            uptime:      42,
            version:     "0.1.0".to_string(),
            environment: "production".to_string(),
            timestamp:   fixed_now(),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["uptime"], 42);
        assert_eq!(json["environment"], "production");
        assert_eq!(json["timestamp"], "2026-10-16T09:30:00Z");
    }
}
