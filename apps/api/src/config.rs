//! # アプリケーション設定
//!
//! 環境変数からアプリケーション設定を読み込む。
//!
//! ## 設計方針
//!
//! [12-Factor App](https://12factor.net/ja/config) の原則に従い、
//! すべての設定を環境変数から読み込む。SMTP パスワードなどのシークレットはコードに含めない。
//!
//! 読み込みは [`AppConfig::from_lookup`] に集約し、テストではプロセスの環境変数を
//! 書き換えずにクロージャで値を与える。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `PORT` | No | `3001` | ポート番号 |
//! | `ENVIRONMENT` | No | `development` | 実行環境（`/api/stats` に表示） |
//! | `ALLOWED_ORIGINS` | No | `https://checkcardpro.com,http://localhost:3000` | CORS 許可オリジン（カンマ区切り） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` | `smtp` / `noop` |
//! | `SMTP_HOST` | No | `smtp.gmail.com` | SMTP ホスト |
//! | `SMTP_PORT` | No | `587` | SMTP ポート |
//! | `SMTP_TLS` | No | `true` | STARTTLS を使うか |
//! | `EMAIL_USER` | No | - | SMTP ユーザー（未設定なら警告のみ） |
//! | `EMAIL_PASS` | No | - | SMTP パスワード |
//! | `EMAIL_FROM` | No | `EMAIL_USER` → `noreply@checkcardpro.com` | 送信元アドレス |
//! | `ADMIN_EMAIL` | No | `EMAIL_USER` | 通知先アドレス（どちらもなければ送信時に 500） |
//! | `DEFAULT_LANGUAGE` | No | `it` | 未対応言語のフォールバック先 |
//! | `SITE_URL` | No | `https://checkcardpro.com` | メールに記載するサイト URL |
//! | `RATE_LIMIT_MAX` | No | `10` | ウィンドウ内の最大リクエスト数 |
//! | `RATE_LIMIT_WINDOW_SECS` | No | `900` | レート制限ウィンドウ（秒） |
//! | `TRUST_PROXY` | No | `false` | `X-Forwarded-For` の末尾要素（直前のプロキシが付与した接続元）をクライアント IP とするか。リバースプロキシ配下でのみ有効にする |

use std::{env, str::FromStr, time::Duration};

use cardcheck_domain::language::Language;
use cardcheck_infra::notification::SmtpSettings;
use strum::EnumString;
use thiserror::Error;

const DEFAULT_FROM_ADDRESS: &str = "noreply@checkcardpro.com";
const DEFAULT_ALLOWED_ORIGINS: &str = "https://checkcardpro.com,http://localhost:3000";
const DEFAULT_SITE_URL: &str = "https://checkcardpro.com";

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 値を解釈できない
    #[error("環境変数 {name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// HTTP サーバー設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// バインドアドレス（例: `0.0.0.0`, `127.0.0.1`）
    pub host: String,
    pub port: u16,
}

/// CORS 設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// 許可するオリジン。資格情報付きリクエストを許可するためワイルドカードは使わない
    pub allowed_origins: Vec<String>,
}

/// 通知バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NotificationBackend {
    Smtp,
    /// 送信せずログ出力のみ（開発用）
    Noop,
}

/// 通知設定
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:       NotificationBackend,
    pub smtp:          SmtpSettings,
    /// 通知先。未設定の場合は起動時に警告し、送信時にエラーとする
    pub admin_address: Option<String>,
    pub site_url:      String,
}

/// レート制限設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window:       Duration,
    pub trust_proxy:  bool,
}

/// アプリケーション全体の設定
///
/// 起動時に一度だけ構築し、各コンポーネントに渡す。
/// `Debug` 出力には SMTP パスワードが含まれないが、設定全体をログに出さないこと。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server:           ServerConfig,
    /// 実行環境（`development`, `production`）
    pub environment:      String,
    pub cors:             CorsConfig,
    pub notification:     NotificationConfig,
    pub rate_limit:       RateLimitConfig,
    pub default_language: Language,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    ///
    /// ```rust,ignore
    /// dotenvy::dotenv().ok();
    /// let config = AppConfig::from_env()?;
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 空文字列は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let username = get("EMAIL_USER");
        let from_address = get("EMAIL_FROM")
            .or_else(|| username.clone())
            .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string());
        let admin_address = get("ADMIN_EMAIL").or_else(|| username.clone());

        let default_language = match get("DEFAULT_LANGUAGE") {
            Some(code) => code.parse().map_err(|_| ConfigError::Invalid {
                name:  "DEFAULT_LANGUAGE",
                value: code,
            })?,
            None => Language::default(),
        };

        Ok(Self {
            server: ServerConfig {
                host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&get, "PORT", 3001)?,
            },
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            cors: CorsConfig {
                allowed_origins: split_list(
                    &get("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
                ),
            },
            notification: NotificationConfig {
                backend: parse_or(&get, "NOTIFICATION_BACKEND", NotificationBackend::Smtp)?,
                smtp: SmtpSettings {
                    host: get("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                    port: parse_or(&get, "SMTP_PORT", 587)?,
                    tls: parse_or(&get, "SMTP_TLS", true)?,
                    username,
                    password: get("EMAIL_PASS"),
                    from_address,
                },
                admin_address,
                site_url: get("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            },
            rate_limit: RateLimitConfig {
                max_requests: parse_positive(&get, "RATE_LIMIT_MAX", 10)?,
                window:       Duration::from_secs(parse_positive(&get, "RATE_LIMIT_WINDOW_SECS", 900)?),
                trust_proxy:  parse_or(&get, "TRUST_PROXY", false)?,
            },
            default_language,
        })
    }
}

fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

/// 0 を許さない数値設定
fn parse_positive<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Default + PartialEq,
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, name, default)?;
    if value == T::default() {
        return Err(ConfigError::Invalid {
            name,
            value: "0".to_string(),
        });
    }
    Ok(value)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn 未設定ならデフォルト値を使う() {
        let config = load(&[]).unwrap();

        assert_eq!(
            config.server,
            ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            }
        );
        assert_eq!(config.environment, "development");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://checkcardpro.com", "http://localhost:3000"]
        );
        assert_eq!(config.notification.backend, NotificationBackend::Smtp);
        assert_eq!(config.notification.smtp.host, "smtp.gmail.com");
        assert_eq!(config.notification.smtp.port, 587);
        assert!(config.notification.smtp.tls);
        assert_eq!(config.notification.smtp.from_address, "noreply@checkcardpro.com");
        assert_eq!(config.notification.admin_address, None);
        assert_eq!(
            config.rate_limit,
            RateLimitConfig {
                max_requests: 10,
                window:       Duration::from_secs(900),
                trust_proxy:  false,
            }
        );
        assert_eq!(config.default_language, Language::It);
    }

    #[test]
    fn email_userが送信元と通知先のフォールバックになる() {
        let config = load(&[("EMAIL_USER", "relay@gmail.com"), ("EMAIL_PASS", "secret")]).unwrap();

        assert_eq!(config.notification.smtp.from_address, "relay@gmail.com");
        assert_eq!(
            config.notification.admin_address.as_deref(),
            Some("relay@gmail.com")
        );
        assert_eq!(config.notification.smtp.password.as_deref(), Some("secret"));
    }

    #[test]
    fn admin_emailはemail_userより優先される() {
        let config = load(&[
            ("EMAIL_USER", "relay@gmail.com"),
            ("ADMIN_EMAIL", "admin@checkcardpro.com"),
            ("EMAIL_FROM", "noreply@checkcardpro.com"),
        ])
        .unwrap();

        assert_eq!(
            config.notification.admin_address.as_deref(),
            Some("admin@checkcardpro.com")
        );
        assert_eq!(config.notification.smtp.from_address, "noreply@checkcardpro.com");
    }

    #[test]
    fn 空文字列は未設定として扱う() {
        let config = load(&[("PORT", ""), ("ADMIN_EMAIL", "  ")]).unwrap();

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.notification.admin_address, None);
    }

    #[test]
    fn 許可オリジンはカンマ区切りで空要素を除く() {
        let config = load(&[(
            "ALLOWED_ORIGINS",
            "https://a.example , https://b.example,,",
        )])
        .unwrap();

        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn 数値と真偽値を読み込む() {
        let config = load(&[
            ("PORT", "8080"),
            ("SMTP_PORT", "1025"),
            ("SMTP_TLS", "false"),
            ("RATE_LIMIT_MAX", "3"),
            ("RATE_LIMIT_WINDOW_SECS", "60"),
            ("TRUST_PROXY", "true"),
            ("NOTIFICATION_BACKEND", "Noop"),
            ("DEFAULT_LANGUAGE", "fr"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.notification.smtp.port, 1025);
        assert!(!config.notification.smtp.tls);
        assert_eq!(config.notification.backend, NotificationBackend::Noop);
        assert_eq!(
            config.rate_limit,
            RateLimitConfig {
                max_requests: 3,
                window:       Duration::from_secs(60),
                trust_proxy:  true,
            }
        );
        assert_eq!(config.default_language, Language::Fr);
    }

    #[test]
    fn 不正なポートはエラー() {
        let result = load(&[("PORT", "abc")]);

        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid {
                name:  "PORT",
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn レート制限の0はエラー() {
        assert_eq!(
            load(&[("RATE_LIMIT_WINDOW_SECS", "0")]).unwrap_err(),
            ConfigError::Invalid {
                name:  "RATE_LIMIT_WINDOW_SECS",
                value: "0".to_string(),
            }
        );
        assert!(load(&[("RATE_LIMIT_MAX", "0")]).is_err());
    }

    #[test]
    fn 未対応の既定言語はエラー() {
        let result = load(&[("DEFAULT_LANGUAGE", "de")]);

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "DEFAULT_LANGUAGE",
                ..
            })
        ));
    }

    #[test]
    fn 不正な通知バックエンドはエラー() {
        let result = load(&[("NOTIFICATION_BACKEND", "ses")]);

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "NOTIFICATION_BACKEND",
                ..
            })
        ));
    }
}
