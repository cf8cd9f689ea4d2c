//! # 検証リクエストの正規化
//!
//! フロントエンドの改版ごとに変わってきた受信ペイロードの項目名を、
//! 1 つの正規化済みレコード [`VerificationRequest`] に揃える。
//!
//! ## 正規化テーブル
//!
//! フォールバックはインラインの分岐ではなく [`NORMALIZATION_TABLE`] で宣言する。
//! 各行は `(正規化後フィールド, [ソースパス...])` で、ソースパスは先頭から順に評価し、
//! 最初に値が見つかったものを採用する（直接の項目名 → 旧項目名）。
//! ソースパスはドット区切りでネストしたオブジェクトを辿る（例: `codes.code1`）。
//!
//! ## 値の扱い
//!
//! - 文字列は前後の空白を除去し、空なら未指定とみなす
//! - 数値・真偽値は JSON の文字列表現を使う（`50`, `49.99`）
//! - `null`・配列・オブジェクトは未指定とみなす
//!
//! 正規化後に `email` と `amount` がなければ [`DomainError::MissingFields`] を返す。
//! `amount` が数値として解釈できない（`true`, `"abc"` など）場合は [`DomainError::Validation`] を返す。

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use strum::IntoStaticStr;

use crate::{DomainError, language::Language};

/// 正規化後のフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum CanonicalField {
    Email,
    CardType,
    CardNumber,
    SecurityCode,
    Amount,
    Currency,
    ClientName,
    ClientPhone,
    Language,
    Timestamp,
}

impl CanonicalField {
    /// API 上のフィールド名（camelCase）
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// 正規化テーブル
///
/// ソースパスは優先順。受け付ける項目名を増やすときはここに追加する。
pub const NORMALIZATION_TABLE: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::Email, &["email", "clientEmail"]),
    (CanonicalField::CardType, &["cardType", "cardLabel"]),
    (CanonicalField::CardNumber, &["cardNumber", "codes.code1"]),
    (CanonicalField::SecurityCode, &["securityCode", "codes.code2"]),
    (CanonicalField::Amount, &["amount"]),
    (CanonicalField::Currency, &["currency"]),
    (CanonicalField::ClientName, &["clientName"]),
    (CanonicalField::ClientPhone, &["clientPhone"]),
    (CanonicalField::Language, &["language"]),
    (CanonicalField::Timestamp, &["timestamp"]),
];

/// 正規化済みの検証リクエスト
///
/// `email` と `amount` は必ず存在する。その他の項目は未指定なら `None`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationRequest {
    pub email:              String,
    pub amount:             String,
    pub card_type:          Option<String>,
    pub card_number:        Option<String>,
    pub security_code:      Option<String>,
    pub currency:           Option<String>,
    pub client_name:        Option<String>,
    pub client_phone:       Option<String>,
    /// クライアントが送信した時刻（表示用、解釈しない）
    pub client_timestamp:   Option<String>,
    pub language:           Language,
    /// クライアントが送信した言語コード（未対応のコードもそのまま保持する）
    pub requested_language: Option<String>,
}

impl VerificationRequest {
    /// 通貨記号付きの金額表記
    ///
    /// 通貨未指定はユーロとして扱う。
    pub fn amount_label(&self) -> String {
        let currency = self
            .currency
            .as_deref()
            .map(str::to_ascii_uppercase);

        match currency.as_deref() {
            None | Some("EUR" | "€") => format!("€{}", self.amount),
            Some("USD" | "$") => format!("${}", self.amount),
            Some("GBP" | "£") => format!("£{}", self.amount),
            Some(code) => format!("{} {code}", self.amount),
        }
    }
}

/// 受信ペイロードを正規化する
///
/// 共有状態には触れない純粋関数。`language` が未指定または未対応の場合は
/// `default_language` を使う。
///
/// ```rust
/// use cardcheck_domain::{language::Language, request::normalize};
/// use serde_json::json;
///
/// let raw = json!({ "clientEmail": "a@b.com", "amount": 50, "codes": { "code1": "1234" } });
/// let request = normalize(&raw, Language::It).unwrap();
///
/// assert_eq!(request.email, "a@b.com");
/// assert_eq!(request.card_number.as_deref(), Some("1234"));
/// ```
pub fn normalize(
    raw: &Value,
    default_language: Language,
) -> Result<VerificationRequest, DomainError> {
    if !raw.is_object() {
        return Err(DomainError::Validation(
            "リクエストボディは JSON オブジェクトである必要があります".to_string(),
        ));
    }

    let mut resolved: HashMap<CanonicalField, String> = NORMALIZATION_TABLE
        .iter()
        .filter_map(|(field, paths)| {
            paths
                .iter()
                .find_map(|path| lookup(raw, path))
                .map(|value| (*field, value))
        })
        .collect();

    let (email, amount) = match (
        resolved.remove(&CanonicalField::Email),
        resolved.remove(&CanonicalField::Amount),
    ) {
        (Some(email), Some(amount)) => (email, amount),
        (email, amount) => {
            let fields = [
                (CanonicalField::Email, email.is_none()),
                (CanonicalField::Amount, amount.is_none()),
            ]
            .into_iter()
            .filter(|(_, missing)| *missing)
            .map(|(field, _)| field.name())
            .collect();

            return Err(DomainError::MissingFields {
                fields,
                received: raw.clone(),
            });
        }
    };

    if !is_numeric(&amount) {
        return Err(DomainError::Validation(format!(
            "amount は数値である必要があります: {amount}"
        )));
    }

    let requested_language = resolved.remove(&CanonicalField::Language);
    let language = Language::resolve(requested_language.as_deref(), default_language);

    Ok(VerificationRequest {
        email,
        amount,
        card_type: resolved.remove(&CanonicalField::CardType),
        card_number: resolved.remove(&CanonicalField::CardNumber),
        security_code: resolved.remove(&CanonicalField::SecurityCode),
        currency: resolved.remove(&CanonicalField::Currency),
        client_name: resolved.remove(&CanonicalField::ClientName),
        client_phone: resolved.remove(&CanonicalField::ClientPhone),
        client_timestamp: resolved.remove(&CanonicalField::Timestamp),
        language,
        requested_language,
    })
}

/// 有限の数値として解釈できるか（`50`, `49.99`, `"25.50"`）
fn is_numeric(amount: &str) -> bool {
    amount.parse::<f64>().is_ok_and(f64::is_finite)
}

/// ドット区切りのパスで値を取り出し、表示用の文字列に変換する
fn lookup(raw: &Value, path: &str) -> Option<String> {
    let value = path
        .split('.')
        .try_fold(raw, |current, segment| current.get(segment))?;

    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
