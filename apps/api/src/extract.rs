//! # リクエストボディのエクストラクタ
//!
//! `Content-Type` に応じて JSON とフォーム（`application/x-www-form-urlencoded`）の
//! どちらのボディも `serde_json::Value` として受け取る。
//!
//! フォームのキーは角括弧でネストを表せる（`codes[code1]=1234` は
//! `{"codes": {"code1": "1234"}}`、`tags[]=a` は配列）。同じキーが複数回現れた場合は後の値を使う。
//! 値はすべて文字列になる。
//!
//! 解釈できないボディは axum 既定のプレーンテキストではなく [`ApiError::BadRequest`] で返す。

use axum::{
    Form,
    Json,
    extract::{FromRequest, Request},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use serde_json::{Map, Value};

use crate::error::ApiError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// JSON またはフォームで送られたリクエストボディ
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPayload(pub Value);

impl<S> FromRequest<S> for RequestPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|rejection| unreadable(rejection.body_text()))?;
            return Ok(Self(form_to_value(pairs)));
        }

        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| unreadable(rejection.body_text()))?;
        Ok(Self(value))
    }
}

fn unreadable(reason: String) -> ApiError {
    tracing::warn!(error = %reason, "リクエストボディを解釈できません");
    ApiError::BadRequest(reason)
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// フォームのキーと値の組を JSON オブジェクトに組み立てる
fn form_to_value(pairs: Vec<(String, String)>) -> Value {
    let mut root = Map::new();
    for (key, value) in pairs {
        insert_nested(&mut root, &key_segments(&key), value);
    }
    Value::Object(root)
}

/// `a[b][c]` を `["a", "b", "c"]` に分解する
fn key_segments(key: &str) -> Vec<&str> {
    match key.split_once('[') {
        None => vec![key],
        Some((head, rest)) => std::iter::once(head)
            .chain(rest.trim_end_matches(']').split("]["))
            .collect(),
    }
}

fn insert_nested(map: &mut Map<String, Value>, segments: &[&str], value: String) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    match rest {
        [] => {
            map.insert(first.to_string(), Value::String(value));
        }
        [""] => match map
            .entry(first.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(items) => items.push(Value::String(value)),
            other => *other = Value::Array(vec![Value::String(value)]),
        },
        _ => {
            let entry = map
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_nested(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{self, HeaderValue},
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn フラットなキーはそのまま文字列になる() {
        let value = form_to_value(pairs(&[
            ("email", "a@b.com"),
            ("amount", "50"),
            ("cardType", "Steam"),
        ]));

        assert_eq!(
            value,
            json!({ "email": "a@b.com", "amount": "50", "cardType": "Steam" })
        );
    }

    #[test]
    fn 角括弧のキーはネストしたオブジェクトになる() {
        let value = form_to_value(pairs(&[
            ("codes[code1]", "ABCD-EFGH"),
            ("codes[code2]", "321"),
            ("a[b][c]", "deep"),
        ]));

        assert_eq!(
            value,
            json!({
                "codes": { "code1": "ABCD-EFGH", "code2": "321" },
                "a": { "b": { "c": "deep" } }
            })
        );
    }

    #[test]
    fn 空の角括弧は配列になる() {
        let value = form_to_value(pairs(&[("tags[]", "a"), ("tags[]", "b")]));

        assert_eq!(value, json!({ "tags": ["a", "b"] }));
    }

    #[test]
    fn 同じキーは後の値で上書きする() {
        let value = form_to_value(pairs(&[("email", "first@b.com"), ("email", "second@b.com")]));

        assert_eq!(value, json!({ "email": "second@b.com" }));
    }

    #[rstest]
    #[case(Some("application/x-www-form-urlencoded"), true)]
    #[case(Some("application/x-www-form-urlencoded; charset=UTF-8"), true)]
    #[case(Some("Application/X-WWW-Form-Urlencoded"), true)]
    #[case(Some("application/json"), false)]
    #[case(None, false)]
    fn フォームかどうかの判定(#[case] content_type: Option<&str>, #[case] expected: bool) {
        let mut headers = HeaderMap::new();
        if let Some(value) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(value).unwrap());
        }

        assert_eq!(is_form(&headers), expected);
    }

    #[tokio::test]
    async fn フォームのボディをjsonの値として取り出す() {
        let request = http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from("email=a%40b.com&amount=50&codes%5Bcode1%5D=1234"))
            .unwrap();

        let RequestPayload(value) = RequestPayload::from_request(request, &()).await.unwrap();

        assert_eq!(
            value,
            json!({ "email": "a@b.com", "amount": "50", "codes": { "code1": "1234" } })
        );
    }

    #[tokio::test]
    async fn 不正なjsonはbad_requestになる() {
        let request = http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let error = RequestPayload::from_request(request, &()).await.unwrap_err();

        assert!(matches!(error, ApiError::BadRequest(_)));
    }
}
