//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで検証リクエストの通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**: `🔐 Vérification {カード種別} - {金額}`
//! - **HTML は自動エスケープ**: クライアント入力はすべてエスケープされる（`.html` テンプレート）
//! - **言語コード**: 解決後の言語と異なるコードが送られた場合は送信値も併記する（`de → it`）
//! - **決定的**: 同じ入力・参照 ID・受付時刻からは同じメールが生成される

use cardcheck_domain::{
    notification::{EmailMessage, NotificationError},
    reference::ReferenceId,
    request::VerificationRequest,
};
use chrono::{DateTime, Utc};
use tera::{Context, Tera};

/// 未入力項目の表示
pub const PLACEHOLDER: &str = "Non fourni";

/// 受付日時の表示形式
const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S UTC";

const TEMPLATE_NAME: &str = "verification_request";

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine:   Tera,
    site_url: String,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new(site_url: impl Into<String>) -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "verification_request.html",
                    include_str!("../../../templates/notifications/verification_request.html"),
                ),
                (
                    "verification_request.txt",
                    include_str!("../../../templates/notifications/verification_request.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self {
            engine,
            site_url: site_url.into(),
        })
    }

    /// 正規化済みリクエストから管理者宛てのメールを生成する
    ///
    /// 返信先にはクライアントのメールアドレスを設定する。
    pub fn render(
        &self,
        request: &VerificationRequest,
        reference: &ReferenceId,
        submitted_at: DateTime<Utc>,
        recipient: &str,
    ) -> Result<EmailMessage, NotificationError> {
        let context = self.build_context(request, reference, submitted_at);

        let html_body = self
            .engine
            .render(&format!("{TEMPLATE_NAME}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{TEMPLATE_NAME}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: recipient.to_string(),
            reply_to: Some(request.email.clone()),
            subject: subject(request),
            html_body,
            text_body,
        })
    }

    fn build_context(
        &self,
        request: &VerificationRequest,
        reference: &ReferenceId,
        submitted_at: DateTime<Utc>,
    ) -> Context {
        let or_placeholder = |value: &Option<String>| value.as_deref().unwrap_or(PLACEHOLDER).to_string();

        let mut context = Context::new();
        context.insert("labels", request.language.labels());
        context.insert("reference", reference.as_str());
        context.insert("date", &submitted_at.format(DATE_FORMAT).to_string());
        context.insert("language_code", request.language.code());
        context.insert("language_name", request.language.native_name());
        context.insert("requested_language", &requested_language(request));
        context.insert("email", &request.email);
        context.insert("client_name", &or_placeholder(&request.client_name));
        context.insert("client_phone", &or_placeholder(&request.client_phone));
        context.insert("card_type", &or_placeholder(&request.card_type));
        context.insert("card_number", &or_placeholder(&request.card_number));
        context.insert("security_code", &or_placeholder(&request.security_code));
        context.insert("amount", &request.amount_label());
        context.insert("client_timestamp", &or_placeholder(&request.client_timestamp));
        context.insert("site_url", &self.site_url);
        context
    }
}

/// 解決後の言語コードと異なる場合のみ、クライアントが送信した言語コードを返す
fn requested_language(request: &VerificationRequest) -> Option<&str> {
    request
        .requested_language
        .as_deref()
        .filter(|code| !code.eq_ignore_ascii_case(request.language.code()))
}

/// 件名を組み立てる
fn subject(request: &VerificationRequest) -> String {
    format!(
        "🔐 Vérification {} - {}",
        request.card_type.as_deref().unwrap_or(PLACEHOLDER),
        request.amount_label()
    )
}
