//! # 検証リクエストハンドラ
//!
//! `POST /api/verify-card` を処理する。
//!
//! ボディは型付きの構造体ではなく [`RequestPayload`]（JSON またはフォーム）で受け取り、
//! 項目名の揺れは [`normalize`](cardcheck_domain::request::normalize) で吸収する。

use std::sync::Arc;

use axum::{Json, extract::State};
use cardcheck_domain::reference::ReferenceId;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::ApiError, extract::RequestPayload, usecase::VerificationService};

/// 受付成功メッセージ
pub const MSG_ACCEPTED: &str = "Demande reçue avec succès";

/// 検証リクエストハンドラの共有状態
pub struct VerificationState {
    pub service: VerificationService,
}

/// 受付成功レスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationAccepted {
    pub success:   bool,
    pub message:   String,
    pub reference: ReferenceId,
    pub timestamp: DateTime<Utc>,
}

/// `POST /api/verify-card`
pub async fn verify_card(
    State(state): State<Arc<VerificationState>>,
    RequestPayload(payload): RequestPayload,
) -> Result<Json<VerificationAccepted>, ApiError> {
    let receipt = state.service.submit(&payload).await?;

    Ok(Json(VerificationAccepted {
        success:   true,
        message:   MSG_ACCEPTED.to_string(),
        reference: receipt.reference,
        timestamp: receipt.submitted_at,
    }))
}
