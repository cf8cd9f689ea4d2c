//! # CardCheck ドメイン層
//!
//! ギフトカード検証リクエストの受付に関わるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋関数**: 正規化・採番・ラベル選択は入力のみに依存し、共有状態を持たない
//! - **差し替え可能な副作用**: 時刻と乱数は trait で注入し、テストで固定できる
//! - **インフラ非依存**: メール送信や HTTP の詳細は `infra` / `api` に置く
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//!   ↘     ↓
//!     shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`request`] - 受信ペイロードの正規化テーブルと正規化済みリクエスト
//! - [`language`] - 対応言語とセクションラベル表
//! - [`reference`] - 参照 ID の採番
//! - [`clock`] - 時刻プロバイダ
//! - [`notification`] - メールメッセージと通知エラー
//! - [`error`] - ドメイン層で発生するエラー

pub mod clock;
pub mod error;
pub mod language;
pub mod notification;
pub mod reference;
pub mod request;

pub use error::DomainError;
