//! # 通知ユースケース
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール生成

pub mod template_renderer;

pub use template_renderer::{PLACEHOLDER, TemplateRenderer};
