//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置し、ここで re-export する
//! - ハンドラは薄く保ち、受付フローは [`usecase`](crate::usecase) に委譲する
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs              # 親モジュール（re-export）
//! └── handler/
//!     ├── health.rs       # GET /api/health, GET /api/stats
//!     ├── verification.rs # POST /api/verify-card
//!     └── fallback.rs     # 未定義ルート
//! ```

pub mod fallback;
pub mod health;
pub mod verification;

pub use fallback::{AVAILABLE_ROUTES, not_found};
pub use health::{SystemState, health_check, stats};
pub use verification::{VerificationState, verify_card};
