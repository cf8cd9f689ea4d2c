//! # ミドルウェア
//!
//! API 用のミドルウェアを提供する。

mod rate_limit;

pub use rate_limit::{RateDecision, RateLimitState, RateLimiter, rate_limit};
