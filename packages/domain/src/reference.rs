//! # 参照 ID
//!
//! 受付したリクエストを通知メールと API レスポンスで識別するための表示用トークン。
//!
//! 形式は `VF` + 現在時刻（Unix ミリ秒）の 36 進表記 + 36 進の乱数 4 文字で、すべて大文字。
//! 一意性は確率的なもので、衝突は許容する（参照 ID で検索するテーブルは存在しない）。

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use derive_more::Display;
use rand::Rng;
use serde::Serialize;

use crate::clock::Clock;

/// 参照 ID の接頭辞
pub const REFERENCE_PREFIX: &str = "VF";

/// 乱数部分の文字数
pub const RANDOM_SUFFIX_LEN: usize = 4;

const RADIX: u32 = 36;

/// 参照 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize)]
#[display("{_0}")]
#[serde(transparent)]
pub struct ReferenceId(String);

impl ReferenceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 36 進の乱数桁を提供するトレイト
pub trait RandomSource: Send + Sync {
    /// `0..36` の値を返す
    fn next_digit(&self) -> u32;
}

/// スレッドローカル乱数生成器を使う実装
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_digit(&self) -> u32 {
        rand::rng().random_range(0..RADIX)
    }
}

/// 決められた桁を順に返すテスト用実装
///
/// 末尾まで使い切ったら先頭に戻る。
#[derive(Debug)]
pub struct SequenceRandomSource {
    digits: Vec<u32>,
    cursor: AtomicUsize,
}

impl SequenceRandomSource {
    pub fn new(digits: Vec<u32>) -> Self {
        Self {
            digits,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandomSource {
    fn next_digit(&self) -> u32 {
        if self.digits.is_empty() {
            return 0;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.digits.len();
        self.digits[index] % RADIX
    }
}

/// 参照 ID の採番器
///
/// 時刻と乱数を注入して使う。状態を持たないため複数リクエストから共有できる。
#[derive(Clone)]
pub struct ReferenceIdGenerator {
    clock:  Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl ReferenceIdGenerator {
    pub fn new(clock: Arc<dyn Clock>, random: Arc<dyn RandomSource>) -> Self {
        Self { clock, random }
    }

    /// 参照 ID を採番する
    pub fn generate(&self) -> ReferenceId {
        // 1970 年以前の時刻は扱わない
        let millis = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or_default();

        let mut id = String::from(REFERENCE_PREFIX);
        id.push_str(&to_base36(millis));
        for _ in 0..RANDOM_SUFFIX_LEN {
            id.push(base36_digit(self.random.next_digit()));
        }

        ReferenceId(id)
    }
}

/// 非負整数を大文字の 36 進表記に変換する
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        // RADIX 未満なので u32 に収まる
        digits.push(base36_digit((value % u64::from(RADIX)) as u32));
        value /= u64::from(RADIX);
    }
    digits.iter().rev().collect()
}

fn base36_digit(digit: u32) -> char {
    char::from_digit(digit % RADIX, RADIX)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('0')
}
