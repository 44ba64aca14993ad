pub mod adapters;
pub mod aggregator;
pub mod binance;
pub mod board;
pub mod catalog;
pub mod detail;
pub mod format;
pub mod normalizer;
pub mod sparkline;
pub mod stream;
pub mod types;

use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn now_unix_ms() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_millis().min(i64::MAX as u128) as i64,
        Err(_) => 0,
    }
}
