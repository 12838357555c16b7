//! Derived metrics over a site's history.
//!
//! Pure calculations; no I/O.

use crate::store::{HistoryEntry, Status};

/// Uptime percentage over a history slice, rounded to two decimals.
///
/// An empty history reports 100%: a site with no data yet is assumed
/// healthy.
pub fn uptime(history: &[HistoryEntry]) -> f64 {
    if history.is_empty() {
        return 100.0;
    }
    let up_count = history.iter().filter(|e| e.status == Status::Up).count();
    let pct = up_count as f64 / history.len() as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Mean response time over a history slice, rounded to the nearest
/// millisecond. An empty history reports 0.
pub fn avg_response_time(history: &[HistoryEntry]) -> u64 {
    if history.is_empty() {
        return 0;
    }
    let total: u64 = history.iter().map(|e| e.response_time).sum();
    (total as f64 / history.len() as f64).round() as u64
}
