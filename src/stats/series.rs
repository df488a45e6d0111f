//! Cumulative XP over time.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::records::Transaction;

use super::XpFilter;

/// Default cumulative jump an intermediate point needs to be kept.
pub const SIGNIFICANT_XP_DELTA: i64 = 1000;

/// Running XP total right after one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpPoint {
    pub at: DateTime<Utc>,
    pub xp: i64,
}

/// Included transactions in ascending `createdAt` order, with a running sum.
///
/// Ties keep their input order.
pub fn cumulative_xp_series(transactions: &[Transaction], filter: &XpFilter) -> Vec<XpPoint> {
    let mut included: Vec<&Transaction> = filter.included(transactions).collect();
    included.sort_by_key(|tx| tx.created_at);

    let mut total = 0;
    included
        .into_iter()
        .map(|tx| {
            total += tx.amount;
            XpPoint {
                at: tx.created_at,
                xp: total,
            }
        })
        .collect()
}

/// Thin a series down to the points worth plotting.
///
/// The first and last points are always kept. An intermediate point is kept
/// when its value exceeds the previous point of the full series by more than
/// `threshold`; the comparison is never against the last kept point.
pub fn significant_points(series: &[XpPoint], threshold: i64) -> Vec<XpPoint> {
    let last = series.len().saturating_sub(1);
    series
        .iter()
        .enumerate()
        .filter(|&(i, point)| i == 0 || i == last || point.xp - series[i - 1].xp > threshold)
        .map(|(_, point)| *point)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
