//! Statistics Engine: pure functions over a student's records.
//!
//! Everything here is recomputed from the fetched snapshot on every run:
//!
//! - **XP**: totals, monthly breakdown, recent activity (this module)
//! - **Projects**: pass/fail classification and pass rate ([`projects`])
//! - **Audits**: ratio category, summary, bar widths ([`audits`])
//! - **Series**: cumulative XP over time and its simplification ([`series`])
//!
//! XP figures only count transactions accepted by [`XpFilter`].

pub mod audits;
pub mod projects;
pub mod series;
pub mod summary;

use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::config::schema::CampusConfig;
use crate::records::Transaction;

pub use audits::{AuditBars, AuditRatioCategory, AuditSummary, audit_bars, audit_ratio_category, audit_summary};
pub use projects::{ProjectClassification, ProjectStatus, pass_rate, project_classification};
pub use series::{SIGNIFICANT_XP_DELTA, XpPoint, cumulative_xp_series, significant_points};
pub use summary::{DashboardStats, StatsSettings};

// ---------------------------------------------------------------------------
// Piscine exclusion
// ---------------------------------------------------------------------------

/// Decides which transactions count toward XP figures.
///
/// A path equal to the exception path is always counted. Any other path is
/// counted only if it contains none of the excluded markers. Only the one
/// exception path is carved out; other bootcamp paths stay excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct XpFilter {
    exception_path: String,
    excluded_markers: Vec<String>,
}

impl XpFilter {
    pub fn new(exception_path: impl Into<String>, excluded_markers: Vec<String>) -> Self {
        Self {
            exception_path: exception_path.into(),
            excluded_markers,
        }
    }

    pub fn from_config(config: &CampusConfig) -> Self {
        Self::new(
            config.piscine_exception_path.clone(),
            config.excluded_markers.clone(),
        )
    }

    pub fn includes(&self, path: &str) -> bool {
        if path == self.exception_path {
            return true;
        }
        !self
            .excluded_markers
            .iter()
            .any(|marker| path.contains(marker.as_str()))
    }

    /// Transactions that count toward XP, in input order.
    pub fn included<'a>(
        &'a self,
        transactions: &'a [Transaction],
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        transactions.iter().filter(|tx| self.includes(&tx.path))
    }
}

impl Default for XpFilter {
    fn default() -> Self {
        Self::from_config(&CampusConfig::default())
    }
}

// ---------------------------------------------------------------------------
// XP aggregates
// ---------------------------------------------------------------------------

/// Sum of `amount` over included transactions.
pub fn total_xp(transactions: &[Transaction], filter: &XpFilter) -> i64 {
    filter.included(transactions).map(|tx| tx.amount).sum()
}

/// XP earned in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyXp {
    pub year: i32,
    pub month: u32,
    /// "Month Year", e.g. "March 2024".
    pub label: String,
    pub xp: i64,
}

/// XP per calendar month in the local time zone, newest month first.
pub fn monthly_breakdown(transactions: &[Transaction], filter: &XpFilter) -> Vec<MonthlyXp> {
    monthly_breakdown_in(transactions, filter, &Local)
}

/// XP per calendar month in `tz`, newest month first.
pub fn monthly_breakdown_in<Tz: TimeZone>(
    transactions: &[Transaction],
    filter: &XpFilter,
    tz: &Tz,
) -> Vec<MonthlyXp> {
    let mut months: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for tx in filter.included(transactions) {
        let local = tx.created_at.with_timezone(tz);
        *months.entry((local.year(), local.month())).or_default() += tx.amount;
    }

    months
        .into_iter()
        .rev()
        .map(|((year, month), xp)| MonthlyXp {
            year,
            month,
            label: month_label(year, month),
            xp,
        })
        .collect()
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{month:02}/{year}"))
}

/// The `limit` most recent included transactions, newest first.
pub fn recent_activity<'a>(
    transactions: &'a [Transaction],
    filter: &XpFilter,
    limit: usize,
) -> Vec<&'a Transaction> {
    let mut recent: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| filter.includes(&tx.path))
        .collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(limit);
    recent
}

/// `100 * part / whole`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    pub(crate) fn tx(id: i64, amount: i64, path: &str, at: &str) -> Transaction {
        Transaction {
            id,
            kind: "xp".to_string(),
            amount,
            object_id: Some(id * 10),
            created_at: at.parse::<DateTime<Utc>>().unwrap(),
            path: path.to_string(),
            object: None,
        }
    }

    #[test]
    fn exception_path_is_included() {
        let filter = XpFilter::default();
        assert!(filter.includes("/rouen/div-01/piscine-js"));
    }

    #[test]
    fn marker_paths_are_excluded() {
        let filter = XpFilter::default();
        assert!(!filter.includes("/rouen/div-01/piscine-js/quest-01"));
        assert!(!filter.includes("/rouen/piscine-go"));
        assert!(!filter.includes("/rouen/div-01/piscine-go/x"));
        assert!(!filter.includes("/rouen/old-piscine-go-2023/exam"));
    }

    #[test]
    fn only_the_js_path_is_carved_out() {
        let filter = XpFilter::default();
        assert!(!filter.includes("/rouen/div-01/piscine-go"));
        assert!(filter.includes("/rouen/div-01/graphql"));
        assert!(filter.includes(""));
    }

    #[test]
    fn total_xp_counts_included_only() {
        let txs = vec![
            tx(1, 100, "/rouen/div-01/piscine-js", "2024-01-01T00:00:00Z"),
            tx(2, 50, "/rouen/div-01/other", "2024-01-02T00:00:00Z"),
            tx(3, 30, "/rouen/div-01/piscine-go/x", "2024-01-03T00:00:00Z"),
        ];
        assert_eq!(total_xp(&txs, &XpFilter::default()), 150);
        assert_eq!(total_xp(&[], &XpFilter::default()), 0);
    }

    #[test]
    fn monthly_breakdown_groups_and_orders_newest_first() {
        let txs = vec![
            tx(1, 100, "/rouen/div-01/a", "2024-09-03T10:00:00Z"),
            tx(2, 200, "/rouen/div-01/b", "2024-09-28T10:00:00Z"),
            tx(3, 400, "/rouen/div-01/c", "2025-03-01T10:00:00Z"),
            tx(4, 800, "/rouen/div-01/piscine-js/q", "2025-03-02T10:00:00Z"),
            tx(5, 50, "/rouen/div-01/d", "2023-12-31T23:00:00Z"),
        ];
        let months = monthly_breakdown_in(&txs, &XpFilter::default(), &Utc);

        let labels: Vec<&str> = months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["March 2025", "September 2024", "December 2023"]);
        assert_eq!(months[0].xp, 400);
        assert_eq!(months[1].xp, 300);
        assert_eq!(months[2].xp, 50);
    }

    #[test]
    fn monthly_breakdown_uses_the_given_zone() {
        let txs = vec![tx(1, 10, "/rouen/div-01/a", "2023-12-31T23:30:00Z")];
        let paris = chrono::FixedOffset::east_opt(3600).unwrap();
        let months = monthly_breakdown_in(&txs, &XpFilter::default(), &paris);
        assert_eq!(months[0].label, "January 2024");
    }

    #[test]
    fn recent_activity_is_newest_first_and_truncated() {
        let txs: Vec<Transaction> = (1..=7)
            .map(|i| tx(i, i * 10, "/rouen/div-01/p", &format!("2024-01-0{i}T00:00:00Z")))
            .chain([tx(8, 999, "/rouen/piscine-go/z", "2024-02-01T00:00:00Z")])
            .collect();

        let recent = recent_activity(&txs, &XpFilter::default(), 5);
        let ids: Vec<i64> = recent.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn percentage_guards_zero_denominator() {
        assert_eq!(percentage(3, 4), 75.0);
        assert_eq!(percentage(0, 0), 0.0);
        assert!(!percentage(5, 0).is_nan());
    }
}
