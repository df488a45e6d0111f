//! Audit ratio, audit history and the given/received bars.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::records::AuditRecord;

/// Bucket of the platform's audit ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditRatioCategory {
    /// ratio >= 1.0
    Excellent,
    /// 0.7 <= ratio < 1.0
    Good,
    NeedsImprovement,
}

impl AuditRatioCategory {
    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent! You're contributing significantly to the community.",
            Self::Good => "Good job! Try auditing a few more projects to improve your ratio.",
            Self::NeedsImprovement => "You should focus on auditing more projects to improve your ratio.",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#2ecc71",
            Self::Good => "#f39c12",
            Self::NeedsImprovement => "#e74c3c",
        }
    }
}

pub fn audit_ratio_category(ratio: f64) -> AuditRatioCategory {
    if ratio >= 1.0 {
        AuditRatioCategory::Excellent
    } else if ratio >= 0.7 {
        AuditRatioCategory::Good
    } else {
        AuditRatioCategory::NeedsImprovement
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AuditSummary {
    /// Audits done, graded or not.
    pub count: usize,
    /// Mean of the non-null grades, 0 when there are none.
    pub average_grade: f64,
}

pub fn audit_summary(audits: &[AuditRecord]) -> AuditSummary {
    let grades: Vec<f64> = audits.iter().filter_map(|a| a.grade).collect();
    let average_grade = if grades.is_empty() {
        0.0
    } else {
        grades.iter().sum::<f64>() / grades.len() as f64
    };
    AuditSummary {
        count: audits.len(),
        average_grade,
    }
}

/// One row of the recent audits list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub grade: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// The `limit` most recent audits, newest first.
pub fn recent_audits(audits: &[AuditRecord], limit: usize) -> Vec<AuditEntry> {
    let mut sorted: Vec<&AuditRecord> = audits.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
        .into_iter()
        .take(limit)
        .map(|a| AuditEntry {
            id: a.id,
            grade: a.grade,
            created_at: a.created_at,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// Widths, in percent, of the "given" and "received" bars.
///
/// The larger side fills the bar; the other is drawn relative to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AuditBars {
    pub given_pct: f64,
    pub received_pct: f64,
}

pub fn audit_bars(total_up: i64, total_down: i64) -> AuditBars {
    let up = total_up.max(0) as f64;
    let down = total_down.max(0) as f64;
    let max = up.max(down);
    if max == 0.0 {
        return AuditBars::default();
    }
    AuditBars {
        given_pct: up / max * 100.0,
        received_pct: down / max * 100.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
