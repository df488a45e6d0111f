//! Project pass/fail classification.
//!
//! A graded progress record counts as passed when some transaction with a
//! positive amount points at the same object; XP is the platform's proof
//! of success. Ungraded records are in progress and belong to neither side.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::records::{ProgressRecord, Transaction};

use super::percentage;

/// Passed / failed / in-progress counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectClassification {
    pub passed: usize,
    pub failed: usize,
    pub in_progress: usize,
    /// Every record, graded or not.
    pub total: usize,
}

impl ProjectClassification {
    pub fn graded(&self) -> usize {
        self.passed + self.failed
    }

    /// Share of graded records that passed, 0 when nothing is graded.
    pub fn passed_pct(&self) -> f64 {
        percentage(self.passed, self.graded())
    }

    /// Share of graded records that failed, 0 when nothing is graded.
    pub fn failed_pct(&self) -> f64 {
        percentage(self.failed, self.graded())
    }
}

/// Object ids that earned XP.
fn xp_objects(transactions: &[Transaction]) -> HashSet<i64> {
    transactions
        .iter()
        .filter(|tx| tx.amount > 0)
        .filter_map(|tx| tx.object_id)
        .collect()
}

pub fn project_classification(
    progresses: &[ProgressRecord],
    transactions: &[Transaction],
) -> ProjectClassification {
    let rewarded = xp_objects(transactions);
    let mut counts = ProjectClassification {
        total: progresses.len(),
        ..Default::default()
    };

    for progress in progresses {
        match status_of(progress, &rewarded) {
            ProjectStatus::Successful => counts.passed += 1,
            ProjectStatus::NoXp => counts.failed += 1,
            ProjectStatus::InProgress => counts.in_progress += 1,
        }
    }
    counts
}

/// Percentage of graded records that passed, in `[0, 100]`.
pub fn pass_rate(progresses: &[ProgressRecord], transactions: &[Transaction]) -> f64 {
    project_classification(progresses, transactions).passed_pct()
}

/// Mean grade over graded records, 0 when none are graded.
pub fn average_project_grade(progresses: &[ProgressRecord]) -> f64 {
    let grades: Vec<f64> = progresses.iter().filter_map(|p| p.grade).collect();
    if grades.is_empty() {
        0.0
    } else {
        grades.iter().sum::<f64>() / grades.len() as f64
    }
}

// ---------------------------------------------------------------------------
// Recent projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Successful,
    NoXp,
    InProgress,
}

impl ProjectStatus {
    /// Hex color used for the status in the projects panel.
    pub fn color(self) -> &'static str {
        match self {
            Self::Successful => "#2ecc71",
            Self::NoXp => "#e74c3c",
            Self::InProgress => "#f39c12",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Successful => write!(f, "Successful"),
            Self::NoXp => write!(f, "No XP"),
            Self::InProgress => write!(f, "In Progress"),
        }
    }
}

fn status_of(progress: &ProgressRecord, rewarded: &HashSet<i64>) -> ProjectStatus {
    if !progress.is_graded() {
        return ProjectStatus::InProgress;
    }
    match progress.object_id {
        Some(id) if rewarded.contains(&id) => ProjectStatus::Successful,
        _ => ProjectStatus::NoXp,
    }
}

/// One row of the recent projects list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectEntry {
    pub name: String,
    pub updated_at: DateTime<Utc>,
    pub grade: Option<f64>,
    pub status: ProjectStatus,
}

/// The `limit` most recently updated records with their status.
pub fn recent_projects(
    progresses: &[ProgressRecord],
    transactions: &[Transaction],
    limit: usize,
) -> Vec<ProjectEntry> {
    let rewarded = xp_objects(transactions);
    let mut sorted: Vec<&ProgressRecord> = progresses.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    sorted
        .into_iter()
        .take(limit)
        .map(|p| ProjectEntry {
            name: p.object_name().to_string(),
            updated_at: p.updated_at,
            grade: p.grade,
            status: status_of(p, &rewarded),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
