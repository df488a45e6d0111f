//! Every statistic the dashboard shows, computed in one pass.

use serde::Serialize;

use crate::config::schema::{ChartConfig, PanelConfig};
use crate::records::{Subject, Transaction};

use super::audits::{AuditEntry, recent_audits};
use super::projects::{ProjectEntry, average_project_grade, recent_projects};
use super::{
    AuditBars, AuditRatioCategory, AuditSummary, MonthlyXp, ProjectClassification, XpFilter,
    XpPoint, audit_bars, audit_ratio_category, audit_summary, cumulative_xp_series,
    monthly_breakdown, project_classification, recent_activity, significant_points,
};

/// List sizes and thresholds for [`DashboardStats::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSettings {
    pub recent_limit: usize,
    pub monthly_limit: usize,
    pub significant_delta: i64,
}

impl StatsSettings {
    pub fn from_config(panels: &PanelConfig, chart: &ChartConfig) -> Self {
        Self {
            recent_limit: panels.recent_limit,
            monthly_limit: panels.monthly_limit,
            significant_delta: chart.significant_delta,
        }
    }
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self::from_config(&PanelConfig::default(), &ChartConfig::default())
    }
}

/// A recent XP transaction as shown in the XP panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub name: String,
    pub amount: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Transaction> for ActivityEntry {
    fn from(tx: &Transaction) -> Self {
        Self {
            name: tx.object_name().to_string(),
            amount: tx.amount,
            created_at: tx.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XpStats {
    pub total: i64,
    /// Newest month first, at most `monthly_limit` entries.
    pub monthly: Vec<MonthlyXp>,
    pub recent: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStats {
    pub classification: ProjectClassification,
    pub pass_rate: f64,
    pub average_grade: f64,
    pub recent: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditStats {
    pub ratio: f64,
    pub category: AuditRatioCategory,
    pub total_up: i64,
    pub total_down: i64,
    pub bars: AuditBars,
    pub summary: AuditSummary,
    pub recent: Vec<AuditEntry>,
}

/// Full statistics snapshot for one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub xp: XpStats,
    pub projects: ProjectStats,
    pub audits: AuditStats,
    /// Cumulative XP, every included transaction.
    pub series: Vec<XpPoint>,
    /// The subset of `series` drawn on the line chart.
    pub plotted: Vec<XpPoint>,
}

impl DashboardStats {
    pub fn compute(subject: &Subject, filter: &XpFilter, settings: &StatsSettings) -> Self {
        let transactions = &subject.transactions;

        let mut monthly = monthly_breakdown(transactions, filter);
        monthly.truncate(settings.monthly_limit);

        let xp = XpStats {
            total: super::total_xp(transactions, filter),
            monthly,
            recent: recent_activity(transactions, filter, settings.recent_limit)
                .into_iter()
                .map(ActivityEntry::from)
                .collect(),
        };

        let classification = project_classification(&subject.progresses, transactions);
        let projects = ProjectStats {
            classification,
            pass_rate: classification.passed_pct(),
            average_grade: average_project_grade(&subject.progresses),
            recent: recent_projects(&subject.progresses, transactions, settings.recent_limit),
        };

        let audits = AuditStats {
            ratio: subject.audit_ratio,
            category: audit_ratio_category(subject.audit_ratio),
            total_up: subject.total_up,
            total_down: subject.total_down,
            bars: audit_bars(subject.total_up, subject.total_down),
            summary: audit_summary(&subject.audits),
            recent: recent_audits(&subject.audits, settings.recent_limit),
        };

        let series = cumulative_xp_series(transactions, filter);
        let plotted = significant_points(&series, settings.significant_delta);

        Self {
            xp,
            projects,
            audits,
            series,
            plotted,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
