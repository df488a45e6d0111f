//! The three statistic panels: XP, projects, audits.

use crate::stats::summary::{AuditStats, ProjectStats, XpStats};
use crate::stats::ProjectStatus;

use super::charts::render_donut;
use super::{RenderOptions, escape_html, format_grade, format_number};

// ---------------------------------------------------------------------------
// XP
// ---------------------------------------------------------------------------

pub fn render_xp_panel(xp: &XpStats, options: &RenderOptions) -> String {
    let mut html = String::from("<h3>XP Statistics</h3>\n<div class=\"xp-stats\">\n");
    html.push_str(&format!(
        "<p class=\"total-xp\"><strong>Total XP:</strong> {}</p>\n",
        format_number(xp.total)
    ));

    html.push_str("<div class=\"monthly-breakdown\">\n<h4>Monthly Breakdown</h4>\n<ul>\n");
    if xp.monthly.is_empty() {
        html.push_str("<li class=\"empty\">No XP yet</li>\n");
    }
    for month in &xp.monthly {
        html.push_str(&format!(
            "<li><span>{}:</span> <span>{} XP</span></li>\n",
            month.label,
            format_number(month.xp)
        ));
    }
    html.push_str("</ul>\n</div>\n");

    html.push_str("<div class=\"recent-activity\">\n<h4>Recent Activity</h4>\n<ul>\n");
    for entry in &xp.recent {
        html.push_str(&format!(
            "<li><div class=\"activity-entry\">\
             <span class=\"activity-name\">{}</span>\
             <span class=\"activity-xp\">+{} XP</span>\
             <span class=\"activity-date\">{}</span></div></li>\n",
            escape_html(&entry.name),
            format_number(entry.amount),
            options.date(&entry.created_at)
        ));
    }
    html.push_str("</ul>\n</div>\n</div>\n");
    html
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub fn render_projects_panel(projects: &ProjectStats, options: &RenderOptions) -> String {
    let mut html = String::from("<h3>Project Statistics</h3>\n<div class=\"project-stats\">\n");
    html.push_str(&render_donut(&projects.classification, options.donut_radius));

    html.push_str(&format!(
        "<div class=\"project-summary\">\n\
         <div class=\"summary-item\"><span class=\"summary-label\">Completed Projects:</span> \
         <span class=\"summary-value\">{}</span></div>\n\
         <div class=\"summary-item\"><span class=\"summary-label\">Average Grade:</span> \
         <span class=\"summary-value\">{:.1}</span></div>\n\
         </div>\n",
        projects.classification.graded(),
        projects.average_grade
    ));

    html.push_str("<div class=\"recent-projects\">\n<h4>Recent Projects</h4>\n<ul class=\"project-list\">\n");
    for project in &projects.recent {
        let grade = match (project.status, project.grade) {
            (ProjectStatus::InProgress, _) | (_, None) => "In Progress".to_string(),
            (_, Some(grade)) => format!("Grade: {}", format_grade(grade)),
        };
        html.push_str(&format!(
            "<li class=\"project-item\"><div>\
             <div class=\"project-name\">{}</div>\
             <div class=\"project-date\">{}</div></div>\
             <div class=\"project-grade\" style=\"color: {}\">{} \
             <span class=\"project-status\">{}</span></div></li>\n",
            escape_html(&project.name),
            options.date(&project.updated_at),
            project.status.color(),
            grade,
            project.status
        ));
    }
    html.push_str("</ul>\n</div>\n</div>\n");
    html
}

// ---------------------------------------------------------------------------
// Audits
// ---------------------------------------------------------------------------

pub fn render_audits_panel(audits: &AuditStats, options: &RenderOptions) -> String {
    let color = audits.category.color();
    let mut html = String::from("<h3>Audit Activity</h3>\n<div class=\"audit-stats\">\n");

    html.push_str(&format!(
        "<div class=\"audit-ratio-container\">\n\
         <p class=\"ratio-value\">Audit Ratio: <strong style=\"color: {color}\">{:.2}</strong></p>\n\
         <div class=\"ratio-message\">{}</div>\n\
         <div class=\"ratio-bars\">\n\
         <div class=\"ratio-label\">XP Given: {}</div>\n\
         <div class=\"ratio-bar given-bar\"><div class=\"ratio-fill given-fill\" style=\"width: {:.1}%\"></div></div>\n\
         <div class=\"ratio-label\">XP Received: {}</div>\n\
         <div class=\"ratio-bar received-bar\"><div class=\"ratio-fill received-fill\" style=\"width: {:.1}%; background-color: {color};\"></div></div>\n\
         </div>\n</div>\n",
        audits.ratio,
        audits.category.message(),
        format_number(audits.total_up),
        audits.bars.given_pct,
        format_number(audits.total_down),
        audits.bars.received_pct,
    ));

    html.push_str(&format!(
        "<div class=\"audit-summary\">\n\
         <div class=\"summary-item\"><span class=\"summary-label\">Total Audits Done:</span> \
         <span class=\"summary-value\">{}</span></div>\n\
         <div class=\"summary-item\"><span class=\"summary-label\">Average Grade Given:</span> \
         <span class=\"summary-value\">{:.1}</span></div>\n\
         </div>\n",
        audits.summary.count, audits.summary.average_grade
    ));

    html.push_str("<div class=\"recent-audits\">\n<h4>Recent Audits</h4>\n<ul class=\"audit-list\">\n");
    for audit in &audits.recent {
        let grade = audit
            .grade
            .map(format_grade)
            .unwrap_or_else(|| "Pending".to_string());
        html.push_str(&format!(
            "<li class=\"audit-item\"><div class=\"audit-grade\">Grade: {grade}</div>\
             <div class=\"audit-date\">{}</div></li>\n",
            options.date(&audit.created_at)
        ));
    }
    html.push_str("</ul>\n</div>\n</div>\n");
    html
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
