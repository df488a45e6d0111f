/// Statistics engine tests.
///
/// Builds subjects from GraphQL-shaped JSON through the public pipeline so
/// the typed records, the normalizer and the statistics are exercised
/// together.
use serde_json::json;
use xpdash::api::graphql::parse_response;
use xpdash::config::schema::DashboardConfig;
use xpdash::events::EventLog;
use xpdash::pipeline::{Dashboard, build_dashboard};
use xpdash::records::Transaction;
use xpdash::stats::{
    AuditRatioCategory, SIGNIFICANT_XP_DELTA, XpFilter, XpPoint, audit_bars, audit_ratio_category,
    cumulative_xp_series, pass_rate, significant_points, total_xp,
};

fn transaction(id: i64, amount: i64, path: &str, at: &str) -> serde_json::Value {
    json!({
        "id": id, "type": "xp", "amount": amount, "objectId": id * 100,
        "createdAt": at, "path": path, "object": { "name": format!("project-{id}"), "type": "project" }
    })
}

fn dashboard(user: serde_json::Value) -> Dashboard {
    let body = json!({ "data": { "user": [user], "event_user": [] } }).to_string();
    let data = parse_response(&body).unwrap();
    build_dashboard(data, &DashboardConfig::default(), &EventLog::disabled()).unwrap()
}

fn user(transactions: serde_json::Value, progresses: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 1, "login": "jdoe", "createdAt": "2023-09-01T08:00:00Z",
        "auditRatio": 1.0, "totalUp": 0, "totalDown": 0,
        "transactions": transactions, "progresses": progresses, "audits": []
    })
}

fn txs(values: serde_json::Value) -> Vec<Transaction> {
    serde_json::from_value(values).unwrap()
}

// ---------------------------------------------------------------------------
// Piscine exclusion
// ---------------------------------------------------------------------------

#[test]
fn piscine_carve_out_and_exclusion() {
    let filter = XpFilter::default();
    assert!(filter.includes("/rouen/div-01/piscine-js"));
    assert!(!filter.includes("/rouen/div-01/piscine-js/"));
    assert!(!filter.includes("/rouen/div-01/piscine-js-2"));
    assert!(!filter.includes("/rouen/div-01/piscine-go"));
    assert!(!filter.includes("/rouen/div-01/xpiscine-gox/ex00"));
    assert!(filter.includes("/rouen/div-01/graphql"));
}

#[test]
fn custom_filter_markers() {
    let filter = XpFilter::new("/paris/bootcamp", vec!["bootcamp".to_string()]);
    assert!(filter.includes("/paris/bootcamp"));
    assert!(!filter.includes("/paris/bootcamp/day-01"));
    assert!(filter.includes("/paris/piscine-go"));
}

// ---------------------------------------------------------------------------
// XP totals
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_total_is_150() {
    let d = dashboard(user(
        json!([
            transaction(1, 100, "/rouen/div-01/piscine-js", "2024-01-01T00:00:00Z"),
            transaction(2, 50, "/rouen/div-01/other", "2024-01-02T00:00:00Z"),
            transaction(3, 30, "/rouen/div-01/piscine-go/x", "2024-01-03T00:00:00Z"),
        ]),
        json!([]),
    ));
    assert_eq!(d.stats.xp.total, 150);
    assert_eq!(d.stats.series.last().map(|p| p.xp), Some(d.stats.xp.total));
}

#[test]
fn empty_transactions_are_all_zero() {
    let d = dashboard(user(json!([]), json!(null)));
    assert_eq!(d.stats.xp.total, 0);
    assert!(d.stats.xp.monthly.is_empty());
    assert!(d.stats.xp.recent.is_empty());
    assert!(d.stats.series.is_empty());
    assert_eq!(d.stats.projects.pass_rate, 0.0);
}

#[test]
fn total_matches_series_tail() {
    let list = txs(json!([
        transaction(1, 400, "/rouen/div-01/a", "2024-03-01T00:00:00Z"),
        transaction(2, 9000, "/rouen/div-01/b", "2024-01-01T00:00:00Z"),
        transaction(3, 77, "/rouen/piscine-go/c", "2024-02-01T00:00:00Z"),
    ]));
    let filter = XpFilter::default();
    let series = cumulative_xp_series(&list, &filter);
    assert_eq!(series.last().unwrap().xp, total_xp(&list, &filter));
    assert_eq!(series.first().unwrap().xp, 9000);
}

#[test]
fn recent_activity_keeps_five_newest() {
    let list: Vec<serde_json::Value> = (1..=8)
        .map(|i| transaction(i, 10, "/rouen/div-01/p", &format!("2024-01-0{i}T00:00:00Z")))
        .collect();
    let d = dashboard(user(json!(list), json!([])));
    let names: Vec<&str> = d.stats.xp.recent.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["project-8", "project-7", "project-6", "project-5", "project-4"]);
}

// ---------------------------------------------------------------------------
// Series simplification
// ---------------------------------------------------------------------------

#[test]
fn significant_points_keep_endpoints() {
    let list = txs(json!([
        transaction(1, 10, "/rouen/div-01/a", "2024-01-01T00:00:00Z"),
        transaction(2, 20, "/rouen/div-01/b", "2024-01-02T00:00:00Z"),
        transaction(3, 5000, "/rouen/div-01/c", "2024-01-03T00:00:00Z"),
        transaction(4, 30, "/rouen/div-01/d", "2024-01-04T00:00:00Z"),
        transaction(5, 40, "/rouen/div-01/e", "2024-01-05T00:00:00Z"),
    ]));
    let series = cumulative_xp_series(&list, &XpFilter::default());
    let kept: Vec<i64> = significant_points(&series, SIGNIFICANT_XP_DELTA)
        .iter()
        .map(|p| p.xp)
        .collect();
    assert_eq!(kept, vec![10, 5030, 5100]);
}

#[test]
fn significant_points_single_point() {
    let point = XpPoint {
        at: "2024-01-01T00:00:00Z".parse().unwrap(),
        xp: 42,
    };
    assert_eq!(significant_points(&[point], SIGNIFICANT_XP_DELTA), vec![point]);
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[test]
fn pass_rate_from_records() {
    let d = dashboard(user(
        json!([
            transaction(1, 1000, "/rouen/div-01/a", "2024-01-01T00:00:00Z"),
            transaction(2, 0, "/rouen/div-01/b", "2024-01-01T00:00:00Z"),
        ]),
        json!([
            { "id": 1, "objectId": 100, "grade": 1.0, "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z", "path": "/a" },
            { "id": 2, "objectId": 200, "grade": 1.0, "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-02T00:00:00Z", "path": "/b" },
            { "id": 3, "objectId": 300, "grade": null, "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-03T00:00:00Z", "path": "/c" }
        ]),
    ));
    let c = d.stats.projects.classification;
    assert_eq!((c.passed, c.failed, c.in_progress, c.total), (1, 1, 1, 3));
    assert_eq!(d.stats.projects.pass_rate, 50.0);
    assert_eq!(d.stats.projects.recent[0].name, "Unknown Project");
}

#[test]
fn pass_rate_empty_is_zero() {
    assert_eq!(pass_rate(&[], &[]), 0.0);
}

// ---------------------------------------------------------------------------
// Audits
// ---------------------------------------------------------------------------

#[test]
fn audit_category_boundaries() {
    assert_eq!(audit_ratio_category(1.0), AuditRatioCategory::Excellent);
    assert_eq!(audit_ratio_category(0.7), AuditRatioCategory::Good);
    assert_eq!(audit_ratio_category(0.69999), AuditRatioCategory::NeedsImprovement);
}

#[test]
fn audit_bars_relative_to_larger_side() {
    let bars = audit_bars(2_000, 4_000);
    assert_eq!(bars.given_pct, 50.0);
    assert_eq!(bars.received_pct, 100.0);
}
