/// Chart projector and renderer tests.
use xpdash::chart::{DonutGeometry, LineChartGeometry, LineChartSettings};
use xpdash::render::charts::{render_donut, render_line_chart};
use xpdash::render::{RenderOptions, format_number};
use xpdash::stats::{ProjectClassification, XpPoint};

fn point(at: &str, xp: i64) -> XpPoint {
    XpPoint {
        at: at.parse().unwrap(),
        xp,
    }
}

// ---------------------------------------------------------------------------
// Donut
// ---------------------------------------------------------------------------

#[test]
fn donut_three_to_one() {
    let donut = DonutGeometry::new(3, 1, 60.0);
    assert_eq!(donut.passed_pct, 75.0);
    assert_eq!(donut.failed_pct, 25.0);
    assert!((donut.passed_rotation_offset - 90.0).abs() < 1e-9);
}

#[test]
fn donut_svg_legend() {
    let c = ProjectClassification {
        passed: 3,
        failed: 1,
        in_progress: 2,
        total: 6,
    };
    let svg = render_donut(&c, 60.0);
    assert!(svg.contains("Successful: 3 (75.0%)"));
    assert!(svg.contains("No XP: 1 (25.0%)"));
    assert!(svg.contains("stroke=\"#2ecc71\""));
    assert!(svg.contains("stroke=\"#e74c3c\""));
}

// ---------------------------------------------------------------------------
// Line chart
// ---------------------------------------------------------------------------

#[test]
fn line_chart_scales() {
    let series = vec![
        point("2024-01-01T00:00:00Z", 2_000),
        point("2024-06-01T00:00:00Z", 18_000),
        point("2024-12-01T00:00:00Z", 21_000),
    ];
    let chart = LineChartGeometry::project(&series, &LineChartSettings::default());

    assert_eq!(chart.xp_max, 30_000);
    assert_eq!(chart.points[0].x, 0.0);
    assert_eq!(chart.points[2].x, chart.width);
    assert_eq!(chart.points[2].y, chart.height - 0.7 * chart.height);
    assert_eq!(chart.ticks.len(), 6);
    assert_eq!(chart.ticks.last().unwrap().value, 30_000);
}

#[test]
fn line_chart_same_instant_points() {
    let series = vec![
        point("2024-01-01T00:00:00Z", 500),
        point("2024-01-01T00:00:00Z", 1_500),
    ];
    let chart = LineChartGeometry::project(&series, &LineChartSettings::default());
    assert!(chart.points.iter().all(|p| p.x == 0.0));
}

#[test]
fn custom_intervals() {
    let settings = LineChartSettings {
        y_intervals: 4,
        ..LineChartSettings::default()
    };
    let chart = LineChartGeometry::project(&[point("2024-01-01T00:00:00Z", 40_000)], &settings);
    let values: Vec<i64> = chart.ticks.iter().map(|t| t.value).collect();
    assert_eq!(values, vec![0, 10_000, 20_000, 30_000, 40_000]);
}

#[test]
fn line_chart_svg_markers_have_tooltips() {
    let series = vec![
        point("2024-01-01T00:00:00Z", 1_200),
        point("2024-02-01T00:00:00Z", 3_400),
    ];
    let svg = render_line_chart(&series, &RenderOptions::default());
    assert_eq!(svg.matches("<title>Date: ").count(), 2);
    assert!(svg.contains(&format!("Total XP: {}", format_number(3_400))));
    assert!(svg.contains("<path d=\"M0 "));
}
