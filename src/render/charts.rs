//! SVG markup for the donut and line charts.

use crate::chart::{DonutGeometry, LineChartGeometry, coord};
use crate::stats::{ProjectClassification, XpPoint};

use super::{RenderOptions, format_number};

const PASSED_COLOR: &str = "#2ecc71";
const FAILED_COLOR: &str = "#e74c3c";
const LINE_COLOR: &str = "#0097e6";

/// Donut center in the 200x200 view box.
const DONUT_CENTER: f64 = 100.0;
const DONUT_STROKE: u32 = 15;

pub fn render_donut(classification: &ProjectClassification, radius: f64) -> String {
    let donut = DonutGeometry::from_classification(classification, radius);
    let c = coord(DONUT_CENTER);
    let r = coord(donut.radius);
    let circumference = coord(donut.circumference);

    let arc = |color: &str, offset: f64, rotation: f64, class: &str| {
        format!(
            "<circle cx=\"{c}\" cy=\"{c}\" r=\"{r}\" fill=\"transparent\" stroke=\"{color}\" \
             stroke-width=\"{DONUT_STROKE}\" stroke-dasharray=\"{circumference}\" \
             stroke-dashoffset=\"{}\" transform=\"rotate({} {c} {c})\" \
             class=\"donut-segment {class}\" />\n",
            coord(offset),
            coord(rotation)
        )
    };

    let mut svg = String::from("<div class=\"chart-container\">\n");
    svg.push_str("<svg width=\"180\" height=\"180\" viewBox=\"0 0 200 200\" class=\"donut-chart\">\n");
    svg.push_str(&format!(
        "<circle cx=\"{c}\" cy=\"{c}\" r=\"{r}\" fill=\"transparent\" stroke=\"#333\" stroke-width=\"{DONUT_STROKE}\" />\n"
    ));
    if !donut.is_empty() {
        svg.push_str(&arc(
            FAILED_COLOR,
            donut.failed_offset,
            donut.failed_rotation(),
            "donut-segment-failed",
        ));
        svg.push_str(&arc(
            PASSED_COLOR,
            donut.passed_offset,
            donut.passed_rotation(),
            "donut-segment-passed",
        ));
    }
    svg.push_str(&format!(
        "<text x=\"{c}\" y=\"95\" text-anchor=\"middle\" class=\"donut-text\">{:.0}%</text>\n\
         <text x=\"{c}\" y=\"115\" text-anchor=\"middle\" class=\"donut-subtext\">Success</text>\n\
         </svg>\n",
        donut.passed_pct
    ));

    svg.push_str(&format!(
        "<div class=\"chart-legend\">\n\
         <div class=\"legend-item\"><span class=\"legend-color\" style=\"background-color: {PASSED_COLOR};\"></span>\
         <span>Successful: {} ({:.1}%)</span></div>\n\
         <div class=\"legend-item\"><span class=\"legend-color\" style=\"background-color: {FAILED_COLOR};\"></span>\
         <span>No XP: {} ({:.1}%)</span></div>\n\
         </div>\n</div>\n",
        donut.passed, donut.passed_pct, donut.failed, donut.failed_pct
    ));
    svg
}

pub fn render_line_chart(points: &[XpPoint], options: &RenderOptions) -> String {
    let chart = LineChartGeometry::project(points, &options.line_chart);
    let w = coord(chart.width);
    let h = coord(chart.height);

    let mut svg = String::from("<h3>XP Progress Over Time</h3>\n");
    svg.push_str(&format!(
        "<svg width=\"{}\" height=\"{}\" class=\"line-chart\">\n<g transform=\"translate({}, {})\">\n",
        coord(chart.outer_width()),
        coord(chart.outer_height()),
        chart.margins.left,
        chart.margins.top
    ));

    // Axes and titles.
    svg.push_str(&format!(
        "<line x1=\"0\" y1=\"{h}\" x2=\"{w}\" y2=\"{h}\" stroke=\"#666\" stroke-width=\"2\" />\n\
         <line x1=\"0\" y1=\"0\" x2=\"0\" y2=\"{h}\" stroke=\"#666\" stroke-width=\"2\" />\n\
         <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" fill=\"#fff\">Time</text>\n\
         <text x=\"-40\" y=\"{}\" text-anchor=\"middle\" transform=\"rotate(-90, -40, {})\" fill=\"#fff\">XP</text>\n",
        coord(chart.width / 2.0),
        coord(chart.height + 40.0),
        coord(chart.height / 2.0),
        coord(chart.height / 2.0)
    ));

    for tick in &chart.ticks {
        let y = coord(tick.y);
        svg.push_str(&format!(
            "<line x1=\"0\" y1=\"{y}\" x2=\"{w}\" y2=\"{y}\" stroke=\"#333\" stroke-width=\"1\" stroke-dasharray=\"5,5\" />\n\
             <text x=\"-10\" y=\"{}\" text-anchor=\"end\" fill=\"#fff\">{}</text>\n",
            coord(tick.y + 5.0),
            format_number(tick.value)
        ));
    }

    if let Some(path) = chart.path_data() {
        svg.push_str(&format!(
            "<path d=\"{path}\" stroke=\"{LINE_COLOR}\" stroke-width=\"3\" fill=\"none\" />\n"
        ));
    }

    for point in &chart.points {
        svg.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"4\" fill=\"{LINE_COLOR}\">\
             <title>Date: {}\nTotal XP: {}</title></circle>\n",
            coord(point.x),
            coord(point.y),
            options.date(&point.at),
            format_number(point.xp)
        ));
    }

    svg.push_str("</g>\n</svg>\n");
    svg
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
