//! XP-over-time line chart.
//!
//! Coordinates are relative to the plotting area, whose origin is translated
//! by the left and top margins. The X axis maps the earliest..latest point
//! onto `[0, width]`; the Y axis maps `[0, xp_max]` onto `[height, 0]`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::schema::ChartConfig;
use crate::stats::XpPoint;

use super::coord;

/// Space reserved for the chart title above the plot.
pub const TITLE_HEIGHT: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 40,
            right: 40,
            bottom: 60,
            left: 80,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineChartSettings {
    /// Container width.
    pub width: u32,
    /// Container height, title included.
    pub height: u32,
    pub margins: Margins,
    pub y_intervals: u32,
    pub xp_rounding: i64,
}

impl LineChartSettings {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            margins: Margins::default(),
            y_intervals: config.y_ticks,
            xp_rounding: config.xp_rounding,
        }
    }
}

impl Default for LineChartSettings {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

/// A point projected into plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub at: DateTime<Utc>,
    pub xp: i64,
}

/// One horizontal gridline with its label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YTick {
    pub y: f64,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChartGeometry {
    pub margins: Margins,
    /// Plotting area width.
    pub width: f64,
    /// Plotting area height.
    pub height: f64,
    pub xp_max: i64,
    pub ticks: Vec<YTick>,
    pub points: Vec<PlotPoint>,
}

impl LineChartGeometry {
    pub fn project(series: &[XpPoint], settings: &LineChartSettings) -> Self {
        let m = settings.margins;
        let width = f64::from(settings.width.saturating_sub(m.left + m.right));
        let height = f64::from(
            settings
                .height
                .saturating_sub(m.top + m.bottom + TITLE_HEIGHT),
        );

        let xp_max = series
            .last()
            .map(|p| round_up(p.xp, settings.xp_rounding))
            .unwrap_or(0);

        let intervals = settings.y_intervals.max(1);
        let ticks = (0..=intervals)
            .map(|i| {
                let i = f64::from(i);
                let n = f64::from(intervals);
                YTick {
                    y: height - i * height / n,
                    value: (i * xp_max as f64 / n).round() as i64,
                }
            })
            .collect();

        let points = match (series.first(), series.last()) {
            (Some(first), Some(last)) => {
                let start = first.at.timestamp_millis();
                let span = (last.at.timestamp_millis() - start) as f64;
                series
                    .iter()
                    .map(|p| {
                        let x = if span > 0.0 {
                            (p.at.timestamp_millis() - start) as f64 / span * width
                        } else {
                            0.0
                        };
                        let y = if xp_max > 0 {
                            height - (p.xp as f64 / xp_max as f64) * height
                        } else {
                            height
                        };
                        PlotPoint {
                            x,
                            y,
                            at: p.at,
                            xp: p.xp,
                        }
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        Self {
            margins: m,
            width,
            height,
            xp_max,
            ticks,
            points,
        }
    }

    /// SVG path data through every point in order, `None` without points.
    pub fn path_data(&self) -> Option<String> {
        if self.points.is_empty() {
            return None;
        }
        let segments: Vec<String> = self
            .points
            .iter()
            .map(|p| format!("{} {}", coord(p.x), coord(p.y)))
            .collect();
        Some(format!("M{}", segments.join(" L")))
    }

    /// Outer SVG width.
    pub fn outer_width(&self) -> f64 {
        self.width + f64::from(self.margins.left + self.margins.right)
    }

    /// Outer SVG height, title excluded.
    pub fn outer_height(&self) -> f64 {
        self.height + f64::from(self.margins.top + self.margins.bottom)
    }
}

/// Smallest multiple of `step` that is >= `xp`; negatives clamp to 0.
fn round_up(xp: i64, step: i64) -> i64 {
    let xp = xp.max(0);
    if step <= 0 {
        return xp;
    }
    (xp + step - 1) / step * step
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
