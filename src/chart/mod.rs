//! Chart Projector: statistics in, drawing coordinates out.
//!
//! Both charts are pure geometry. Nothing here knows about markup; the
//! renderer turns these values into SVG.

pub mod donut;
pub mod line;

pub use donut::DonutGeometry;
pub use line::{LineChartGeometry, LineChartSettings, Margins, PlotPoint, YTick};

/// Format a coordinate for an SVG attribute: at most two decimals, no
/// trailing zeros.
pub fn coord(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_trims_trailing_zeros() {
        assert_eq!(coord(340.0), "340");
        assert_eq!(coord(12.5), "12.5");
        assert_eq!(coord(1.0 / 3.0), "0.33");
        assert_eq!(coord(-0.001), "0");
        assert_eq!(coord(0.0), "0");
    }
}
