//! Pass/fail donut.
//!
//! Two stroked circles share a center. Each arc's visible length comes from
//! `stroke-dashoffset`; the failed arc starts at the top (-90 degrees) and
//! the passed arc is rotated to begin where the failed one ends.

use std::f64::consts::PI;

use serde::Serialize;

use crate::stats::{ProjectClassification, percentage};

/// Degrees per percentage point of the full circle.
const DEGREES_PER_PCT: f64 = 3.6;

/// Rotation that puts an arc's start at twelve o'clock.
pub const START_ANGLE: f64 = -90.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DonutGeometry {
    pub radius: f64,
    pub circumference: f64,
    pub passed: usize,
    pub failed: usize,
    pub passed_pct: f64,
    pub failed_pct: f64,
    pub passed_offset: f64,
    pub failed_offset: f64,
    /// Rotation of the passed arc relative to the failed arc's start.
    pub passed_rotation_offset: f64,
}

impl DonutGeometry {
    pub fn new(passed: usize, failed: usize, radius: f64) -> Self {
        let circumference = 2.0 * PI * radius;
        let graded = passed + failed;
        let passed_pct = percentage(passed, graded);
        let failed_pct = percentage(failed, graded);

        Self {
            radius,
            circumference,
            passed,
            failed,
            passed_pct,
            failed_pct,
            passed_offset: dash_offset(circumference, passed_pct),
            failed_offset: dash_offset(circumference, failed_pct),
            passed_rotation_offset: failed_pct * DEGREES_PER_PCT,
        }
    }

    pub fn from_classification(classification: &ProjectClassification, radius: f64) -> Self {
        Self::new(classification.passed, classification.failed, radius)
    }

    /// Absolute rotation of the failed arc.
    pub fn failed_rotation(&self) -> f64 {
        START_ANGLE
    }

    /// Absolute rotation of the passed arc.
    pub fn passed_rotation(&self) -> f64 {
        START_ANGLE + self.passed_rotation_offset
    }

    pub fn is_empty(&self) -> bool {
        self.passed + self.failed == 0
    }
}

/// `C * (1 - pct / 100)`: hides the part of the stroke past `pct`.
fn dash_offset(circumference: f64, pct: f64) -> f64 {
    circumference * (1.0 - pct / 100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
