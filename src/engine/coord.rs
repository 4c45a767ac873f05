//! Plotters coordinate for one panel axis: linear or log mapping, with the tick positions
//! decided by the panel model rather than by plotters.

use super::AxisScale;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use std::ops::Range;

/// Fallback lower bound of a log axis whose range reaches zero or below.
const LOG_FLOOR_RATIO: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct PinnedAxis {
    lo: f64,
    hi: f64,
    scale: AxisScale,
    ticks: Vec<f64>,
}

impl PinnedAxis {
    /// Axis over `lo..hi` (either order). Ticks outside the range are dropped.
    pub fn new(lo: f64, hi: f64, scale: AxisScale, ticks: Vec<f64>) -> Self {
        let (mut lo, mut hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
        if scale == AxisScale::Log {
            if hi <= 0.0 {
                (lo, hi) = (1.0, 10.0);
            } else if lo <= 0.0 {
                lo = hi * LOG_FLOOR_RATIO;
            }
        }
        if lo == hi {
            (lo, hi) = match scale {
                AxisScale::Linear => (lo - 0.5, hi + 0.5),
                AxisScale::Log => (lo / 10.0, hi * 10.0),
            };
        }
        let ticks = ticks
            .into_iter()
            .filter(|t| (lo..=hi).contains(t))
            .collect();
        Self {
            lo,
            hi,
            scale,
            ticks,
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lo, self.hi)
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    /// Position of `value` as a fraction of the axis length.
    fn fraction(&self, value: f64) -> f64 {
        match self.scale {
            AxisScale::Linear => (value - self.lo) / (self.hi - self.lo),
            AxisScale::Log => {
                let v = value.max(self.lo);
                (v.ln() - self.lo.ln()) / (self.hi.ln() - self.lo.ln())
            }
        }
    }
}

impl Ranged for PinnedAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let pixels = limit.1 - limit.0;
        if pixels == 0 {
            return limit.1;
        }
        limit.0 + (pixels as f64 * self.fraction(*value) + 1e-3).floor() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.max_num_points() == 0 {
            return Vec::new();
        }
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.lo..self.hi
    }
}
