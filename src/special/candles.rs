//! OHLC (open/high/low/close) price charts.

use crate::engine::Axes;
use crate::error::Result;
use crate::options::{BarAlign, BarOptions, LineOptions};
use crate::style::{Color, LineDash, MarkerShape};
use serde::{Deserialize, Serialize};

/// Share of the candle interval covered by a body.
pub const DEFAULT_SHRINK_FACTOR: f64 = 0.75;
pub const DEFAULT_OVERLAY_ALPHA: f64 = 0.3;

/// One candle; `index` is the start of its interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlc {
    pub index: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Ohlc {
    /// Green for a rising candle, red otherwise.
    fn color(&self) -> Color {
        if self.open < self.close {
            Color::GREEN
        } else {
            Color::RED
        }
    }
}

/// Candle bodies from open to close plus wicks out to high and low.
///
/// Bodies start at each candle's index and span `shrink_factor` of the spacing between the
/// first two candles (a unit spacing with fewer than two).
pub fn plot_ohlc_candles<A: Axes + ?Sized>(
    axes: &mut A,
    candles: &[Ohlc],
    shrink_factor: f64,
) -> Result<()> {
    if candles.is_empty() {
        return Ok(());
    }
    let interval = match candles {
        [first, second, ..] => second.index - first.index,
        _ => 1.0,
    };
    let width = interval * shrink_factor;

    let x: Vec<f64> = candles.iter().map(|c| c.index).collect();
    let bottoms: Vec<f64> = candles.iter().map(|c| c.open.min(c.close)).collect();
    let heights: Vec<f64> = candles.iter().map(|c| (c.open - c.close).abs()).collect();
    let bodies = BarOptions {
        width: Some(width),
        align: Some(BarAlign::Edge),
        colors: Some(candles.iter().map(Ohlc::color).collect()),
        ..Default::default()
    };
    axes.bar(&x, &heights, Some(&bottoms), &bodies)?;

    for c in candles {
        let mid = c.index + width / 2.0;
        let wick = LineOptions {
            color: Some(c.color()),
            ..Default::default()
        };
        let (top, bottom) = (c.open.max(c.close), c.open.min(c.close));
        axes.plot(Some(&[mid, mid]), &[top, c.high], &wick)?;
        axes.plot(Some(&[mid, mid]), &[bottom, c.low], &wick)?;
    }
    Ok(())
}

/// Raw values drawn over candles as faint black dots joined by a thin line.
pub fn plot_ohlc_candles_raw_overlay<A: Axes + ?Sized>(
    axes: &mut A,
    values: &[f64],
    indices: &[f64],
    alpha: f64,
) -> Result<()> {
    let dots = LineOptions {
        color: Some(Color::BLACK),
        linestyle: Some(LineDash::Blank),
        marker: Some(MarkerShape::Point),
        markersize: Some(10.0),
        alpha: Some(alpha),
        zorder: Some(99.0),
        ..Default::default()
    };
    axes.plot(Some(indices), values, &dots)?;
    let line = LineOptions {
        color: Some(Color::BLACK),
        linewidth: Some(1.0),
        alpha: Some(alpha),
        zorder: Some(99.0),
        ..Default::default()
    };
    axes.plot(Some(indices), values, &line)
}

/// Open, high, low and close as four labelled dotted lines.
pub fn plot_ohlc_as_lines<A: Axes + ?Sized>(axes: &mut A, candles: &[Ohlc]) -> Result<()> {
    let x: Vec<f64> = candles.iter().map(|c| c.index).collect();
    let fields: [(&str, fn(&Ohlc) -> f64); 4] = [
        ("open", |c| c.open),
        ("high", |c| c.high),
        ("low", |c| c.low),
        ("close", |c| c.close),
    ];
    for (name, field) in fields {
        let y: Vec<f64> = candles.iter().map(field).collect();
        let opts = LineOptions {
            label: Some(name.to_string()),
            linewidth: Some(0.5),
            marker: Some(MarkerShape::Point),
            ..Default::default()
        };
        axes.plot(Some(&x), &y, &opts)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DrawCall, RecordingAxes};

    fn candles() -> Vec<Ohlc> {
        vec![
            Ohlc { index: 0.0, open: 1.0, high: 3.0, low: 0.5, close: 2.0 },
            Ohlc { index: 2.0, open: 2.0, high: 2.5, low: 1.0, close: 1.5 },
        ]
    }

    #[test]
    fn bodies_span_open_to_close_in_direction_colors() {
        let mut axes = RecordingAxes::new();
        plot_ohlc_candles(&mut axes, &candles(), DEFAULT_SHRINK_FACTOR).unwrap();
        match &axes.calls[0] {
            DrawCall::Bar { x, heights, bottom, opts } => {
                assert_eq!(x, &vec![0.0, 2.0]);
                assert_eq!(heights, &vec![1.0, 0.5]);
                assert_eq!(bottom, &Some(vec![1.0, 1.5]));
                assert_eq!(opts.width, Some(1.5));
                assert_eq!(opts.align, Some(BarAlign::Edge));
                assert_eq!(opts.colors, Some(vec![Color::GREEN, Color::RED]));
            }
            other => panic!("expected bodies first, got {other:?}"),
        }
    }

    #[test]
    fn wicks_rise_from_the_body_center() {
        let mut axes = RecordingAxes::new();
        plot_ohlc_candles(&mut axes, &candles(), DEFAULT_SHRINK_FACTOR).unwrap();
        let wicks: Vec<(Vec<f64>, Vec<f64>)> = axes
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Plot { x: Some(x), y, .. } => Some((x.clone(), y.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(wicks.len(), 4);
        assert_eq!(wicks[0], (vec![0.75, 0.75], vec![2.0, 3.0]));
        assert_eq!(wicks[1], (vec![0.75, 0.75], vec![1.0, 0.5]));
        assert_eq!(wicks[3], (vec![2.75, 2.75], vec![1.5, 1.0]));
    }

    #[test]
    fn a_single_candle_uses_unit_spacing() {
        let mut axes = RecordingAxes::new();
        plot_ohlc_candles(&mut axes, &candles()[..1], 0.5).unwrap();
        assert!(matches!(
            &axes.calls[0],
            DrawCall::Bar { opts, .. } if opts.width == Some(0.5)
        ));
        let mut empty = RecordingAxes::new();
        plot_ohlc_candles(&mut empty, &[], 0.5).unwrap();
        assert!(empty.calls.is_empty());
    }

    #[test]
    fn overlay_draws_dots_then_line_on_top() {
        let mut axes = RecordingAxes::new();
        plot_ohlc_candles_raw_overlay(&mut axes, &[1.0, 2.0], &[0.0, 1.0], DEFAULT_OVERLAY_ALPHA)
            .unwrap();
        let styles: Vec<&LineOptions> = axes
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Plot { opts, .. } => Some(opts),
                _ => None,
            })
            .collect();
        assert_eq!(styles[0].linestyle, Some(LineDash::Blank));
        assert_eq!(styles[0].marker, Some(MarkerShape::Point));
        assert_eq!(styles[1].linewidth, Some(1.0));
        assert!(styles.iter().all(|s| s.zorder == Some(99.0) && s.alpha == Some(0.3)));
    }

    #[test]
    fn lines_are_labelled_by_field() {
        let mut axes = RecordingAxes::new();
        plot_ohlc_as_lines(&mut axes, &candles()).unwrap();
        let labels: Vec<String> = axes
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Plot { opts, .. } => opts.label.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(labels, ["open", "high", "low", "close"]);
        assert!(matches!(
            &axes.calls[3],
            DrawCall::Plot { y, .. } if y == &vec![2.0, 1.5]
        ));
    }
}
