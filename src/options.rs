//! Typed option structures for each drawing primitive.
//!
//! Every field is optional so that "not set" can be told apart from a default value;
//! this is what lets [`crate::merge`] fill in shared defaults without overwriting
//! values a panel set itself. Unknown keys are rejected when parsing.

use crate::error::PlotError;
use crate::style::{Color, Colormap, LineDash, MarkerShape};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Style of one line series (`y_kwargs`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineOptions {
    pub label: Option<String>,
    pub color: Option<Color>,
    pub linestyle: Option<LineDash>,
    pub linewidth: Option<f64>,
    pub alpha: Option<f64>,
    pub marker: Option<MarkerShape>,
    pub markersize: Option<f64>,
    pub zorder: Option<f64>,
}

/// Style of a stacked area group (`stacks_kwargs`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackOptions {
    pub labels: Option<Vec<String>>,
    pub colors: Option<Vec<Color>>,
    pub alpha: Option<f64>,
}

/// Where a bar sits relative to its x value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarAlign {
    #[default]
    Center,
    /// Left edge at x.
    Edge,
}

/// Style of a bar series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BarOptions {
    /// Bar width in data units; 0.8 when unset.
    pub width: Option<f64>,
    pub align: Option<BarAlign>,
    pub color: Option<Color>,
    /// One color per bar; wins over `color`.
    pub colors: Option<Vec<Color>>,
    pub alpha: Option<f64>,
    pub label: Option<String>,
}

/// Color-mapped grid of values (2D histograms).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageOptions {
    pub cmap: Option<Colormap>,
    /// Logarithmic color normalisation; cells with values <= 0 are left empty.
    pub log_norm: Option<bool>,
    pub colorbar: Option<bool>,
    pub colorbar_label: Option<String>,
    /// Format of the colorbar tick labels.
    pub ctick_format: Option<NumberFormat>,
}

/// Bin count or explicit bin edges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bins {
    Count(usize),
    Edges(Vec<f64>),
}

/// Histogram binning and style (`hist_kwargs`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistOptions {
    pub bins: Option<Bins>,
    pub range: Option<[f64; 2]>,
    pub density: Option<bool>,
    /// Log-spaced bins between `max(min(samples), bin_min)` and `max(samples)`.
    pub log_bins: Option<bool>,
    pub bin_min: Option<f64>,
    pub color: Option<Color>,
    pub alpha: Option<f64>,
    pub label: Option<String>,
}

/// One horizontal (`y`) or vertical (`x`) reference line.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefLine {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub color: Option<Color>,
    pub linestyle: Option<LineDash>,
    pub linewidth: Option<f64>,
    pub alpha: Option<f64>,
    pub label: Option<String>,
    pub zorder: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendLoc {
    #[default]
    Best,
    #[serde(rename = "upper right")]
    UpperRight,
    #[serde(rename = "upper left")]
    UpperLeft,
    #[serde(rename = "lower left")]
    LowerLeft,
    #[serde(rename = "lower right")]
    LowerRight,
    #[serde(rename = "center left")]
    CenterLeft,
    #[serde(rename = "center right")]
    CenterRight,
    #[serde(rename = "lower center")]
    LowerCenter,
    #[serde(rename = "upper center")]
    UpperCenter,
    Center,
}

/// Legend placement and frame (`legend_kwargs`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegendOptions {
    pub loc: Option<LegendLoc>,
    pub frameon: Option<bool>,
    pub framealpha: Option<f64>,
    pub fontsize: Option<f64>,
    pub title: Option<String>,
}

/// Style of the tick grid overlay.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TickGridOptions {
    pub alpha: Option<f64>,
    pub color: Option<Color>,
    pub linestyle: Option<LineDash>,
    pub linewidth: Option<f64>,
    pub xtick_grid: Option<bool>,
    pub ytick_grid: Option<bool>,
}

/// How tick values are turned into text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberFormat {
    /// Fixed number of decimals; adaptive when unset.
    pub decimals: Option<usize>,
    /// Multiply by 100 and append `%`.
    pub percentage: Option<bool>,
    /// Abbreviate with K/M/B/T.
    pub order_of_magnitude: Option<bool>,
    /// Locale tag for thousands separators (`en`, `de`, `fr`, ...).
    pub locale: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Render values as Unix timestamps instead of numbers.
    pub timestamp: Option<TimestampMode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    /// `2024-01-31 12:00:00`
    Iso,
    /// `2024-01-31`
    Date,
}

/// Lookup table from tick value to label. Parsed from a JSON object keyed by the tick value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct TickLabelMap(pub Vec<(f64, String)>);

impl TickLabelMap {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (f64, S)>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(|(v, s)| (v, s.into())).collect())
    }

    /// Label for a tick value, matched with a relative tolerance.
    pub fn get(&self, value: f64) -> Option<&str> {
        let tol = 1e-9 * value.abs().max(1.0);
        self.0
            .iter()
            .find(|(k, _)| (k - value).abs() <= tol)
            .map(|(_, s)| s.as_str())
    }
}

impl TryFrom<BTreeMap<String, String>> for TickLabelMap {
    type Error = PlotError;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, PlotError> {
        let mut entries = Vec::with_capacity(raw.len());
        for (key, label) in raw {
            let value = key
                .trim()
                .parse::<f64>()
                .map_err(|_| PlotError::Config(format!("tick map key is not a number: {key}")))?;
            entries.push((value, label));
        }
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self(entries))
    }
}

impl From<TickLabelMap> for BTreeMap<String, String> {
    fn from(map: TickLabelMap) -> Self {
        map.0.into_iter().map(|(v, s)| (v.to_string(), s)).collect()
    }
}

/// Settings applied after the formatter and rotation; they win over both.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TickOverrides {
    pub rotation: Option<f64>,
    pub fontsize: Option<f64>,
    /// Fixed tick positions.
    pub ticks: Option<Vec<f64>>,
    /// Labels for `ticks`, same length.
    pub labels: Option<Vec<String>>,
}

/// A caller-supplied tick label function. Only available through the Rust API.
#[derive(Clone)]
pub struct TickFn(Arc<dyn Fn(f64) -> String + Send + Sync>);

impl TickFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for TickFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TickFn(..)")
    }
}

impl PartialEq for TickFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// X tick formatting (`xtick_format`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XTickFormat {
    /// Degrees; defaults to -25. Negative left-aligns labels, positive right-aligns, zero centers.
    pub rotation: Option<f64>,
    /// Shorthand for `number.timestamp`.
    pub timestamps: Option<TimestampMode>,
    pub tickmap: Option<TickLabelMap>,
    pub number: Option<NumberFormat>,
    pub overrides: Option<TickOverrides>,
    #[serde(skip)]
    pub formatter: Option<TickFn>,
}

/// Y tick formatting (`ytick_format`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YTickFormat {
    pub number: Option<NumberFormat>,
    pub overrides: Option<TickOverrides>,
    #[serde(skip)]
    pub formatter: Option<TickFn>,
}
