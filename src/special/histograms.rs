//! Histograms on log scales: a 1D histogram with log x, and 2D counts shown as an image.

use crate::engine::{Axes, Axis, AxisScale};
use crate::error::{PlotError, Result};
use crate::histogram::{BinSpec2d, Hist2d, LogAxes, histogram_2d, log_bins};
use crate::options::{Bins, HistOptions, ImageOptions, NumberFormat, TickOverrides};
use crate::style::Colormap;
use crate::ticks::format_number;

/// Smallest automatic lower limit of a log x histogram.
const MIN_LOG_X: f64 = 1e-11;

/// Options for [`plot_log_x_histogram`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogHistOptions {
    /// Binned range; `[max(min(samples), 1e-11), max(samples)]` when unset.
    pub xlim: Option<[f64; 2]>,
    /// Number of bin edges.
    pub n_bins: usize,
    /// Lower limit used instead of the sample minimum when `xlim` is unset.
    pub bin_min: Option<f64>,
    /// Everything else is passed to the histogram as is; its `bins` are replaced.
    pub hist: HistOptions,
}

impl Default for LogHistOptions {
    fn default() -> Self {
        Self {
            xlim: None,
            n_bins: 30,
            bin_min: None,
            hist: HistOptions::default(),
        }
    }
}

/// Histogram over log-spaced bins, drawn on a log x axis.
pub fn plot_log_x_histogram<A: Axes + ?Sized>(
    axes: &mut A,
    samples: &[f64],
    opts: &LogHistOptions,
) -> Result<()> {
    let [lo, hi] = match opts.xlim {
        Some(lim) => lim,
        None => {
            let mut finite = samples.iter().copied().filter(|v| v.is_finite());
            let first = finite
                .next()
                .ok_or_else(|| PlotError::InvalidBins("cannot bin an empty sample".into()))?;
            let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
            [opts.bin_min.unwrap_or(min.max(MIN_LOG_X)), max]
        }
    };
    let edges = log_bins(&[lo, hi], opts.n_bins, Some(lo))?;
    let hist = HistOptions {
        bins: Some(Bins::Edges(edges)),
        ..opts.hist.clone()
    };
    axes.hist(samples, &hist)?;
    axes.set_scale(Axis::X, AxisScale::Log);
    Ok(())
}

/// Options for [`plot_2d_log_histogram`].
#[derive(Debug, Clone, PartialEq)]
pub struct Hist2dPlotOptions {
    pub bins: BinSpec2d,
    pub cmap: Colormap,
    pub colorbar: bool,
    /// Logarithmic color scale; empty cells stay blank.
    pub log: bool,
    pub xtick_format: Option<NumberFormat>,
    pub ytick_format: Option<NumberFormat>,
    /// Thin the tick labels out to this many, evenly spread over the edges.
    pub n_xticks: Option<usize>,
    pub n_yticks: Option<usize>,
    pub log_axes: LogAxes,
    pub colorbar_label: Option<String>,
    pub ctick_format: Option<NumberFormat>,
}

impl Default for Hist2dPlotOptions {
    fn default() -> Self {
        Self {
            bins: BinSpec2d::default(),
            cmap: Colormap::default(),
            colorbar: true,
            log: true,
            xtick_format: None,
            ytick_format: None,
            n_xticks: None,
            n_yticks: None,
            log_axes: LogAxes::default(),
            colorbar_label: None,
            ctick_format: None,
        }
    }
}

/// Count `(x, y)` pairs on a grid and show the counts as a color-mapped image.
///
/// Ticks sit on the cell boundaries and carry the bin edge values; x labels are turned
/// vertical. Returns the counts and edges.
pub fn plot_2d_log_histogram<A: Axes + ?Sized>(
    axes: &mut A,
    x: &[f64],
    y: &[f64],
    opts: &Hist2dPlotOptions,
) -> Result<Hist2d> {
    let hist = histogram_2d(x, y, &opts.bins, &opts.log_axes)?;
    axes.imshow(
        &hist.counts,
        &ImageOptions {
            cmap: Some(opts.cmap),
            log_norm: Some(opts.log),
            colorbar: Some(opts.colorbar),
            colorbar_label: opts.colorbar_label.clone(),
            ctick_format: opts.ctick_format.clone(),
        },
    )?;

    let (ticks, labels) = get_ticks(&hist.x_edges, opts.xtick_format.as_ref(), opts.n_xticks);
    axes.apply_tick_overrides(
        Axis::X,
        &TickOverrides {
            rotation: Some(270.0),
            ticks: Some(ticks),
            labels: Some(labels),
            ..Default::default()
        },
    )?;
    let (ticks, labels) = get_ticks(&hist.y_edges, opts.ytick_format.as_ref(), opts.n_yticks);
    axes.apply_tick_overrides(
        Axis::Y,
        &TickOverrides {
            ticks: Some(ticks),
            labels: Some(labels),
            ..Default::default()
        },
    )?;
    Ok(hist)
}

/// Tick positions on the image cell boundaries (`i - 0.5`) labelled with bin edge `i`.
///
/// With `n_ticks`, only that many edges are kept, spread evenly from first to last.
pub fn get_ticks(
    edges: &[f64],
    format: Option<&NumberFormat>,
    n_ticks: Option<usize>,
) -> (Vec<f64>, Vec<String>) {
    let default_format = NumberFormat::default();
    let format = format.unwrap_or(&default_format);
    let indices: Vec<usize> = match n_ticks {
        None => (0..edges.len()).collect(),
        Some(_) if edges.is_empty() => Vec::new(),
        Some(0) => Vec::new(),
        Some(1) => vec![0],
        Some(n) => {
            let last = (edges.len() - 1) as f64;
            (0..n)
                .map(|k| (last * k as f64 / (n - 1) as f64) as usize)
                .collect()
        }
    };
    indices
        .iter()
        .filter_map(|&i| edges.get(i).map(|e| (i as f64 - 0.5, format_number(*e, format))))
        .unzip()
}
