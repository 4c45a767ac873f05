//! Histogram binning: 1D linear/log bins and 2D bin specifications.

use crate::error::{PlotError, Result};
use crate::options::{Bins, HistOptions};

/// Bin count used when a histogram does not say.
pub const DEFAULT_BINS: usize = 10;

/// Smallest lower edge for log bins when none is given.
pub const DEFAULT_LOG_BIN_MIN: f64 = 1e-15;

/// Largest number of edges any binning routine will allocate.
pub const MAX_BINS: usize = 1_000_000;

fn check_count(n: usize) -> Result<()> {
    if n > MAX_BINS {
        return Err(PlotError::InvalidBins(format!(
            "{n} bins requested, at most {MAX_BINS} are supported"
        )));
    }
    Ok(())
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut it = values.iter().copied().filter(|v| v.is_finite());
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}

/// `n` evenly spaced edges from `min(values)` to `max(values)`.
pub fn lin_bins(values: &[f64], n: usize) -> Result<Vec<f64>> {
    check_count(n)?;
    let (lo, hi) = min_max(values)
        .ok_or_else(|| PlotError::InvalidBins("cannot bin an empty sample".into()))?;
    Ok(linspace(lo, hi, n))
}

/// `n` log-spaced edges from `max(min(values), bin_min)` to `max(values)`.
pub fn log_bins(values: &[f64], n: usize, bin_min: Option<f64>) -> Result<Vec<f64>> {
    check_count(n)?;
    let (lo, hi) = min_max(values)
        .ok_or_else(|| PlotError::InvalidBins("cannot bin an empty sample".into()))?;
    let lo = lo.max(bin_min.unwrap_or(DEFAULT_LOG_BIN_MIN));
    if lo <= 0.0 || hi <= 0.0 || hi < lo {
        return Err(PlotError::InvalidBins(format!(
            "log bins need a positive range, got [{lo}, {hi}]"
        )));
    }
    let mut edges: Vec<f64> = linspace(lo.log10(), hi.log10(), n)
        .into_iter()
        .map(|e| 10_f64.powf(e))
        .collect();
    // exact outer edges, so the extreme samples are not lost to rounding
    if let Some(first) = edges.first_mut() {
        *first = lo;
    }
    if let Some(last) = edges.last_mut() {
        *last = hi;
    }
    Ok(edges)
}

fn check_edges(edges: &[f64]) -> Result<()> {
    if edges.len() < 2 {
        return Err(PlotError::InvalidBins(
            "at least two bin edges are required".into(),
        ));
    }
    if !edges.windows(2).all(|w| w[0] < w[1]) {
        return Err(PlotError::InvalidBins(
            "bin edges must increase monotonically".into(),
        ));
    }
    Ok(())
}

/// Bin edges for a 1D histogram.
///
/// A count of `n` means `n` bins (`n + 1` edges) spanning `range`, or the sample extent.
/// A sample with a single distinct value is widened by half a unit on each side.
pub fn bin_edges(samples: &[f64], opts: &HistOptions) -> Result<Vec<f64>> {
    let n = match &opts.bins {
        Some(Bins::Edges(edges)) => {
            check_edges(edges)?;
            return Ok(edges.clone());
        }
        Some(Bins::Count(n)) => *n,
        None => DEFAULT_BINS,
    };
    if n == 0 {
        return Err(PlotError::InvalidBins("bin count must be positive".into()));
    }
    check_count(n)?;

    if opts.log_bins.unwrap_or(false) {
        let in_range: Vec<f64> = match opts.range {
            Some([lo, hi]) => vec![lo, hi],
            None => samples.to_vec(),
        };
        return log_bins(&in_range, n + 1, opts.bin_min);
    }

    let (mut lo, mut hi) = match opts.range {
        Some([lo, hi]) => (lo, hi),
        None => min_max(samples).unwrap_or((0.0, 1.0)),
    };
    if lo > hi {
        return Err(PlotError::InvalidBins(format!(
            "range start {lo} is above range end {hi}"
        )));
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    Ok(linspace(lo, hi, n + 1))
}

/// Index of the bin holding `v`; the last bin includes its right edge.
fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    let (first, last) = (*edges.first()?, *edges.last()?);
    if !(first..=last).contains(&v) {
        return None;
    }
    if v == last {
        return Some(edges.len() - 2);
    }
    Some(edges.partition_point(|e| *e <= v) - 1)
}

/// Sample counts per bin, or a probability density when `density` is set.
pub fn counts(samples: &[f64], edges: &[f64], density: bool) -> Vec<f64> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let mut out = vec![0.0; edges.len() - 1];
    for &v in samples {
        if let Some(i) = bin_index(edges, v) {
            out[i] += 1.0;
        }
    }
    if density {
        let total: f64 = out.iter().sum();
        if total > 0.0 {
            for (c, w) in out.iter_mut().zip(edges.windows(2)) {
                *c /= total * (w[1] - w[0]);
            }
        }
    }
    out
}

/// Bin specification for 2D histograms.
#[derive(Debug, Clone, PartialEq)]
pub enum BinSpec2d {
    /// Same count on both axes.
    Count(usize),
    /// `[x_count, y_count]`.
    Pair([usize; 2]),
    /// `[x_edges, y_edges]`.
    Edges([Vec<f64>; 2]),
}

impl Default for BinSpec2d {
    fn default() -> Self {
        BinSpec2d::Count(DEFAULT_BINS)
    }
}

/// Per-axis log switches and lower bounds for 2D binning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogAxes {
    pub log_x: bool,
    pub log_y: bool,
    pub x_bin_min: f64,
    pub y_bin_min: f64,
}

impl Default for LogAxes {
    fn default() -> Self {
        Self {
            log_x: false,
            log_y: false,
            x_bin_min: 1e-14,
            y_bin_min: 1e-14,
        }
    }
}

/// Edges `(x_edges, y_edges)` built from bin counts; `n` counts mean `n` edges.
///
/// Only count specifications are accepted here; explicit edges are an
/// [`PlotError::InvalidBins`].
pub fn create_2d_bins(
    x: &[f64],
    y: &[f64],
    spec: &BinSpec2d,
    log: &LogAxes,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let (nx, ny) = match spec {
        BinSpec2d::Count(n) => (*n, *n),
        BinSpec2d::Pair([nx, ny]) => (*nx, *ny),
        BinSpec2d::Edges(_) => {
            return Err(PlotError::InvalidBins(
                "expected a bin count or a pair of bin counts".into(),
            ));
        }
    };
    let xbins = if log.log_x {
        log_bins(x, nx, Some(log.x_bin_min))?
    } else {
        lin_bins(x, nx)?
    };
    let ybins = if log.log_y {
        log_bins(y, ny, Some(log.y_bin_min))?
    } else {
        lin_bins(y, ny)?
    };
    Ok((xbins, ybins))
}

/// Result of [`histogram_2d`]. `counts[row][col]` holds the y bin `row` and x bin `col`,
/// with row 0 at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist2d {
    pub counts: Vec<Vec<f64>>,
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
}

/// Count `(x, y)` pairs on a 2D grid.
///
/// With a log axis the edges come from [`create_2d_bins`]. Otherwise a count `n` means
/// `n` bins per axis over the sample extent, and explicit edges are used as given.
pub fn histogram_2d(x: &[f64], y: &[f64], spec: &BinSpec2d, log: &LogAxes) -> Result<Hist2d> {
    crate::engine::check_same_len(x, y)?;
    let (x_edges, y_edges) = if log.log_x || log.log_y {
        create_2d_bins(x, y, spec, log)?
    } else {
        match spec {
            BinSpec2d::Count(n) => (count_edges(x, *n)?, count_edges(y, *n)?),
            BinSpec2d::Pair([nx, ny]) => (count_edges(x, *nx)?, count_edges(y, *ny)?),
            BinSpec2d::Edges([xe, ye]) => {
                check_edges(xe)?;
                check_edges(ye)?;
                (xe.clone(), ye.clone())
            }
        }
    };
    if x_edges.len() < 2 || y_edges.len() < 2 {
        return Err(PlotError::InvalidBins(
            "each axis needs at least one bin".into(),
        ));
    }

    let mut counts = vec![vec![0.0; x_edges.len() - 1]; y_edges.len() - 1];
    for (&xv, &yv) in x.iter().zip(y) {
        if let (Some(col), Some(row)) = (bin_index(&x_edges, xv), bin_index(&y_edges, yv)) {
            counts[row][col] += 1.0;
        }
    }
    Ok(Hist2d {
        counts,
        x_edges,
        y_edges,
    })
}

fn count_edges(values: &[f64], n: usize) -> Result<Vec<f64>> {
    bin_edges(
        values,
        &HistOptions {
            bins: Some(Bins::Count(n)),
            ..Default::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lin_and_log_bins_have_n_edges() {
        assert_eq!(lin_bins(&[0.0, 4.0, 2.0], 5).unwrap(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        let b = log_bins(&[0.0, 1.0, 1000.0], 4, Some(1.0)).unwrap();
        assert_eq!(b.len(), 4);
        assert!((b[1] - 10.0).abs() < 1e-9 && (b[3] - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn default_is_ten_bins_and_last_edge_inclusive() {
        let samples = [0.0, 1.0, 2.0, 10.0];
        let edges = bin_edges(&samples, &HistOptions::default()).unwrap();
        assert_eq!(edges.len(), 11);
        let c = counts(&samples, &edges, false);
        assert_eq!(c.iter().sum::<f64>(), 4.0);
        assert_eq!(c[9], 1.0);
    }

    #[test]
    fn density_integrates_to_one() {
        let samples = [0.0, 0.5, 1.0, 1.5, 2.0];
        let edges = vec![0.0, 1.0, 2.0];
        let d = counts(&samples, &edges, true);
        let area: f64 = d.iter().zip(edges.windows(2)).map(|(h, w)| h * (w[1] - w[0])).sum();
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn explicit_edges_must_increase() {
        let opts = HistOptions {
            bins: Some(Bins::Edges(vec![0.0, 2.0, 1.0])),
            ..Default::default()
        };
        assert!(matches!(bin_edges(&[1.0], &opts), Err(PlotError::InvalidBins(_))));
    }

    #[test]
    fn create_2d_bins_rejects_edge_lists() {
        let spec = BinSpec2d::Edges([vec![0.0, 1.0], vec![0.0, 1.0]]);
        let err = create_2d_bins(&[1.0], &[1.0], &spec, &LogAxes::default()).unwrap_err();
        assert!(err.to_string().contains("invalid bin specification"));
    }

    #[test]
    fn histogram_2d_counts_pairs() {
        let x = [0.0, 1.0, 1.0, 2.0];
        let y = [0.0, 0.0, 2.0, 2.0];
        let h = histogram_2d(&x, &y, &BinSpec2d::Pair([2, 2]), &LogAxes::default()).unwrap();
        assert_eq!(h.counts, vec![vec![1.0, 1.0], vec![0.0, 2.0]]);
    }

    #[test]
    fn oversized_bin_counts_are_rejected_before_allocating() {
        let huge = HistOptions {
            bins: Some(Bins::Count(usize::MAX - 1)),
            ..Default::default()
        };
        assert!(matches!(bin_edges(&[1.0, 2.0], &huge), Err(PlotError::InvalidBins(_))));
        assert!(matches!(
            lin_bins(&[1.0, 2.0], MAX_BINS + 1),
            Err(PlotError::InvalidBins(_))
        ));
        let pair = BinSpec2d::Pair([2, usize::MAX]);
        assert!(matches!(
            histogram_2d(&[1.0, 2.0], &[1.0, 2.0], &pair, &LogAxes::default()),
            Err(PlotError::InvalidBins(_))
        ));
    }
}
