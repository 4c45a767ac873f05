//! Drawing-engine surface the renderer and the driver talk to.
//!
//! The renderer never reaches for a global "current figure": every operation takes the
//! panel ([`Axes`]) or the figure ([`Canvas`]) it draws on. Two engines ship with the crate:
//!
//! - [`record`]: records every call, for tests and `toolplot inspect --calls`;
//! - [`figure`]: a retained figure model, rendered to SVG/PNG by [`draw`] through `plotters`.

pub mod coord;
pub mod draw;
pub mod figure;
pub mod record;
pub mod scale;
pub mod text;

use crate::error::{PlotError, Result};
use crate::models::FigureOptions;
use crate::options::{
    BarOptions, HistOptions, ImageOptions, LegendOptions, LineOptions, RefLine, StackOptions,
    TickOverrides,
};
use crate::ticks::TickLabeler;

pub use figure::{Figure, Panel};
pub use record::{DrawCall, RecordingAxes, RecordingCanvas};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Mapping from data values to positions along an axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AxisScale {
    #[default]
    Linear,
    /// Base-10 logarithmic; only positive values are shown.
    Log,
}

/// Horizontal alignment of rotated tick labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Cell of the panel grid, 0-based, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

/// Rows × columns arrangement of `n_panels` panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub n_panels: usize,
    pub columns: usize,
    pub rows: usize,
}

impl GridLayout {
    pub fn new(n_panels: usize, columns: usize) -> Result<Self> {
        if columns == 0 {
            return Err(PlotError::Config(
                "subplots.n_columns must be at least 1".into(),
            ));
        }
        Ok(Self {
            n_panels,
            columns,
            rows: n_panels.div_ceil(columns),
        })
    }

    /// Cell of the `index`-th panel.
    pub fn position(&self, index: usize) -> GridPosition {
        GridPosition {
            row: index / self.columns,
            col: index % self.columns,
        }
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.row < self.rows && pos.col < self.columns
    }
}

/// Everything needed to create a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSpec {
    /// Width and height in inches.
    pub size: (f64, f64),
    pub layout: GridLayout,
    pub options: FigureOptions,
}

/// One panel of a figure.
///
/// Drawing calls take series data and a typed option structure; unset options fall back to
/// the engine's own defaults. Calls that can fail on bad input (mismatched lengths, bad
/// tick overrides) return an error and leave the panel as it was.
pub trait Axes {
    /// Line series. `x = None` means the implicit index `0..y.len()`.
    fn plot(&mut self, x: Option<&[f64]>, y: &[f64], opts: &LineOptions) -> Result<()>;

    /// Stacked areas, one layer per entry of `layers`, bottom to top.
    fn stackplot(
        &mut self,
        x: Option<&[f64]>,
        layers: &[Vec<f64>],
        opts: &StackOptions,
    ) -> Result<()>;

    fn hist(&mut self, samples: &[f64], opts: &HistOptions) -> Result<()>;

    /// One bar per `x`, from `bottom` (0 when `None`) up by `heights`.
    fn bar(
        &mut self,
        x: &[f64],
        heights: &[f64],
        bottom: Option<&[f64]>,
        opts: &BarOptions,
    ) -> Result<()>;

    /// Color-mapped grid, `grid[row][col]` with row 0 at the bottom. Cell `(row, col)` is
    /// centered on `(col, row)`, so the image spans `-0.5..n_cols - 0.5` on x.
    fn imshow(&mut self, grid: &[Vec<f64>], opts: &ImageOptions) -> Result<()>;

    /// Horizontal reference line at `line.y` (0 when unset).
    fn axhline(&mut self, line: &RefLine) -> Result<()>;

    /// Vertical reference line at `line.x` (0 when unset).
    fn axvline(&mut self, line: &RefLine) -> Result<()>;

    fn set_title(&mut self, title: &str);
    fn set_xlabel(&mut self, label: &str);
    fn set_ylabel(&mut self, label: &str);

    /// Title of the whole figure, anchored on this panel.
    fn set_figure_title(&mut self, title: &str);

    /// Draw y tick labels on the right side of the panel.
    fn move_y_ticks_right(&mut self);

    /// Pin one x tick per category at `0..labels.len()`, labelled with the category text.
    fn set_categories(&mut self, labels: &[String]);

    fn set_tick_labeler(&mut self, axis: Axis, labeler: TickLabeler);
    fn set_tick_rotation(&mut self, axis: Axis, degrees: f64, align: HAlign);

    /// Raw tick settings; applied after labeler and rotation, so they win over both.
    fn apply_tick_overrides(&mut self, axis: Axis, overrides: &TickOverrides) -> Result<()>;

    fn legend(&mut self, opts: &LegendOptions);

    fn set_xlim(&mut self, lo: f64, hi: f64);
    fn set_ylim(&mut self, lo: f64, hi: f64);

    fn set_scale(&mut self, axis: Axis, scale: AxisScale);
    fn scale(&self, axis: Axis) -> AxisScale;

    /// Current view limits (explicit or autoscaled).
    fn xlim(&self) -> (f64, f64);
    fn ylim(&self) -> (f64, f64);

    /// Current tick positions on `axis`.
    fn ticks(&self, axis: Axis) -> Vec<f64>;
}

/// A figure holding a grid of panels.
pub trait Canvas {
    type Axes: Axes;

    /// Start a new figure, discarding any previous one.
    fn create_figure(&mut self, spec: &FigureSpec) -> Result<()>;

    /// Panel at `pos`, created on first use.
    fn select_panel(&mut self, pos: GridPosition) -> Result<&mut Self::Axes>;
}

/// `x and y must have same first dimension` check shared by the engines.
pub(crate) fn check_same_len(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(PlotError::Engine(format!(
            "x and y must have same first dimension, but have shapes ({},) and ({},)",
            x.len(),
            y.len()
        )));
    }
    Ok(())
}

/// Lengths of bar heights (and bottoms) must match the bar positions.
pub(crate) fn check_bar_lens(x: &[f64], heights: &[f64], bottom: Option<&[f64]>) -> Result<()> {
    check_same_len(x, heights)?;
    if let Some(bottom) = bottom {
        check_same_len(x, bottom)?;
    }
    Ok(())
}

/// Column count of a rectangular image grid.
pub(crate) fn grid_columns(grid: &[Vec<f64>]) -> Result<usize> {
    let cols = grid.first().map_or(0, Vec::len);
    if grid.iter().any(|row| row.len() != cols) {
        return Err(PlotError::Engine(
            "image rows must all have the same length".into(),
        ));
    }
    Ok(cols)
}
