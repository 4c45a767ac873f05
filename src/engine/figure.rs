//! Retained figure model: panels keep their artists, limits and tick settings until the
//! figure is rendered by [`super::draw`].

use super::scale::{TARGET_TICKS, log_ticks, nice_ticks};
use super::{
    Axes, Axis, AxisScale, Canvas, FigureSpec, GridPosition, HAlign, check_bar_lens,
    check_same_len, grid_columns,
};
use crate::error::{PlotError, Result};
use crate::histogram::{bin_edges, counts};
use crate::options::{
    BarAlign, BarOptions, HistOptions, ImageOptions, LegendOptions, LineOptions,
    NumberFormat, RefLine, StackOptions, TickOverrides,
};
use crate::style::{Color, Colormap, LineDash, MarkerShape, Rgb8, Theme, cycle_color};
use crate::ticks::TickLabeler;
use std::path::Path;

/// Fraction of the data span added on each side when autoscaling.
const AUTOSCALE_MARGIN: f64 = 0.05;

const LINE_ZORDER: f64 = 2.0;
const PATCH_ZORDER: f64 = 1.0;
const IMAGE_ZORDER: f64 = 0.0;
const DEFAULT_MARKER_SIZE: f64 = 6.0;
const DEFAULT_BAR_WIDTH: f64 = 0.8;

/// Stroke width in points and dash pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub dash: LineDash,
}

/// Maps image values onto `0.0..=1.0` of a colormap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorNorm {
    pub vmin: f64,
    pub vmax: f64,
    pub log: bool,
}

impl ColorNorm {
    /// Norm spanning the finite `values` (only the positive ones for a log norm).
    pub fn from_values(values: impl Iterator<Item = f64>, log: bool) -> Self {
        let span = extent(values.filter(|v| !log || *v > 0.0));
        let (vmin, vmax) = span.unwrap_or(if log { (1.0, 10.0) } else { (0.0, 1.0) });
        Self { vmin, vmax, log }
    }

    /// Colormap position of `value`; `None` when the cell is masked.
    pub fn fraction(&self, value: f64) -> Option<f64> {
        if !value.is_finite() || (self.log && value <= 0.0) {
            return None;
        }
        let (v, lo, hi) = if self.log {
            (value.ln(), self.vmin.ln(), self.vmax.ln())
        } else {
            (value, self.vmin, self.vmax)
        };
        if hi == lo {
            return Some(0.0);
        }
        Some(((v - lo) / (hi - lo)).clamp(0.0, 1.0))
    }

    /// Value sitting at colormap position `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        if self.log {
            (self.vmin.ln() + t * (self.vmax.ln() - self.vmin.ln())).exp()
        } else {
            self.vmin + t * (self.vmax - self.vmin)
        }
    }
}

/// Color scale drawn beside an image panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub cmap: Colormap,
    pub norm: ColorNorm,
    pub label: Option<String>,
    pub format: Option<NumberFormat>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArtistKind {
    Line {
        points: Vec<(f64, f64)>,
        stroke: Stroke,
        marker: Option<(MarkerShape, f64)>,
    },
    /// One stacked layer: filled between `lower` and `upper`.
    Band {
        lower: Vec<(f64, f64)>,
        upper: Vec<(f64, f64)>,
    },
    Bars {
        edges: Vec<f64>,
        heights: Vec<f64>,
    },
    /// Free-standing bars as `(lower-left, upper-right)` corners, colored one by one.
    Rects {
        rects: Vec<((f64, f64), (f64, f64))>,
        colors: Vec<Rgb8>,
    },
    Image {
        grid: Vec<Vec<f64>>,
        cmap: Colormap,
        norm: ColorNorm,
    },
    HLine {
        y: f64,
        stroke: Stroke,
    },
    VLine {
        x: f64,
        stroke: Stroke,
    },
}

/// Something drawn on a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub kind: ArtistKind,
    pub color: Rgb8,
    pub alpha: f64,
    pub label: Option<String>,
    pub zorder: f64,
}

impl Artist {
    /// Data coordinates this artist covers along `axis`, for autoscaling.
    fn coords(&self, axis: Axis) -> Vec<f64> {
        let pick = |p: &(f64, f64)| match axis {
            Axis::X => p.0,
            Axis::Y => p.1,
        };
        match (&self.kind, axis) {
            (ArtistKind::Line { points, .. }, _) => points.iter().map(pick).collect(),
            (ArtistKind::Band { lower, upper }, _) => {
                lower.iter().chain(upper.iter()).map(pick).collect()
            }
            (ArtistKind::Bars { edges, .. }, Axis::X) => edges.clone(),
            (ArtistKind::Bars { heights, .. }, Axis::Y) => {
                heights.iter().copied().chain(std::iter::once(0.0)).collect()
            }
            (ArtistKind::Rects { rects, .. }, _) => rects
                .iter()
                .flat_map(|(a, b)| [pick(a), pick(b)])
                .collect(),
            (ArtistKind::Image { grid, .. }, Axis::X) => {
                let cols = grid.first().map_or(0, Vec::len);
                vec![-0.5, cols as f64 - 0.5]
            }
            (ArtistKind::Image { grid, .. }, Axis::Y) => vec![-0.5, grid.len() as f64 - 0.5],
            (ArtistKind::VLine { x, .. }, Axis::X) => vec![*x],
            (ArtistKind::HLine { y, .. }, Axis::Y) => vec![*y],
            (ArtistKind::HLine { .. }, Axis::X) | (ArtistKind::VLine { .. }, Axis::Y) => {
                Vec::new()
            }
        }
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn padded(span: Option<(f64, f64)>) -> (f64, f64) {
    match span {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => {
            let pad = lo.abs().max(1.0) * AUTOSCALE_MARGIN;
            (lo - pad, hi + pad)
        }
        Some((lo, hi)) => {
            let pad = (hi - lo) * AUTOSCALE_MARGIN;
            (lo - pad, hi + pad)
        }
    }
}

/// Like [`padded`], with the margin taken in decades.
fn padded_log(span: Option<(f64, f64)>) -> (f64, f64) {
    let Some((lo, hi)) = span else {
        return (1.0, 10.0);
    };
    let (lo, hi) = (lo.log10(), hi.log10());
    let pad = if lo == hi {
        0.5
    } else {
        (hi - lo) * AUTOSCALE_MARGIN
    };
    (10_f64.powf(lo - pad), 10_f64.powf(hi + pad))
}

/// Tick settings of one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TickAxis {
    pub labeler: TickLabeler,
    pub rotation: f64,
    pub align: HAlign,
    pub fontsize: Option<f64>,
    /// Pinned tick positions; "nice" ticks inside the view otherwise.
    pub fixed: Option<Vec<f64>>,
    /// Labels for `fixed`, index for index.
    pub labels: Option<Vec<String>>,
}

impl Default for TickAxis {
    fn default() -> Self {
        Self {
            labeler: TickLabeler::default(),
            rotation: 0.0,
            align: HAlign::Center,
            fontsize: None,
            fixed: None,
            labels: None,
        }
    }
}

/// One panel of a [`Figure`].
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub position: GridPosition,
    pub artists: Vec<Artist>,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub figure_title: Option<String>,
    pub y_ticks_right: bool,
    pub x_ticks: TickAxis,
    pub y_ticks: TickAxis,
    pub legend: Option<LegendOptions>,
    pub colorbar: Option<Colorbar>,
    xlim: Option<(f64, f64)>,
    ylim: Option<(f64, f64)>,
    xscale: AxisScale,
    yscale: AxisScale,
    color_index: usize,
    line_width: f64,
}

impl Panel {
    pub fn new(position: GridPosition, line_width: f64) -> Self {
        Self {
            position,
            artists: Vec::new(),
            title: None,
            xlabel: None,
            ylabel: None,
            figure_title: None,
            y_ticks_right: false,
            x_ticks: TickAxis::default(),
            y_ticks: TickAxis::default(),
            legend: None,
            colorbar: None,
            xlim: None,
            ylim: None,
            xscale: AxisScale::Linear,
            yscale: AxisScale::Linear,
            color_index: 0,
            line_width,
        }
    }

    fn next_color(&mut self) -> Rgb8 {
        let color = cycle_color(self.color_index);
        self.color_index += 1;
        color
    }

    fn pick_color(&mut self, color: Option<Color>) -> Rgb8 {
        match color {
            Some(c) => c.rgb(),
            None => self.next_color(),
        }
    }

    pub fn tick_axis(&self, axis: Axis) -> &TickAxis {
        match axis {
            Axis::X => &self.x_ticks,
            Axis::Y => &self.y_ticks,
        }
    }

    fn tick_axis_mut(&mut self, axis: Axis) -> &mut TickAxis {
        match axis {
            Axis::X => &mut self.x_ticks,
            Axis::Y => &mut self.y_ticks,
        }
    }

    /// Label drawn at tick `value`.
    pub fn tick_label(&self, axis: Axis, value: f64) -> String {
        let ticks = self.tick_axis(axis);
        if let (Some(fixed), Some(labels)) = (&ticks.fixed, &ticks.labels) {
            let tol = 1e-9 * value.abs().max(1.0);
            if let Some(i) = fixed.iter().position(|t| (t - value).abs() <= tol) {
                return labels.get(i).cloned().unwrap_or_default();
            }
        }
        ticks.labeler.format(value)
    }

    /// Labelled artists in drawing order, for the legend.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&str, Rgb8)> {
        self.artists
            .iter()
            .filter_map(|a| a.label.as_deref().map(|l| (l, a.color)))
    }

    /// View limits fitted to the artists.
    fn autoscale(&self, axis: Axis) -> (f64, f64) {
        let scale = self.scale(axis);
        let span = extent(
            self.artists
                .iter()
                .flat_map(|a| a.coords(axis))
                .filter(|v| scale == AxisScale::Linear || *v > 0.0),
        );
        match scale {
            AxisScale::Linear => padded(span),
            AxisScale::Log => padded_log(span),
        }
    }

    fn ref_stroke(&self, line: &RefLine) -> Stroke {
        Stroke {
            width: line.linewidth.unwrap_or(self.line_width),
            dash: line.linestyle.unwrap_or_default(),
        }
    }

    fn ref_artist(&self, kind: ArtistKind, line: &RefLine) -> Artist {
        Artist {
            kind,
            // reference lines do not advance the color cycle
            color: line.color.map(Color::rgb).unwrap_or(cycle_color(0)),
            alpha: line.alpha.unwrap_or(1.0),
            label: line.label.clone(),
            zorder: line.zorder.unwrap_or(LINE_ZORDER),
        }
    }
}

fn implicit_x(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

impl Axes for Panel {
    fn plot(&mut self, x: Option<&[f64]>, y: &[f64], opts: &LineOptions) -> Result<()> {
        let xs = match x {
            Some(x) => {
                check_same_len(x, y)?;
                x.to_vec()
            }
            None => implicit_x(y.len()),
        };
        let color = self.pick_color(opts.color);
        let artist = Artist {
            kind: ArtistKind::Line {
                points: xs.into_iter().zip(y.iter().copied()).collect(),
                stroke: Stroke {
                    width: opts.linewidth.unwrap_or(self.line_width),
                    dash: opts.linestyle.unwrap_or_default(),
                },
                marker: opts
                    .marker
                    .map(|m| (m, opts.markersize.unwrap_or(DEFAULT_MARKER_SIZE))),
            },
            color,
            alpha: opts.alpha.unwrap_or(1.0),
            label: opts.label.clone(),
            zorder: opts.zorder.unwrap_or(LINE_ZORDER),
        };
        self.artists.push(artist);
        Ok(())
    }

    fn stackplot(
        &mut self,
        x: Option<&[f64]>,
        layers: &[Vec<f64>],
        opts: &StackOptions,
    ) -> Result<()> {
        let xs = match x {
            Some(x) => x.to_vec(),
            None => implicit_x(layers.first().map_or(0, Vec::len)),
        };
        for layer in layers {
            check_same_len(&xs, layer)?;
        }

        let mut cumulative = vec![0.0; xs.len()];
        for (i, layer) in layers.iter().enumerate() {
            let lower: Vec<(f64, f64)> = xs.iter().copied().zip(cumulative.clone()).collect();
            for (acc, v) in cumulative.iter_mut().zip(layer) {
                *acc += v;
            }
            let upper: Vec<(f64, f64)> = xs.iter().copied().zip(cumulative.clone()).collect();
            let color = self.pick_color(opts.colors.as_ref().and_then(|c| c.get(i).copied()));
            self.artists.push(Artist {
                kind: ArtistKind::Band { lower, upper },
                color,
                alpha: opts.alpha.unwrap_or(1.0),
                label: opts.labels.as_ref().and_then(|l| l.get(i).cloned()),
                zorder: PATCH_ZORDER,
            });
        }
        Ok(())
    }

    fn hist(&mut self, samples: &[f64], opts: &HistOptions) -> Result<()> {
        let edges = bin_edges(samples, opts)?;
        let heights = counts(samples, &edges, opts.density.unwrap_or(false));
        let color = self.pick_color(opts.color);
        self.artists.push(Artist {
            kind: ArtistKind::Bars { edges, heights },
            color,
            alpha: opts.alpha.unwrap_or(1.0),
            label: opts.label.clone(),
            zorder: PATCH_ZORDER,
        });
        Ok(())
    }

    fn bar(
        &mut self,
        x: &[f64],
        heights: &[f64],
        bottom: Option<&[f64]>,
        opts: &BarOptions,
    ) -> Result<()> {
        check_bar_lens(x, heights, bottom)?;
        let width = opts.width.unwrap_or(DEFAULT_BAR_WIDTH);
        let base = match opts.colors.as_ref().and_then(|c| c.first()) {
            Some(c) => c.rgb(),
            None => self.pick_color(opts.color),
        };
        let bottoms = bottom.map_or_else(|| vec![0.0; x.len()], <[f64]>::to_vec);
        let rects = x
            .iter()
            .zip(heights)
            .zip(&bottoms)
            .map(|((&x, &h), &b)| {
                let left = match opts.align.unwrap_or_default() {
                    BarAlign::Center => x - width / 2.0,
                    BarAlign::Edge => x,
                };
                ((left, b), (left + width, b + h))
            })
            .collect();
        let colors = (0..x.len())
            .map(|i| {
                opts.colors
                    .as_ref()
                    .and_then(|c| c.get(i))
                    .map_or(base, |c| c.rgb())
            })
            .collect();
        self.artists.push(Artist {
            kind: ArtistKind::Rects { rects, colors },
            color: base,
            alpha: opts.alpha.unwrap_or(1.0),
            label: opts.label.clone(),
            zorder: PATCH_ZORDER,
        });
        Ok(())
    }

    fn imshow(&mut self, grid: &[Vec<f64>], opts: &ImageOptions) -> Result<()> {
        let cols = grid_columns(grid)?;
        let cmap = opts.cmap.unwrap_or_default();
        let norm = ColorNorm::from_values(
            grid.iter().flatten().copied(),
            opts.log_norm.unwrap_or(false),
        );
        // an image fills its panel unless limits were set
        if self.xlim.is_none() {
            self.xlim = Some((-0.5, cols as f64 - 0.5));
        }
        if self.ylim.is_none() {
            self.ylim = Some((-0.5, grid.len() as f64 - 0.5));
        }
        if opts.colorbar.unwrap_or(false) {
            self.colorbar = Some(Colorbar {
                cmap,
                norm,
                label: opts.colorbar_label.clone(),
                format: opts.ctick_format.clone(),
            });
        }
        self.artists.push(Artist {
            kind: ArtistKind::Image {
                grid: grid.to_vec(),
                cmap,
                norm,
            },
            color: cmap.map(1.0),
            alpha: 1.0,
            label: None,
            zorder: IMAGE_ZORDER,
        });
        Ok(())
    }

    fn axhline(&mut self, line: &RefLine) -> Result<()> {
        let kind = ArtistKind::HLine {
            y: line.y.unwrap_or(0.0),
            stroke: self.ref_stroke(line),
        };
        let artist = self.ref_artist(kind, line);
        self.artists.push(artist);
        Ok(())
    }

    fn axvline(&mut self, line: &RefLine) -> Result<()> {
        let kind = ArtistKind::VLine {
            x: line.x.unwrap_or(0.0),
            stroke: self.ref_stroke(line),
        };
        let artist = self.ref_artist(kind, line);
        self.artists.push(artist);
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn set_xlabel(&mut self, label: &str) {
        self.xlabel = Some(label.to_string());
    }

    fn set_ylabel(&mut self, label: &str) {
        self.ylabel = Some(label.to_string());
    }

    fn set_figure_title(&mut self, title: &str) {
        self.figure_title = Some(title.to_string());
    }

    fn move_y_ticks_right(&mut self) {
        self.y_ticks_right = true;
    }

    fn set_categories(&mut self, labels: &[String]) {
        self.x_ticks.fixed = Some(implicit_x(labels.len()));
        self.x_ticks.labels = Some(labels.to_vec());
    }

    fn set_tick_labeler(&mut self, axis: Axis, labeler: TickLabeler) {
        self.tick_axis_mut(axis).labeler = labeler;
    }

    fn set_tick_rotation(&mut self, axis: Axis, degrees: f64, align: HAlign) {
        let ticks = self.tick_axis_mut(axis);
        ticks.rotation = degrees;
        ticks.align = align;
    }

    fn apply_tick_overrides(&mut self, axis: Axis, overrides: &TickOverrides) -> Result<()> {
        let positions = match (&overrides.ticks, &overrides.labels) {
            (Some(ticks), _) => Some(ticks.clone()),
            // labels alone pin the ticks currently shown
            (None, Some(_)) => Some(self.ticks(axis)),
            (None, None) => None,
        };
        if let (Some(ticks), Some(labels)) = (&positions, &overrides.labels)
            && ticks.len() != labels.len()
        {
            return Err(PlotError::Config(format!(
                "{} tick labels given for {} ticks",
                labels.len(),
                ticks.len()
            )));
        }

        let target = self.tick_axis_mut(axis);
        if let Some(ticks) = positions {
            target.fixed = Some(ticks);
            target.labels = overrides.labels.clone();
        }
        if let Some(rotation) = overrides.rotation {
            target.rotation = rotation;
        }
        if let Some(size) = overrides.fontsize {
            target.fontsize = Some(size);
        }
        Ok(())
    }

    fn legend(&mut self, opts: &LegendOptions) {
        self.legend = Some(opts.clone());
    }

    fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.xlim = Some((lo, hi));
    }

    fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.ylim = Some((lo, hi));
    }

    fn set_scale(&mut self, axis: Axis, scale: AxisScale) {
        match axis {
            Axis::X => self.xscale = scale,
            Axis::Y => self.yscale = scale,
        }
    }

    fn scale(&self, axis: Axis) -> AxisScale {
        match axis {
            Axis::X => self.xscale,
            Axis::Y => self.yscale,
        }
    }

    fn xlim(&self) -> (f64, f64) {
        self.xlim.unwrap_or_else(|| self.autoscale(Axis::X))
    }

    fn ylim(&self) -> (f64, f64) {
        self.ylim.unwrap_or_else(|| self.autoscale(Axis::Y))
    }

    fn ticks(&self, axis: Axis) -> Vec<f64> {
        if let Some(fixed) = &self.tick_axis(axis).fixed {
            return fixed.clone();
        }
        let (lo, hi) = match axis {
            Axis::X => self.xlim(),
            Axis::Y => self.ylim(),
        };
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        match self.scale(axis) {
            AxisScale::Linear => nice_ticks(lo, hi, TARGET_TICKS),
            AxisScale::Log => log_ticks(lo, hi),
        }
    }
}

/// A figure: its spec, a theme and the panels selected so far.
#[derive(Debug, Clone)]
pub struct Figure {
    pub theme: Theme,
    spec: Option<FigureSpec>,
    panels: Vec<Panel>,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Figure {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            spec: None,
            panels: Vec::new(),
        }
    }

    pub fn spec(&self) -> Option<&FigureSpec> {
        self.spec.as_ref()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, pos: GridPosition) -> Option<&Panel> {
        self.panels.iter().find(|p| p.position == pos)
    }

    pub fn dpi(&self) -> f64 {
        self.spec
            .as_ref()
            .and_then(|s| s.options.dpi)
            .unwrap_or(self.theme.dpi)
    }

    pub fn facecolor(&self) -> Color {
        self.spec
            .as_ref()
            .and_then(|s| s.options.facecolor)
            .unwrap_or(self.theme.facecolor)
    }

    /// Output size in pixels, at least 1×1.
    pub fn size_px(&self) -> (u32, u32) {
        let (w, h) = self.spec.as_ref().map_or((0.0, 0.0), |s| s.size);
        let dpi = self.dpi();
        let px = |inches: f64| (inches * dpi).round().max(1.0) as u32;
        (px(w), px(h))
    }

    /// Render to `path`; `.svg` gives SVG, any other extension a bitmap.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        super::draw::render_to_file(self, path.as_ref())
    }
}

impl Canvas for Figure {
    type Axes = Panel;

    fn create_figure(&mut self, spec: &FigureSpec) -> Result<()> {
        log::debug!(
            "creating {:.1}x{:.1} in figure with {}x{} grid",
            spec.size.0,
            spec.size.1,
            spec.layout.rows,
            spec.layout.columns
        );
        self.spec = Some(spec.clone());
        self.panels.clear();
        Ok(())
    }

    fn select_panel(&mut self, pos: GridPosition) -> Result<&mut Panel> {
        let Some(spec) = &self.spec else {
            return Err(PlotError::Engine("no figure created".into()));
        };
        if !spec.layout.contains(pos) {
            return Err(PlotError::Engine(format!(
                "panel ({}, {}) is outside the {}x{} grid",
                pos.row, pos.col, spec.layout.rows, spec.layout.columns
            )));
        }
        let idx = match self.panels.iter().position(|p| p.position == pos) {
            Some(i) => i,
            None => {
                self.panels.push(Panel::new(pos, self.theme.line_width));
                self.panels.len() - 1
            }
        };
        Ok(&mut self.panels[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Panel {
        Panel::new(GridPosition { row: 0, col: 0 }, 1.5)
    }

    #[test]
    fn autoscale_pads_the_data_span() {
        let mut p = panel();
        p.plot(None, &[0.0, 10.0, 20.0], &LineOptions::default())
            .unwrap();
        let close = |a: (f64, f64), b: (f64, f64)| {
            (a.0 - b.0).abs() < 1e-12 && (a.1 - b.1).abs() < 1e-12
        };
        assert!(close(p.xlim(), (-0.1, 2.1)));
        assert!(close(p.ylim(), (-1.0, 21.0)));
        p.set_ylim(0.0, 5.0);
        assert_eq!(p.ylim(), (0.0, 5.0));
    }

    #[test]
    fn unstyled_series_walk_the_color_cycle() {
        let mut p = panel();
        p.plot(None, &[1.0], &LineOptions::default()).unwrap();
        p.plot(None, &[2.0], &LineOptions::default()).unwrap();
        assert_eq!(p.artists[0].color, cycle_color(0));
        assert_eq!(p.artists[1].color, cycle_color(1));
    }

    #[test]
    fn stack_layers_accumulate() {
        let mut p = panel();
        p.stackplot(
            Some(&[0.0, 1.0]),
            &[vec![1.0, 2.0], vec![3.0, 4.0]],
            &StackOptions::default(),
        )
        .unwrap();
        match &p.artists[1].kind {
            ArtistKind::Band { lower, upper } => {
                assert_eq!(lower, &vec![(0.0, 1.0), (1.0, 2.0)]);
                assert_eq!(upper, &vec![(0.0, 4.0), (1.0, 6.0)]);
            }
            other => panic!("expected a band, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_lengths_fail_without_drawing() {
        let mut p = panel();
        let err = p
            .plot(Some(&[0.0, 1.0]), &[1.0], &LineOptions::default())
            .unwrap_err();
        assert!(matches!(err, PlotError::Engine(_)));
        assert!(p.artists.is_empty());
    }

    #[test]
    fn tick_labels_prefer_pinned_labels() {
        let mut p = panel();
        p.set_categories(&["a".to_string(), "b".to_string()]);
        assert_eq!(p.ticks(Axis::X), vec![0.0, 1.0]);
        assert_eq!(p.tick_label(Axis::X, 1.0), "b");
        assert_eq!(p.tick_label(Axis::Y, 2.0), "2");
    }

    #[test]
    fn edge_aligned_bars_start_at_x() {
        let mut p = panel();
        let opts = BarOptions {
            width: Some(0.5),
            align: Some(BarAlign::Edge),
            colors: Some(vec![Color::GREEN, Color::RED]),
            ..Default::default()
        };
        p.bar(&[1.0, 2.0], &[3.0, 1.0], Some(&[1.0, 0.5]), &opts)
            .unwrap();
        match &p.artists[0].kind {
            ArtistKind::Rects { rects, colors } => {
                assert_eq!(rects[0], ((1.0, 1.0), (1.5, 4.0)));
                assert_eq!(rects[1], ((2.0, 0.5), (2.5, 1.5)));
                assert_eq!(colors, &vec![Color::GREEN.rgb(), Color::RED.rgb()]);
            }
            other => panic!("expected rects, got {other:?}"),
        }
        // explicit colors leave the cycle alone
        p.plot(None, &[1.0], &LineOptions::default()).unwrap();
        assert_eq!(p.artists[1].color, cycle_color(0));
    }

    #[test]
    fn images_pin_limits_and_log_norm_masks_empty_cells() {
        let mut p = panel();
        let opts = ImageOptions {
            log_norm: Some(true),
            colorbar: Some(true),
            ..Default::default()
        };
        p.imshow(&[vec![0.0, 1.0, 10.0], vec![100.0, 0.0, 1.0]], &opts)
            .unwrap();
        assert_eq!(p.xlim(), (-0.5, 2.5));
        assert_eq!(p.ylim(), (-0.5, 1.5));
        let norm = p.colorbar.as_ref().map(|c| c.norm).unwrap();
        assert_eq!((norm.vmin, norm.vmax), (1.0, 100.0));
        assert_eq!(norm.fraction(0.0), None);
        assert!((norm.fraction(10.0).unwrap() - 0.5).abs() < 1e-12);
        assert!((norm.value_at(0.5) - 10.0).abs() < 1e-9);
        assert!(p.imshow(&[vec![1.0], vec![]], &opts).is_err());
    }

    #[test]
    fn log_axes_autoscale_over_positive_data() {
        let mut p = panel();
        p.plot(Some(&[0.0, 1.0, 100.0]), &[1.0, 2.0, 3.0], &LineOptions::default())
            .unwrap();
        p.set_scale(Axis::X, AxisScale::Log);
        let (lo, hi) = p.xlim();
        assert!(lo > 0.0 && lo < 1.0);
        assert!(hi > 100.0);
        assert_eq!(p.ticks(Axis::X), vec![1.0, 10.0, 100.0]);
    }
}
