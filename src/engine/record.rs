//! An engine that draws nothing and records every call in order.

use super::scale::{TARGET_TICKS, log_ticks, nice_ticks};
use super::{
    Axes, Axis, AxisScale, Canvas, FigureSpec, GridPosition, HAlign, check_bar_lens,
    check_same_len, grid_columns,
};
use crate::error::{PlotError, Result};
use crate::options::{
    BarOptions, HistOptions, ImageOptions, LegendOptions, LineOptions, RefLine, StackOptions,
    TickOverrides,
};
use crate::ticks::TickLabeler;

/// One recorded panel call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Plot {
        x: Option<Vec<f64>>,
        y: Vec<f64>,
        opts: LineOptions,
    },
    Stackplot {
        x: Option<Vec<f64>>,
        layers: Vec<Vec<f64>>,
        opts: StackOptions,
    },
    Hist {
        samples: Vec<f64>,
        opts: HistOptions,
    },
    Bar {
        x: Vec<f64>,
        heights: Vec<f64>,
        bottom: Option<Vec<f64>>,
        opts: BarOptions,
    },
    Image {
        grid: Vec<Vec<f64>>,
        opts: ImageOptions,
    },
    AxHLine(RefLine),
    AxVLine(RefLine),
    Title(String),
    XLabel(String),
    YLabel(String),
    FigureTitle(String),
    YTicksRight,
    Categories(Vec<String>),
    TickLabeler(Axis, TickLabeler),
    TickRotation(Axis, f64, HAlign),
    TickOverrides(Axis, TickOverrides),
    Legend(LegendOptions),
    XLim(f64, f64),
    YLim(f64, f64),
    Scale(Axis, AxisScale),
}

/// Panel of a [`RecordingCanvas`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingAxes {
    pub calls: Vec<DrawCall>,
    xlim: Option<(f64, f64)>,
    ylim: Option<(f64, f64)>,
    x_fixed: Option<Vec<f64>>,
    y_fixed: Option<Vec<f64>>,
    xscale: AxisScale,
    yscale: AxisScale,
}

impl RecordingAxes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls matching `pred`, in order.
    pub fn calls_where(&self, pred: impl Fn(&DrawCall) -> bool) -> Vec<&DrawCall> {
        self.calls.iter().filter(|c| pred(c)).collect()
    }

    pub fn legend_requested(&self) -> bool {
        self.calls.iter().any(|c| matches!(c, DrawCall::Legend(_)))
    }
}

impl Axes for RecordingAxes {
    fn plot(&mut self, x: Option<&[f64]>, y: &[f64], opts: &LineOptions) -> Result<()> {
        if let Some(x) = x {
            check_same_len(x, y)?;
        }
        self.calls.push(DrawCall::Plot {
            x: x.map(<[f64]>::to_vec),
            y: y.to_vec(),
            opts: opts.clone(),
        });
        Ok(())
    }

    fn stackplot(
        &mut self,
        x: Option<&[f64]>,
        layers: &[Vec<f64>],
        opts: &StackOptions,
    ) -> Result<()> {
        if let Some(x) = x {
            for layer in layers {
                check_same_len(x, layer)?;
            }
        }
        self.calls.push(DrawCall::Stackplot {
            x: x.map(<[f64]>::to_vec),
            layers: layers.to_vec(),
            opts: opts.clone(),
        });
        Ok(())
    }

    fn hist(&mut self, samples: &[f64], opts: &HistOptions) -> Result<()> {
        self.calls.push(DrawCall::Hist {
            samples: samples.to_vec(),
            opts: opts.clone(),
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
        self.calls.push(DrawCall::Bar {
            x: x.to_vec(),
            heights: heights.to_vec(),
            bottom: bottom.map(<[f64]>::to_vec),
            opts: opts.clone(),
        });
        Ok(())
    }

    fn imshow(&mut self, grid: &[Vec<f64>], opts: &ImageOptions) -> Result<()> {
        grid_columns(grid)?;
        self.calls.push(DrawCall::Image {
            grid: grid.to_vec(),
            opts: opts.clone(),
        });
        Ok(())
    }

    fn axhline(&mut self, line: &RefLine) -> Result<()> {
        self.calls.push(DrawCall::AxHLine(line.clone()));
        Ok(())
    }

    fn axvline(&mut self, line: &RefLine) -> Result<()> {
        self.calls.push(DrawCall::AxVLine(line.clone()));
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.calls.push(DrawCall::Title(title.to_string()));
    }

    fn set_xlabel(&mut self, label: &str) {
        self.calls.push(DrawCall::XLabel(label.to_string()));
    }

    fn set_ylabel(&mut self, label: &str) {
        self.calls.push(DrawCall::YLabel(label.to_string()));
    }

    fn set_figure_title(&mut self, title: &str) {
        self.calls.push(DrawCall::FigureTitle(title.to_string()));
    }

    fn move_y_ticks_right(&mut self) {
        self.calls.push(DrawCall::YTicksRight);
    }

    fn set_categories(&mut self, labels: &[String]) {
        self.x_fixed = Some((0..labels.len()).map(|i| i as f64).collect());
        self.calls.push(DrawCall::Categories(labels.to_vec()));
    }

    fn set_tick_labeler(&mut self, axis: Axis, labeler: TickLabeler) {
        self.calls.push(DrawCall::TickLabeler(axis, labeler));
    }

    fn set_tick_rotation(&mut self, axis: Axis, degrees: f64, align: HAlign) {
        self.calls.push(DrawCall::TickRotation(axis, degrees, align));
    }

    fn apply_tick_overrides(&mut self, axis: Axis, overrides: &TickOverrides) -> Result<()> {
        if let (Some(ticks), Some(labels)) = (&overrides.ticks, &overrides.labels)
            && ticks.len() != labels.len()
        {
            return Err(PlotError::Config(format!(
                "{} tick labels given for {} ticks",
                labels.len(),
                ticks.len()
            )));
        }
        if let Some(ticks) = &overrides.ticks {
            match axis {
                Axis::X => self.x_fixed = Some(ticks.clone()),
                Axis::Y => self.y_fixed = Some(ticks.clone()),
            }
        }
        self.calls.push(DrawCall::TickOverrides(axis, overrides.clone()));
        Ok(())
    }

    fn legend(&mut self, opts: &LegendOptions) {
        self.calls.push(DrawCall::Legend(opts.clone()));
    }

    fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.xlim = Some((lo, hi));
        self.calls.push(DrawCall::XLim(lo, hi));
    }

    fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.ylim = Some((lo, hi));
        self.calls.push(DrawCall::YLim(lo, hi));
    }

    fn set_scale(&mut self, axis: Axis, scale: AxisScale) {
        match axis {
            Axis::X => self.xscale = scale,
            Axis::Y => self.yscale = scale,
        }
        self.calls.push(DrawCall::Scale(axis, scale));
    }

    fn scale(&self, axis: Axis) -> AxisScale {
        match axis {
            Axis::X => self.xscale,
            Axis::Y => self.yscale,
        }
    }

    fn xlim(&self) -> (f64, f64) {
        self.xlim.unwrap_or((0.0, 1.0))
    }

    fn ylim(&self) -> (f64, f64) {
        self.ylim.unwrap_or((0.0, 1.0))
    }

    fn ticks(&self, axis: Axis) -> Vec<f64> {
        let (fixed, (lo, hi)) = match axis {
            Axis::X => (&self.x_fixed, self.xlim()),
            Axis::Y => (&self.y_fixed, self.ylim()),
        };
        match (fixed, self.scale(axis)) {
            (Some(t), _) => t.clone(),
            (None, AxisScale::Linear) => nice_ticks(lo, hi, TARGET_TICKS),
            (None, AxisScale::Log) => log_ticks(lo, hi),
        }
    }
}

/// Canvas that keeps the figure spec and one [`RecordingAxes`] per selected cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingCanvas {
    pub figure: Option<FigureSpec>,
    /// Panels in first-selection order.
    pub panels: Vec<(GridPosition, RecordingAxes)>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self, pos: GridPosition) -> Option<&RecordingAxes> {
        self.panels.iter().find(|(p, _)| *p == pos).map(|(_, a)| a)
    }
}

impl Canvas for RecordingCanvas {
    type Axes = RecordingAxes;

    fn create_figure(&mut self, spec: &FigureSpec) -> Result<()> {
        self.figure = Some(spec.clone());
        self.panels.clear();
        Ok(())
    }

    fn select_panel(&mut self, pos: GridPosition) -> Result<&mut RecordingAxes> {
        let Some(spec) = &self.figure else {
            return Err(PlotError::Engine("no figure created".into()));
        };
        if !spec.layout.contains(pos) {
            return Err(PlotError::Engine(format!(
                "panel ({}, {}) is outside the {}x{} grid",
                pos.row, pos.col, spec.layout.rows, spec.layout.columns
            )));
        }
        let idx = match self.panels.iter().position(|(p, _)| *p == pos) {
            Some(i) => i,
            None => {
                self.panels.push((pos, RecordingAxes::new()));
                self.panels.len() - 1
            }
        };
        Ok(&mut self.panels[idx].1)
    }
}
