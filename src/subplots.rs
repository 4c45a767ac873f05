//! Multi-Plot Driver: lays out a grid of panels and renders each datum with `common` merged in.

use crate::engine::{Axes, Canvas, FigureSpec, GridLayout};
use crate::error::Result;
use crate::merge::merge_common;
use crate::models::{DEFAULT_FIGURE_WIDTH, PlotData};
use crate::render;

/// `figure.figsize` when given, else full width and `subplot_height` per row.
pub fn resolve_figsize(data: &PlotData, layout: &GridLayout) -> (f64, f64) {
    match data.figure.figsize {
        Some([w, h]) => (w, h),
        None => (
            DEFAULT_FIGURE_WIDTH,
            data.subplot_height * layout.rows as f64,
        ),
    }
}

/// Create a figure on `canvas` and render every panel of `data`, in document order.
///
/// An empty `plots` mapping still creates the (empty) figure; nothing is rendered and no
/// error is returned.
pub fn plot_subplots<C: Canvas>(canvas: &mut C, data: &PlotData) -> Result<()> {
    let layout = GridLayout::new(data.plots.len(), data.subplots.n_columns)?;
    let spec = FigureSpec {
        size: resolve_figsize(data, &layout),
        layout,
        options: data.figure.clone(),
    };
    canvas.create_figure(&spec)?;

    if data.plots.is_empty() {
        log::info!("no plots specified, skipping plotting");
        return Ok(());
    }

    for (index, (id, datum)) in data.plots.iter().enumerate() {
        let merged = merge_common(datum, &data.common);
        let position = layout.position(index);
        log::debug!(
            "rendering plot {id:?} at row {}, column {}",
            position.row,
            position.col
        );
        let axes = canvas.select_panel(position)?;
        if index == 0
            && let Some(title) = &data.title
        {
            axes.set_figure_title(title);
        }
        render::plot(axes, &merged)?;
    }
    Ok(())
}
