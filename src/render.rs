//! Plot Renderer: one [`PlotDatum`] → the ordered drawing calls for one panel.

use crate::engine::Axes;
use crate::error::Result;
use crate::models::{NamePosition, PlotDatum};
use crate::options::{LegendOptions, LineOptions, TickGridOptions};
use crate::ticks::{add_tick_grid, format_x_ticks, format_y_ticks};

/// Render `datum` onto `axes`.
///
/// Order: primary series, `ys`, stacks, histogram, reference lines, name placement,
/// tick formats, title, legend, limits, tick grid, and explicit axis labels last so they
/// win over the name placement. Engine errors are returned as they come; whatever was
/// drawn before the failing call stays drawn.
pub fn plot<A: Axes + ?Sized>(axes: &mut A, datum: &PlotDatum) -> Result<()> {
    let shared_x = datum.x.as_ref().map(|x| x.positions());
    let shared_x = shared_x.as_deref();
    let mut legend_needed = false;

    if let Some(y) = &datum.y {
        let opts = datum.y_kwargs.clone().unwrap_or_default();
        axes.plot(shared_x, y, &opts)?;
    }

    for series in datum.ys.iter().flatten() {
        let own_x = series.x.as_ref().map(|x| x.positions());
        let x = own_x.as_deref().or(shared_x);
        let opts: LineOptions = series.y_kwargs.clone().unwrap_or_default();
        if opts.label.is_some() {
            legend_needed = true;
        }
        axes.plot(x, &series.y, &opts)?;
    }

    if let Some(stacks) = &datum.stacks {
        let opts = datum.stacks_kwargs.clone().unwrap_or_default();
        if opts.labels.is_some() {
            legend_needed = true;
        }
        axes.stackplot(shared_x, stacks, &opts)?;
    }

    if let Some(samples) = &datum.hist {
        let opts = datum.hist_kwargs.clone().unwrap_or_default();
        if opts.label.is_some() {
            legend_needed = true;
        }
        axes.hist(samples, &opts)?;
    }

    for line in datum.hlines.iter().flatten() {
        axes.axhline(line)?;
    }
    for line in datum.vlines.iter().flatten() {
        axes.axvline(line)?;
    }

    // category labels come from the shared x, else from the first series with its own
    let categories = datum.x.as_ref().and_then(|x| x.categories()).or_else(|| {
        datum
            .ys
            .iter()
            .flatten()
            .find_map(|s| s.x.as_ref().and_then(|x| x.categories()))
    });
    if let Some(categories) = categories {
        axes.set_categories(categories);
    }

    if let (Some(name), Some(position)) = (&datum.name, datum.name_position) {
        match position {
            NamePosition::Ylabel => {
                axes.set_ylabel(name);
                axes.move_y_ticks_right();
            }
            NamePosition::Title => axes.set_title(name),
        }
    }

    if let Some(opts) = &datum.xtick_format {
        format_x_ticks(axes, opts)?;
    }
    if let Some(opts) = &datum.ytick_format {
        format_y_ticks(axes, opts)?;
    }

    if let Some(title) = &datum.title {
        axes.set_title(title);
    }

    if legend_needed || datum.legend_kwargs.is_some() {
        let opts: LegendOptions = datum.legend_kwargs.clone().unwrap_or_default();
        axes.legend(&opts);
    }

    if let Some([lo, hi]) = datum.xlim {
        axes.set_xlim(lo, hi);
    }
    if let Some([lo, hi]) = datum.ylim {
        axes.set_ylim(lo, hi);
    }

    if datum.tickgrid.unwrap_or(false) {
        let opts: TickGridOptions = datum.tickgrid_kwargs.clone().unwrap_or_default();
        add_tick_grid(axes, &opts)?;
    }

    if let Some(xlabel) = &datum.xlabel {
        axes.set_xlabel(xlabel);
    }
    if let Some(ylabel) = &datum.ylabel {
        axes.set_ylabel(ylabel);
    }
    Ok(())
}
