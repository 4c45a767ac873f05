//! Applying `common` options to each panel's datum.
//!
//! Two rules, applied per panel on a working copy:
//! - plain fields: a field the panel did not set is taken from `common` as a whole;
//! - `merge` fields: the panel's own option mapping keeps every key it set, and the
//!   keys it left unset are filled from `common.merge`. A panel without the mapping
//!   gets the `common.merge` value as is.

use crate::models::{CommonOptions, MergeOptions, PlotDatum};
use crate::options::{
    HistOptions, LegendOptions, LineOptions, NumberFormat, RefLine, StackOptions,
    TickGridOptions, TickOverrides, XTickFormat, YTickFormat,
};

/// Fill every unset field of `self` from `defaults`, leaving set fields alone.
pub trait FillDefaults {
    fn fill_defaults(&mut self, defaults: &Self);
}

macro_rules! fill_defaults_impl {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl FillDefaults for $ty {
            fn fill_defaults(&mut self, defaults: &Self) {
                $(
                    if self.$field.is_none() {
                        self.$field = defaults.$field.clone();
                    }
                )*
            }
        }
    };
}

fill_defaults_impl!(LineOptions {
    label, color, linestyle, linewidth, alpha, marker, markersize, zorder
});
fill_defaults_impl!(StackOptions { labels, colors, alpha });
fill_defaults_impl!(HistOptions {
    bins, range, density, log_bins, bin_min, color, alpha, label
});
fill_defaults_impl!(RefLine { x, y, color, linestyle, linewidth, alpha, label, zorder });
fill_defaults_impl!(LegendOptions { loc, frameon, framealpha, fontsize, title });
fill_defaults_impl!(TickGridOptions { alpha, color, linestyle, linewidth, xtick_grid, ytick_grid });
fill_defaults_impl!(NumberFormat {
    decimals, percentage, order_of_magnitude, locale, prefix, suffix, timestamp
});
fill_defaults_impl!(TickOverrides { rotation, fontsize, ticks, labels });
fill_defaults_impl!(XTickFormat { rotation, timestamps, tickmap, number, overrides, formatter });
fill_defaults_impl!(YTickFormat { number, overrides, formatter });
fill_defaults_impl!(PlotDatum {
    name,
    name_position,
    title,
    xlabel,
    ylabel,
    x,
    y,
    y_kwargs,
    ys,
    stacks,
    stacks_kwargs,
    hist,
    hist_kwargs,
    hlines,
    vlines,
    tickgrid,
    tickgrid_kwargs,
    xtick_format,
    ytick_format,
    xlim,
    ylim,
    legend_kwargs,
});

/// Shallow union: `slot` keeps its own keys, `defaults` supplies the rest.
fn merge_slot<T: FillDefaults + Clone>(slot: &mut Option<T>, defaults: &Option<T>) {
    let Some(defaults) = defaults else {
        return;
    };
    match slot {
        Some(own) => own.fill_defaults(defaults),
        None => *slot = Some(defaults.clone()),
    }
}

impl MergeOptions {
    /// Merge every mapping present in this table into `datum`.
    pub fn apply_to(&self, datum: &mut PlotDatum) {
        merge_slot(&mut datum.y_kwargs, &self.y_kwargs);
        merge_slot(&mut datum.stacks_kwargs, &self.stacks_kwargs);
        merge_slot(&mut datum.hist_kwargs, &self.hist_kwargs);
        merge_slot(&mut datum.legend_kwargs, &self.legend_kwargs);
        merge_slot(&mut datum.tickgrid_kwargs, &self.tickgrid_kwargs);
        merge_slot(&mut datum.xtick_format, &self.xtick_format);
        merge_slot(&mut datum.ytick_format, &self.ytick_format);
    }
}

/// Build the working copy of `datum` with `common` applied.
///
/// Plain fallbacks are applied before the `merge` table, so a mapping set both as a
/// plain common field and under `merge` ends up as the merge of the two.
pub fn merge_common(datum: &PlotDatum, common: &CommonOptions) -> PlotDatum {
    let mut merged = datum.clone();
    merged.fill_defaults(&common.defaults);
    common.merge.apply_to(&mut merged);
    merged
}
