//! Stacked bars over named categories.

use crate::engine::Axes;
use crate::error::{PlotError, Result};
use crate::options::{
    BarOptions, LegendOptions, TickFn, TickGridOptions, TickOverrides, XTickFormat,
    YTickFormat,
};
use crate::ticks::{add_tick_grid, format_x_ticks, format_y_ticks};

/// One named series, one value per category.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl BarSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Label of the category under tick `value`; empty past the last category.
fn category_label(categories: &[String], value: f64) -> String {
    let index = value.trunc();
    if index < 0.0 {
        return String::new();
    }
    categories
        .get(index as usize)
        .cloned()
        .unwrap_or_default()
}

/// Stack `series` bottom to top, one bar per category at `0..categories.len()`.
///
/// Adds a legend when there is more than one series, then the default y format, x ticks
/// labelled with their category and the tick grid.
pub fn plot_bar<A: Axes + ?Sized>(
    axes: &mut A,
    series: &[BarSeries],
    categories: &[String],
) -> Result<()> {
    let positions: Vec<f64> = (0..categories.len()).map(|i| i as f64).collect();
    let mut bottom = vec![0.0; categories.len()];
    for s in series {
        if s.values.len() != categories.len() {
            return Err(PlotError::Engine(format!(
                "bar series {} has {} values for {} categories",
                s.name,
                s.values.len(),
                categories.len()
            )));
        }
        let opts = BarOptions {
            label: Some(s.name.clone()),
            ..Default::default()
        };
        axes.bar(&positions, &s.values, Some(&bottom), &opts)?;
        for (b, v) in bottom.iter_mut().zip(&s.values) {
            *b += v;
        }
    }
    if series.len() > 1 {
        axes.legend(&LegendOptions::default());
    }

    format_y_ticks(axes, &YTickFormat::default())?;
    let labels = categories.to_vec();
    format_x_ticks(
        axes,
        &XTickFormat {
            formatter: Some(TickFn::new(move |tick| category_label(&labels, tick))),
            overrides: Some(TickOverrides {
                ticks: Some(positions),
                ..Default::default()
            }),
            ..Default::default()
        },
    )?;
    add_tick_grid(axes, &TickGridOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Axis, DrawCall, RecordingAxes};

    fn cats(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn series_stack_on_the_running_total() {
        let mut axes = RecordingAxes::new();
        let series = [
            BarSeries::new("a", vec![1.0, 2.0]),
            BarSeries::new("b", vec![3.0, 4.0]),
        ];
        plot_bar(&mut axes, &series, &cats(&["x", "y"])).unwrap();
        let bottoms: Vec<Option<Vec<f64>>> = axes
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Bar { bottom, .. } => Some(bottom.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(bottoms, vec![Some(vec![0.0, 0.0]), Some(vec![1.0, 2.0])]);
        assert!(axes.legend_requested());
        assert_eq!(axes.ticks(Axis::X), vec![0.0, 1.0]);
    }

    #[test]
    fn single_series_has_no_legend() {
        let mut axes = RecordingAxes::new();
        plot_bar(&mut axes, &[BarSeries::new("only", vec![1.0])], &cats(&["x"])).unwrap();
        assert!(!axes.legend_requested());
    }

    #[test]
    fn category_labels_truncate_and_blank_out_of_range() {
        let categories = cats(&["mon", "tue"]);
        assert_eq!(category_label(&categories, 1.7), "tue");
        assert_eq!(category_label(&categories, -0.4), "mon");
        assert_eq!(category_label(&categories, 2.0), "");
        assert_eq!(category_label(&categories, -1.0), "");
    }

    #[test]
    fn ragged_series_are_rejected() {
        let mut axes = RecordingAxes::new();
        let err = plot_bar(&mut axes, &[BarSeries::new("a", vec![1.0])], &cats(&["x", "y"]))
            .unwrap_err();
        assert!(err.to_string().contains("1 values for 2 categories"));
    }
}
