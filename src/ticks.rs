//! Tick formatting: label formatters, rotation, raw overrides and the tick grid overlay.

use crate::engine::{Axes, Axis, HAlign};
use crate::error::Result;
use crate::options::{
    NumberFormat, RefLine, TickFn, TickGridOptions, TickLabelMap, TimestampMode, XTickFormat,
    YTickFormat,
};
use crate::style::{Color, LineDash};
use num_format::{Locale, ToFormattedString};

/// Default x tick label rotation, in degrees.
pub const DEFAULT_X_ROTATION: f64 = -25.0;

/// Turns a tick value into its label.
#[derive(Clone, Debug, PartialEq)]
pub enum TickLabeler {
    /// Caller-supplied function.
    Custom(TickFn),
    /// Label looked up by tick value; ticks without an entry get an empty label.
    Lookup(TickLabelMap),
    Number(NumberFormat),
}

impl Default for TickLabeler {
    fn default() -> Self {
        TickLabeler::Number(NumberFormat::default())
    }
}

impl TickLabeler {
    pub fn format(&self, value: f64) -> String {
        match self {
            TickLabeler::Custom(f) => f.call(value),
            TickLabeler::Lookup(map) => map.get(value).unwrap_or_default().to_string(),
            TickLabeler::Number(fmt) => format_number(value, fmt),
        }
    }
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Decimals used when none are requested: whole numbers get none, small values more.
fn adaptive_decimals(v: f64) -> usize {
    if v.fract() == 0.0 {
        return 0;
    }
    let a = v.abs();
    if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    }
}

fn format_timestamp(value: f64, mode: TimestampMode) -> String {
    let secs = value.floor();
    let nanos = ((value - secs) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    match chrono::DateTime::from_timestamp(secs as i64, nanos) {
        Some(dt) => match mode {
            TimestampMode::Iso => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            TimestampMode::Date => dt.format("%Y-%m-%d").to_string(),
        },
        None => value.to_string(),
    }
}

/// Format one value according to `fmt`.
///
/// Order of operations: timestamp (which short-circuits everything else), percentage
/// scaling, K/M/B/T abbreviation, rounding, thousands separators, then prefix and suffix.
pub fn format_number(value: f64, fmt: &NumberFormat) -> String {
    if let Some(mode) = fmt.timestamp {
        return format_timestamp(value, mode);
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let mut v = value;
    let percentage = fmt.percentage.unwrap_or(false);
    if percentage {
        v *= 100.0;
    }

    let mut magnitude = "";
    if fmt.order_of_magnitude.unwrap_or(false) {
        let a = v.abs();
        let (scale, suffix) = if a >= 1.0e12 {
            (1.0e12, "T")
        } else if a >= 1.0e9 {
            (1.0e9, "B")
        } else if a >= 1.0e6 {
            (1.0e6, "M")
        } else if a >= 1.0e3 {
            (1.0e3, "K")
        } else {
            (1.0, "")
        };
        v /= scale;
        magnitude = suffix;
    }

    let decimals = fmt.decimals.unwrap_or_else(|| adaptive_decimals(v));
    let (locale, dec_sep) = map_locale(fmt.locale.as_deref().unwrap_or("en"));
    let body = group_thousands(v, decimals, locale, dec_sep);

    let mut out = String::new();
    if let Some(prefix) = &fmt.prefix {
        out.push_str(prefix);
    }
    out.push_str(&body);
    out.push_str(magnitude);
    if percentage {
        out.push('%');
    }
    if let Some(suffix) = &fmt.suffix {
        out.push_str(suffix);
    }
    out
}

fn group_thousands(v: f64, decimals: usize, locale: &Locale, dec_sep: char) -> String {
    let fixed = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let grouped = match int_part.parse::<u64>() {
        Ok(n) => n.to_formatted_string(locale),
        Err(_) => int_part.to_string(),
    };
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let mut out = String::with_capacity(fixed.len() + 4);
    if v < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(dec_sep);
        out.push_str(frac);
    }
    out
}

fn rotation_align(degrees: f64) -> HAlign {
    if degrees < 0.0 {
        HAlign::Left
    } else if degrees > 0.0 {
        HAlign::Right
    } else {
        HAlign::Center
    }
}

/// Install the x tick labeler, rotate the labels, then apply raw overrides.
///
/// Labeler priority: `formatter`, then `tickmap`, then the number/timestamp format.
pub fn format_x_ticks<A: Axes + ?Sized>(axes: &mut A, opts: &XTickFormat) -> Result<()> {
    let labeler = if let Some(f) = &opts.formatter {
        TickLabeler::Custom(f.clone())
    } else if let Some(map) = &opts.tickmap {
        TickLabeler::Lookup(map.clone())
    } else {
        let mut number = opts.number.clone().unwrap_or_default();
        if number.timestamp.is_none() {
            number.timestamp = opts.timestamps;
        }
        TickLabeler::Number(number)
    };
    axes.set_tick_labeler(Axis::X, labeler);

    let rotation = opts.rotation.unwrap_or(DEFAULT_X_ROTATION);
    axes.set_tick_rotation(Axis::X, rotation, rotation_align(rotation));

    if let Some(overrides) = &opts.overrides {
        axes.apply_tick_overrides(Axis::X, overrides)?;
    }
    Ok(())
}

/// Install the y tick labeler, then apply raw overrides.
pub fn format_y_ticks<A: Axes + ?Sized>(axes: &mut A, opts: &YTickFormat) -> Result<()> {
    let labeler = match &opts.formatter {
        Some(f) => TickLabeler::Custom(f.clone()),
        None => TickLabeler::Number(opts.number.clone().unwrap_or_default()),
    };
    axes.set_tick_labeler(Axis::Y, labeler);

    if let Some(overrides) = &opts.overrides {
        axes.apply_tick_overrides(Axis::Y, overrides)?;
    }
    Ok(())
}

/// Draw a faint line at every current tick, beneath everything else, keeping the limits.
pub fn add_tick_grid<A: Axes + ?Sized>(axes: &mut A, opts: &TickGridOptions) -> Result<()> {
    let (x0, x1) = axes.xlim();
    let (y0, y1) = axes.ylim();

    let style = RefLine {
        color: Some(opts.color.unwrap_or(Color::BLACK)),
        linestyle: Some(opts.linestyle.unwrap_or(LineDash::Dash)),
        linewidth: Some(opts.linewidth.unwrap_or(1.0)),
        alpha: Some(opts.alpha.unwrap_or(0.1)),
        zorder: Some(-999.0),
        ..Default::default()
    };

    if opts.xtick_grid.unwrap_or(true) {
        for tick in axes.ticks(Axis::X) {
            axes.axvline(&RefLine {
                x: Some(tick),
                ..style.clone()
            })?;
        }
    }
    if opts.ytick_grid.unwrap_or(true) {
        for tick in axes.ticks(Axis::Y) {
            axes.axhline(&RefLine {
                y: Some(tick),
                ..style.clone()
            })?;
        }
    }

    axes.set_xlim(x0, x1);
    axes.set_ylim(y0, y1);
    Ok(())
}

/// Options for [`set_labels`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelOptions {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub y_percentage: bool,
    pub y_decimals: Option<usize>,
    pub x_decimals: Option<usize>,
}

/// Labels, default tick formats and the tick grid in one call.
pub fn set_labels<A: Axes + ?Sized>(axes: &mut A, opts: &LabelOptions) -> Result<()> {
    if let Some(title) = &opts.title {
        axes.set_title(title);
    }
    if let Some(xlabel) = &opts.xlabel {
        axes.set_xlabel(xlabel);
    }
    if let Some(ylabel) = &opts.ylabel {
        axes.set_ylabel(ylabel);
    }

    format_x_ticks(
        axes,
        &XTickFormat {
            number: Some(NumberFormat {
                decimals: opts.x_decimals,
                ..Default::default()
            }),
            ..Default::default()
        },
    )?;
    format_y_ticks(
        axes,
        &YTickFormat {
            number: Some(NumberFormat {
                decimals: opts.y_decimals,
                percentage: opts.y_percentage.then_some(true),
                ..Default::default()
            }),
            ..Default::default()
        },
    )?;
    add_tick_grid(axes, &TickGridOptions::default())
}
