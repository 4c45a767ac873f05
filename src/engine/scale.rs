//! "Nice" tick positions for linear and logarithmic axes.

/// Number of ticks the engines aim for on an autoscaled axis.
pub const TARGET_TICKS: usize = 6;

/// Round `range` to 1, 2, 5 or 10 times a power of ten.
pub fn nice_number(range: f64, round: bool) -> f64 {
    let exponent = range.log10().floor();
    let fraction = range / 10_f64.powf(exponent);

    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * 10_f64.powf(exponent)
}

/// Nice tick positions inside `[min, max]`.
pub fn nice_ticks(min: f64, max: f64, num_ticks: usize) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return vec![min];
    }
    if num_ticks < 2 {
        return vec![(min + max) / 2.0];
    }

    let range = nice_number(max - min, false);
    let spacing = nice_number(range / (num_ticks - 1) as f64, true);
    let first = (min / spacing).ceil() as i64;
    let last = (max / spacing).floor() as i64;

    // multiply instead of accumulating so 0.1 steps stay exact-ish
    (first..=last)
        .map(|i| {
            let t = i as f64 * spacing;
            if t.abs() < spacing * 1e-9 { 0.0 } else { t }
        })
        .collect()
}

/// Powers of ten inside `[min, max]`; both ends when the range spans less than a decade.
pub fn log_ticks(min: f64, max: f64) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite()) || min <= 0.0 || max < min {
        return Vec::new();
    }
    let first = min.log10().ceil() as i32;
    let last = max.log10().floor() as i32;
    if first > last {
        return if min == max { vec![min] } else { vec![min, max] };
    }
    (first..=last).map(|e| 10_f64.powi(e)).collect()
}
