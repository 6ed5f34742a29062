//! Axis-tick rounding helpers.
//!
//! Annotation and tick spacings look right when they land on 1, 2, or 5
//! times a power of ten; these functions snap arbitrary values to that
//! grid.

/// Rounds upwards to a factor of ten from the default 1/2/5/10 table.
pub fn round_up(value: f64) -> f64 {
    round_up_with(value, &[1.0, 2.0, 5.0, 10.0])
}

/// Rounds upwards to `factor * 10^k` for a factor from the given table.
pub fn round_up_with(value: f64, factors: &[f64]) -> f64 {
    if value < 0.0 {
        return -round_down(-value);
    }
    if value == 0.0 {
        return 0.0;
    }

    let pow10 = 10f64.powf(value.log10().floor());
    let mut interval = pow10;
    let mut difference = (interval - value).abs();
    for &factor in factors {
        if (factor * pow10 - interval).abs() < difference || interval < value {
            interval = factor * pow10;
            difference = (interval - value).abs();
        }
    }
    interval
}

/// Rounds downwards to a fraction of ten from the default 1/0.5/0.2/0.1
/// table.
pub fn round_down(value: f64) -> f64 {
    round_down_with(value, &[1.0, 0.5, 0.2, 0.1])
}

/// Rounds downwards to `fraction * 10^k` for a fraction from the given
/// table.
pub fn round_down_with(value: f64, fractions: &[f64]) -> f64 {
    if value < 0.0 {
        return -round_up(-value);
    }
    if value == 0.0 {
        return 0.0;
    }

    let pow10 = 10f64.powf(value.log10().ceil());
    let mut interval = pow10;
    let mut difference = (interval - value).abs();
    for &fraction in fractions {
        if (fraction * pow10 - interval).abs() < difference || interval > value {
            interval = fraction * pow10;
            difference = (interval - value).abs();
        }
    }
    interval
}

/// Expands an interval outwards to rounded bounds.
pub fn expand_interval(interval: [f64; 2]) -> [f64; 2] {
    [round_down(interval[0]), round_up(interval[1])]
}
