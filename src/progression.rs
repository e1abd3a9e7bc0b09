//! Progression annotations for freshly logged entries.
//!
//! Weight progress is measured against the last logged entry for the same
//! exercise. Rep progress on the third set is measured against a fixed
//! target instead of history.

use crate::models::Entry;

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_CHANGE: &str = "no change";
/// Target rep count for the third set.
pub const REPS_BASELINE: i64 = 8;
const REPS_SLOT: usize = 2;

/// Fills in `weight_change` and `reps3_change` for `entry`.
///
/// `history` is scanned in the order the entry store returns it and the last
/// matching exercise wins, so the comparison is against the most recently
/// appended entry rather than the latest date.
pub fn annotate(mut entry: Entry, history: &[Entry]) -> Entry {
    let previous = history
        .iter()
        .rev()
        .find(|prior| prior.exercise == entry.exercise)
        .map(|prior| prior.weight.as_str());

    entry.weight_change = weight_change(&entry.weight, previous);
    entry.reps3_change = reps3_change(&entry.reps);
    entry
}

pub fn weight_change(current: &str, previous: Option<&str>) -> String {
    let (Some(current), Some(previous)) = (parse_weight(current), previous.and_then(parse_weight))
    else {
        return NOT_AVAILABLE.to_string();
    };

    let diff = current - previous;
    if diff == 0.0 {
        NO_CHANGE.to_string()
    } else {
        format!("{} lbs", signed_general(diff))
    }
}

pub fn reps3_change(reps: &[String]) -> String {
    let Some(reps3) = reps.get(REPS_SLOT).and_then(|value| parse_reps(value)) else {
        return NOT_AVAILABLE.to_string();
    };

    let diff = reps3 - REPS_BASELINE;
    if diff == 0 {
        NO_CHANGE.to_string()
    } else {
        format!("{diff:+} reps")
    }
}

pub fn parse_weight(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite())
}

pub fn parse_reps(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

// Six significant digits with an explicit sign, switching to exponent form
// outside 1e-4..1e6 the way C's `%+g` does. Float noise such as
// 5.300000000000011 prints as +5.3.
fn signed_general(value: f64) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    let magnitude = value.abs();
    let scientific = format!("{magnitude:.5e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..6).contains(&exponent) {
        let decimals = usize::try_from(5 - exponent).unwrap_or(0);
        let fixed = format!("{magnitude:.decimals$}");
        format!("{sign}{}", trim_fraction(&fixed))
    } else {
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{sign}{}e{exponent_sign}{:02}",
            trim_fraction(mantissa),
            exponent.abs()
        )
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}
