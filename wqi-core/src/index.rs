//! The WQI calculator: a weighted arithmetic index over observed readings.
//!
//! Each contributing parameter gets a weight `w = K / standard` where
//! `K = 1 / Σ(1 / standard)` normalizes the weights to sum to one across
//! the full profile, and a sub-index `q` measuring deviation from the
//! ideal value (see [`DeviationPolicy::sub_index`]). The score is the
//! weighted mean `Σ(q·w) / Σ(w)` over the parameters that actually
//! contributed, rounded to two decimals.
//!
//! [`DeviationPolicy::sub_index`]: crate::profile::DeviationPolicy::sub_index

use crate::parameter::ParameterSet;
use crate::profile::Profile;
use serde_json::Value;

/// Round to two decimal places, the precision stored and displayed.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coerce a raw observed value into a finite number.
///
/// Numbers pass through, numeric strings are parsed; nulls, other JSON
/// types, and non-numeric strings yield `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Compute the Water Quality Index for a set of observed readings.
///
/// Returns `None` ("no data") when the profile is degenerate or when no
/// parameter contributed — an outcome distinct from `Some(0.0)`, which is
/// a valid, excellent score. Individual unusable readings (nulls, values
/// that fail numeric coercion, parameters absent from the profile, profile
/// entries with `standard == ideal` or a non-positive standard) are
/// skipped; they never abort the calculation.
pub fn compute_score(readings: &ParameterSet, profile: &Profile) -> Option<f64> {
    let k = profile.normalizing_constant()?;

    let mut total_weighted = 0.0;
    let mut total_weight = 0.0;
    for (parameter, raw) in readings.iter() {
        if raw.is_null() {
            continue;
        }
        let Some(limits) = profile.limits(parameter) else {
            continue;
        };
        if limits.standard <= 0.0 {
            continue;
        }
        let Some(observed) = coerce_number(raw) else {
            log::debug!("wqi: skipping {parameter}, unusable value {raw}");
            continue;
        };
        let Some(q) = limits.policy.sub_index(observed, limits.ideal, limits.standard) else {
            continue;
        };
        let weight = k / limits.standard;
        total_weighted += q * weight;
        total_weight += weight;
    }

    if total_weight == 0.0 {
        None
    } else {
        Some(round2(total_weighted / total_weight))
    }
}
