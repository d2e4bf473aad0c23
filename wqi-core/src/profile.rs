//! Parameter profiles: ideal targets, permissible limits, deviation policies.

use crate::parameter::Parameter;
use serde::Deserialize;
use std::collections::BTreeMap;

/// How a reading's deviation from the ideal converts into a sub-index.
///
/// Keeping the formulas as one variant per policy (rather than branching
/// per parameter) makes each deviation rule testable in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationPolicy {
    /// Readings above the ideal degrade quality (turbidity, TDS, nitrate).
    MoreIsWorse,
    /// Deviation in either direction degrades quality (pH, temperature).
    EitherWayBad,
    /// Readings below the standard degrade quality (dissolved oxygen);
    /// the sub-index grows as the reading falls toward the standard.
    LessIsWorse,
}

impl DeviationPolicy {
    /// Sub-index for an observed value on a 0–100-ish scale.
    ///
    /// Returns `None` for a degenerate profile entry (`standard == ideal`
    /// would divide by zero). A reading better than ideal clamps to zero
    /// instead of contributing a negative, quality-improving amount.
    pub fn sub_index(&self, observed: f64, ideal: f64, standard: f64) -> Option<f64> {
        let (deviation, gap) = match self {
            DeviationPolicy::MoreIsWorse => (observed - ideal, standard - ideal),
            DeviationPolicy::EitherWayBad => ((observed - ideal).abs(), standard - ideal),
            DeviationPolicy::LessIsWorse => (ideal - observed, ideal - standard),
        };
        if gap == 0.0 {
            return None;
        }
        Some((100.0 * deviation / gap).max(0.0))
    }
}

/// Ideal and permissible-limit values for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Limits {
    /// Target value representing pristine water.
    pub ideal: f64,
    /// Permissible regulatory limit.
    pub standard: f64,
    pub policy: DeviationPolicy,
}

/// The ideal/standard table the calculator scores against.
///
/// Immutable for the duration of a calculation and always passed
/// explicitly; [`Profile::default`] is the built-in drinking-water table.
/// An alternative table can be loaded from JSON of the shape:
///
/// ```json
/// { "ph": { "ideal": 7.0, "standard": 8.5, "policy": "either_way_bad" } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    entries: BTreeMap<Parameter, Limits>,
}

impl Profile {
    pub fn new(entries: impl IntoIterator<Item = (Parameter, Limits)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Parse a profile from its JSON representation.
    pub fn from_json(data: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn limits(&self, parameter: Parameter) -> Option<&Limits> {
        self.entries.get(&parameter)
    }

    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        self.entries.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The normalizing constant `K = 1 / Σ(1 / standard)` over all entries
    /// with a positive standard. `None` for a degenerate profile where the
    /// sum is zero (no usable entries), in which case no score exists.
    pub fn normalizing_constant(&self) -> Option<f64> {
        let sum: f64 = self
            .entries
            .values()
            .filter(|limits| limits.standard > 0.0)
            .map(|limits| 1.0 / limits.standard)
            .sum();
        (sum != 0.0).then(|| 1.0 / sum)
    }
}

impl Default for Profile {
    fn default() -> Self {
        use DeviationPolicy::{EitherWayBad, LessIsWorse, MoreIsWorse};
        Self::new([
            (
                Parameter::Ph,
                Limits {
                    ideal: 7.0,
                    standard: 8.5,
                    policy: EitherWayBad,
                },
            ),
            (
                Parameter::DissolvedOxygen,
                Limits {
                    ideal: 14.6,
                    standard: 5.0,
                    policy: LessIsWorse,
                },
            ),
            (
                Parameter::Tds,
                Limits {
                    ideal: 0.0,
                    standard: 500.0,
                    policy: MoreIsWorse,
                },
            ),
            (
                Parameter::Turbidity,
                Limits {
                    ideal: 0.0,
                    standard: 5.0,
                    policy: MoreIsWorse,
                },
            ),
            (
                Parameter::Nitrate,
                Limits {
                    ideal: 0.0,
                    standard: 45.0,
                    policy: MoreIsWorse,
                },
            ),
            (
                Parameter::Temperature,
                Limits {
                    ideal: 25.0,
                    standard: 30.0,
                    policy: EitherWayBad,
                },
            ),
        ])
    }
}
