//! The monitored water-quality parameters and observed reading sets.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A measured water-quality parameter.
///
/// Wire names are the lowercase short forms used by the HTTP API and the
/// sample store: `ph`, `do`, `tds`, `turbidity`, `nitrate`, `temperature`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Parameter {
    #[serde(rename = "ph")]
    Ph,
    /// Dissolved oxygen (mg/L), wire name `do`.
    #[serde(rename = "do")]
    DissolvedOxygen,
    /// Total dissolved solids (mg/L).
    #[serde(rename = "tds")]
    Tds,
    /// Turbidity (NTU).
    #[serde(rename = "turbidity")]
    Turbidity,
    /// Nitrate (mg/L).
    #[serde(rename = "nitrate")]
    Nitrate,
    /// Water temperature (°C).
    #[serde(rename = "temperature")]
    Temperature,
}

impl Parameter {
    /// All six parameters, in canonical order.
    pub const ALL: [Parameter; 6] = [
        Parameter::Ph,
        Parameter::DissolvedOxygen,
        Parameter::Tds,
        Parameter::Turbidity,
        Parameter::Nitrate,
        Parameter::Temperature,
    ];

    /// The wire name of this parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Ph => "ph",
            Parameter::DissolvedOxygen => "do",
            Parameter::Tds => "tds",
            Parameter::Turbidity => "turbidity",
            Parameter::Nitrate => "nitrate",
            Parameter::Temperature => "temperature",
        }
    }

    /// Look up a parameter by its wire name. Unknown names yield `None`,
    /// which lets payload parsing drop unrecognized keys silently.
    pub fn from_name(name: &str) -> Option<Parameter> {
        match name {
            "ph" => Some(Parameter::Ph),
            "do" => Some(Parameter::DissolvedOxygen),
            "tds" => Some(Parameter::Tds),
            "turbidity" => Some(Parameter::Turbidity),
            "nitrate" => Some(Parameter::Nitrate),
            "temperature" => Some(Parameter::Temperature),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An observed reading set: parameter → raw value.
///
/// Values arrive from HTTP payloads and may be numbers, numeric strings,
/// nulls, or garbage; coercion happens during scoring, where unusable
/// values are skipped rather than rejected. Backed by a `BTreeMap` so
/// iteration (and therefore scoring) is independent of input key order.
///
/// Deserializing from JSON accepts any object and keeps only the keys
/// that name a known [`Parameter`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterSet(BTreeMap<Parameter, Value>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Record a raw observed value for a parameter.
    pub fn set(&mut self, parameter: Parameter, value: impl Into<Value>) {
        self.0.insert(parameter, value.into());
    }

    /// Record a value only when one is present; `None` stays absent
    /// rather than becoming a null entry.
    pub fn set_opt(&mut self, parameter: Parameter, value: Option<f64>) {
        if let Some(value) = value {
            self.set(parameter, value);
        }
    }

    pub fn get(&self, parameter: Parameter) -> Option<&Value> {
        self.0.get(&parameter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, &Value)> {
        self.0.iter().map(|(p, v)| (*p, v))
    }
}

impl FromIterator<(Parameter, Value)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (Parameter, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for ParameterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Map::deserialize(deserializer)?;
        let mut set = ParameterSet::new();
        for (key, value) in raw {
            if let Some(parameter) = Parameter::from_name(&key) {
                set.0.insert(parameter, value);
            }
        }
        Ok(set)
    }
}
