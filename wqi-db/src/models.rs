//! Row model structs for the three persisted tables.
//!
//! All structs derive `Serialize` so the HTTP layer can hand them to
//! clients as JSON without an extra mapping step.

use serde::Serialize;
use wqi_core::{Parameter, ParameterSet};

/// A user-added monitoring point.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Location {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
}

/// One set of readings taken at a location.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WaterSample {
    pub id: i64,
    pub location_id: i64,
    pub ph: Option<f64>,
    pub dissolved_oxygen: Option<f64>,
    pub tds: Option<f64>,
    pub turbidity: Option<f64>,
    pub nitrate: Option<f64>,
    pub temperature: Option<f64>,
    /// Cached index score; NULL until computed (backfilled lazily).
    pub wqi: Option<f64>,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
}

impl WaterSample {
    /// The sample's parameter columns as an insert/update payload.
    pub fn values(&self) -> SampleValues {
        SampleValues {
            ph: self.ph,
            dissolved_oxygen: self.dissolved_oxygen,
            tds: self.tds,
            turbidity: self.turbidity,
            nitrate: self.nitrate,
            temperature: self.temperature,
        }
    }

    /// The stored readings as a scoring input; NULL columns are omitted
    /// rather than passed as zero.
    pub fn readings(&self) -> ParameterSet {
        self.values().readings()
    }
}

/// Parameter columns for inserting or updating a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SampleValues {
    pub ph: Option<f64>,
    pub dissolved_oxygen: Option<f64>,
    pub tds: Option<f64>,
    pub turbidity: Option<f64>,
    pub nitrate: Option<f64>,
    pub temperature: Option<f64>,
}

impl SampleValues {
    pub fn readings(&self) -> ParameterSet {
        let mut set = ParameterSet::new();
        set.set_opt(Parameter::Ph, self.ph);
        set.set_opt(Parameter::DissolvedOxygen, self.dissolved_oxygen);
        set.set_opt(Parameter::Tds, self.tds);
        set.set_opt(Parameter::Turbidity, self.turbidity);
        set.set_opt(Parameter::Nitrate, self.nitrate);
        set.set_opt(Parameter::Temperature, self.temperature);
        set
    }
}

/// One ingested sensor reading.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IotReading {
    pub id: i64,
    pub temperature_c: f64,
    /// Raw turbidity sensor value; mirrors the NTU value when the sensor
    /// reports only NTU.
    pub turbidity_percent: f64,
    pub ph: Option<f64>,
    pub turbidity_ntu: Option<f64>,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
}
