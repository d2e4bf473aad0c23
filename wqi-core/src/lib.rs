//! Water Quality Index scoring engine.
//!
//! This crate implements the pure domain logic of the monitoring service:
//! converting a set of observed water-parameter readings into a single
//! normalized score (the WQI), and classifying that score into a
//! qualitative status label with a display color.
//!
//! # Architecture
//!
//! Data flows one way: raw observed readings → [`compute_score`] → numeric
//! score → [`StatusScale::classify`] → label/color pair. Both operations
//! are stateless pure functions of their inputs; the only configuration
//! they depend on (the [`Profile`] of ideal/standard values and the
//! [`StatusScale`] of classification buckets) is passed in explicitly and
//! is immutable for the duration of a calculation, so callers may invoke
//! them concurrently without coordination.
//!
//! # Usage
//!
//! ```rust
//! use wqi_core::{compute_score, Parameter, ParameterSet, Profile, StatusScale};
//!
//! let mut readings = ParameterSet::new();
//! readings.set(Parameter::Ph, 7.4);
//! readings.set(Parameter::Turbidity, 9.2);
//!
//! let score = compute_score(&readings, &Profile::default());
//! let scale = StatusScale::default();
//! let (label, color) = scale.classify(score);
//! assert!(score.is_some());
//! assert!(!label.is_empty() && !color.is_empty());
//! ```
//!
//! An empty or entirely unusable reading set yields `None` ("no data"),
//! which is a distinct outcome from a score of `0.0` (pristine water).

pub mod geo;
pub mod index;
pub mod parameter;
pub mod profile;
pub mod reference;
pub mod status;

pub use index::{coerce_number, compute_score, round2};
pub use parameter::{Parameter, ParameterSet};
pub use profile::{DeviationPolicy, Limits, Profile};
pub use reference::ReferenceSite;
pub use status::{Bucket, Grade, StatusScale};
