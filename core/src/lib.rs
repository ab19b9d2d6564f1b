//! ridetune_core – dekktrykk, temperatur-/høydekompensasjon og vindkurs.
//!
//! De tre modellene (`pressure`, `compensation`, `wind`) er rene funksjoner.
//! Vær og høyde hentes av en injisert `ConditionsProvider`; `advisor` setter
//! alt sammen og gjør manglende data om til eksplisitte "unavailable"-utfall.

pub mod advisor;
pub mod api;
pub mod cli;
pub mod compensation;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod pressure;
pub mod units;
pub mod weather;
pub mod weather_api;
pub mod wind;

#[cfg(feature = "python")]
mod py;

pub use advisor::{advise, Advice, AdviceInputs, CompensationOutcome, WindOutcome};
pub use compensation::{
    compensate, elevation_to_ambient_pressure, recommend, CompensatedPressures, CompensationInput,
    CompensationMode,
};
pub use config::{load_settings, save_settings, Settings};
pub use error::{ApiError, LookupError, ParseLabelError};
pub use metrics::Metrics;
pub use models::{AmbientConditions, Coordinates, RiderSetup, WeightUnit, WindObservation};
pub use pressure::{
    compute_pressure, recommend_baseline, BaselinePressures, RideSpeed, Surface, TireType, WheelLoad,
    WheelSize,
};
pub use units::{to_bar, RoundTo, PSI_PER_BAR};
pub use weather::{CachedConditions, ConditionsProvider, StaticConditions};
pub use weather_api::OpenMeteoClient;
pub use wind::{
    compass16, recommend_headings, score_heading, wind_components, AngleInterval, HeadingCandidate,
    HeadingOptions, HeadingScore, WindComponents, WindKind, WindSide,
};
