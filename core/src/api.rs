// core/src/api.rs
// JSON inn / JSON ut. Brukes av Python-modulen og av andre ikke-Rust-kallere.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json as json;
use serde_path_to_error as spte;

use crate::advisor::CompensationOutcome;
use crate::compensation::{recommend, CompensationMode, DEFAULT_REF_TEMP_C};
use crate::error::ApiError;
use crate::metrics::{
    compensation_unavailable_total, pressure_recommendations_total, wind_no_data_total, GLOBAL,
};
use crate::models::RiderSetup;
use crate::pressure::recommend_baseline;
use crate::wind::{recommend_headings, wind_components, HeadingCandidate, HeadingOptions, WindComponents};

fn parse<T: DeserializeOwned>(what: &'static str, json_in: &str) -> Result<T, ApiError> {
    let mut de = json::Deserializer::from_str(json_in);
    spte::deserialize(&mut de).map_err(|e| ApiError::Parse {
        what,
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

fn bump(counter: fn(&crate::metrics::Metrics) -> &prometheus::IntCounter) {
    if let Some(m) = &*GLOBAL {
        counter(m).inc();
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Grunntrykk
// ──────────────────────────────────────────────────────────────────────────────

/// `RiderSetup` som JSON → `BaselinePressures` som JSON.
pub fn recommend_pressure_json(json_in: &str) -> Result<String, ApiError> {
    let setup: RiderSetup = parse("RiderSetup", json_in)?;
    // recommend_baseline avbryter på ugyldig last; her blir det en feil
    setup.validate().map_err(ApiError::Invalid)?;
    let out = recommend_baseline(&setup);
    bump(pressure_recommendations_total);
    Ok(json::to_string(&out)?)
}

// ──────────────────────────────────────────────────────────────────────────────
// Kompensasjon
// ──────────────────────────────────────────────────────────────────────────────

fn default_ref_temp() -> f64 {
    DEFAULT_REF_TEMP_C
}

#[derive(Debug, Deserialize)]
struct CompensateIn {
    #[serde(alias = "front_ref_psi", alias = "frontPsi")]
    front_psi: f64,
    #[serde(alias = "rear_ref_psi", alias = "rearPsi")]
    rear_psi: f64,
    #[serde(default = "default_ref_temp", alias = "refTempC")]
    ref_temp_c: f64,
    /// `null` når temperaturen ikke kunne hentes
    #[serde(default, alias = "ambientTempC", alias = "temperature_c")]
    ambient_temp_c: Option<f64>,
    #[serde(default, alias = "elevationM", alias = "elevation")]
    elevation_m: Option<f64>,
    #[serde(default)]
    mode: CompensationMode,
    #[serde(default)]
    keep_absolute_constant: Option<bool>,
}

pub fn compensate_json(json_in: &str) -> Result<String, ApiError> {
    let req: CompensateIn = parse("CompensateIn", json_in)?;
    let mode = req
        .keep_absolute_constant
        .map(CompensationMode::from_flag)
        .unwrap_or(req.mode);

    let out = match (req.ambient_temp_c, req.elevation_m) {
        (Some(t), Some(h)) => match recommend(
            req.front_psi,
            req.rear_psi,
            req.ref_temp_c,
            t,
            h,
            mode.keeps_absolute_constant(),
        ) {
            Some(p) => CompensationOutcome::Available(p),
            None => CompensationOutcome::Unavailable { reason: "non_finite_conditions".into() },
        },
        (None, _) => CompensationOutcome::Unavailable { reason: "missing_temperature".into() },
        (_, None) => CompensationOutcome::Unavailable { reason: "missing_elevation".into() },
    };
    if matches!(out, CompensationOutcome::Unavailable { .. }) {
        bump(compensation_unavailable_total);
    }
    Ok(json::to_string(&out)?)
}

// ──────────────────────────────────────────────────────────────────────────────
// Vind
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HeadingsIn {
    #[serde(default, alias = "wind_from_deg", alias = "wind_dir_deg")]
    from_deg: Option<f64>,
    #[serde(default, alias = "wind_speed")]
    speed: Option<f64>,
    #[serde(default)]
    options: HeadingOptions,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum HeadingsOut {
    Available { headings: Vec<HeadingCandidate> },
    NoData { reason: &'static str },
}

pub fn recommend_headings_json(json_in: &str) -> Result<String, ApiError> {
    let req: HeadingsIn = parse("HeadingsIn", json_in)?;
    req.options
        .validate()
        .map_err(|msg| ApiError::Invalid(format!("options: {msg}")))?;

    let out = match (req.from_deg, req.speed) {
        (Some(from), Some(speed)) => match recommend_headings(from, speed, &req.options) {
            Some(headings) => HeadingsOut::Available { headings },
            None => HeadingsOut::NoData { reason: "non_finite_wind" },
        },
        _ => HeadingsOut::NoData { reason: "missing_wind" },
    };
    if matches!(out, HeadingsOut::NoData { .. }) {
        bump(wind_no_data_total);
    }
    Ok(json::to_string(&out)?)
}

#[derive(Debug, Deserialize)]
struct ComponentsIn {
    heading_deg: f64,
    #[serde(default, alias = "wind_from_deg", alias = "wind_dir_deg")]
    from_deg: Option<f64>,
    #[serde(default, alias = "wind_speed")]
    speed: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum ComponentsOut {
    Available(WindComponents),
    NoData,
}

pub fn wind_components_json(json_in: &str) -> Result<String, ApiError> {
    let req: ComponentsIn = parse("ComponentsIn", json_in)?;
    let out = match (req.from_deg, req.speed) {
        (Some(from), Some(speed)) => wind_components(req.heading_deg, from, speed)
            .map(ComponentsOut::Available)
            .unwrap_or(ComponentsOut::NoData),
        _ => ComponentsOut::NoData,
    };
    Ok(json::to_string(&out)?)
}
