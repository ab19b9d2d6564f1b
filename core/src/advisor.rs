// core/src/advisor.rs
// Setter sammen grunntrykk, kompensasjon og vindkurs for én tur.
// Kompensasjon og vind kan feile hver for seg; grunntrykket er alltid med.
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::compensation::{recommend_for_setup, CompensatedPressures};
use crate::config::Settings;
use crate::metrics::{
    compensation_unavailable_total, pressure_recommendations_total, wind_no_data_total, Metrics,
};
use crate::models::{Coordinates, RiderSetup, WindObservation};
use crate::pressure::{recommend_baseline, BaselinePressures};
use crate::weather::ConditionsProvider;
use crate::wind::{recommend_for, wind_components, HeadingCandidate, WindComponents};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompensationOutcome {
    Available(CompensatedPressures),
    Unavailable { reason: String },
}

impl CompensationOutcome {
    pub fn pressures(&self) -> Option<&CompensatedPressures> {
        match self {
            CompensationOutcome::Available(p) => Some(p),
            CompensationOutcome::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindOutcome {
    Available {
        observation: WindObservation,
        headings: Vec<HeadingCandidate>,
        /// Kun når kalleren oppga en fast kurs
        components: Option<WindComponents>,
    },
    NoData { reason: String },
}

#[derive(Clone)]
pub struct AdviceInputs<'a> {
    pub setup: &'a RiderSetup,
    pub settings: &'a Settings,
    /// Fryst tidspunkt for vær-oppslag (ikke "nå" fanget implisitt)
    pub at: DateTime<Utc>,
    pub coords: Option<Coordinates>,
    /// Værtilbyder (prod: OpenMeteoClient, test: StaticConditions)
    pub provider: Option<&'a dyn ConditionsProvider>,
    pub fixed_heading_deg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub baseline: BaselinePressures,
    pub compensation: CompensationOutcome,
    pub wind: WindOutcome,
}

fn compensation_for(inputs: &AdviceInputs<'_>) -> CompensationOutcome {
    if !inputs.settings.compensate {
        return CompensationOutcome::Unavailable { reason: "disabled".into() };
    }
    let (provider, coords) = match (inputs.provider, inputs.coords) {
        (Some(p), Some(c)) => (p, c),
        (None, _) => return CompensationOutcome::Unavailable { reason: "no_provider".into() },
        (_, None) => return CompensationOutcome::Unavailable { reason: "no_location".into() },
    };
    let conditions = match provider.ambient(inputs.at, coords) {
        Ok(c) => c,
        Err(e) => return CompensationOutcome::Unavailable { reason: e.to_string() },
    };
    match recommend_for_setup(
        inputs.setup,
        conditions,
        inputs.settings.ref_temp_c,
        inputs.settings.compensation_mode,
    ) {
        Some(p) => CompensationOutcome::Available(p),
        None => CompensationOutcome::Unavailable { reason: "non_finite_conditions".into() },
    }
}

fn wind_for(inputs: &AdviceInputs<'_>) -> WindOutcome {
    let (provider, coords) = match (inputs.provider, inputs.coords) {
        (Some(p), Some(c)) => (p, c),
        (None, _) => return WindOutcome::NoData { reason: "no_provider".into() },
        (_, None) => return WindOutcome::NoData { reason: "no_location".into() },
    };
    let observation = match provider.wind(inputs.at, coords) {
        Ok(o) => o,
        Err(e) => return WindOutcome::NoData { reason: e.to_string() },
    };
    let Some(headings) = recommend_for(&observation, &inputs.settings.headings) else {
        return WindOutcome::NoData { reason: "non_finite_wind".into() };
    };
    let components = inputs
        .fixed_heading_deg
        .and_then(|h| wind_components(h, observation.from_deg, observation.speed));

    WindOutcome::Available { observation, headings, components }
}

/// Full anbefaling. Feiler aldri: manglende data blir `Unavailable`/`NoData`.
pub fn advise(inputs: AdviceInputs<'_>, metrics: &Metrics) -> Advice {
    let baseline = recommend_baseline(inputs.setup);
    pressure_recommendations_total(metrics).inc();

    let compensation = compensation_for(&inputs);
    if let CompensationOutcome::Unavailable { reason } = &compensation {
        warn!("compensation unavailable ({reason}); showing baseline pressures");
        compensation_unavailable_total(metrics).inc();
    }

    let wind = wind_for(&inputs);
    if let WindOutcome::NoData { reason } = &wind {
        warn!("no wind recommendation ({reason})");
        wind_no_data_total(metrics).inc();
    }

    Advice { baseline, compensation, wind }
}
