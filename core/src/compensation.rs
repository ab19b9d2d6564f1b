// core/src/compensation.rs
// Temperatur- og høydekompensasjon av et referansetrykk (gauge).
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::models::{AmbientConditions, RiderSetup};
use crate::pressure::baseline_psi;
use crate::units::{celsius_to_kelvin, kpa_to_psi, to_bar, RoundTo};

pub const SEA_LEVEL_KPA: f64 = 101.325;
pub const DEFAULT_REF_TEMP_C: f64 = 20.0;

// Forenklet ISA, gyldig til ca. 11 km
const ISA_LAPSE_FACTOR: f64 = 2.255_77e-5;
const ISA_EXPONENT: f64 = 5.255_88;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationMode {
    /// Skaler absolutt trykk med T_nå / T_ref og trekk fra omgivelsestrykket.
    #[default]
    GaugeConstant,
    /// Hold absolutt trykk fast på referanseverdien.
    AbsoluteConstant,
}

impl CompensationMode {
    pub fn from_flag(keep_absolute_constant: bool) -> Self {
        if keep_absolute_constant {
            CompensationMode::AbsoluteConstant
        } else {
            CompensationMode::GaugeConstant
        }
    }

    pub fn keeps_absolute_constant(self) -> bool {
        matches!(self, CompensationMode::AbsoluteConstant)
    }
}

/// Omgivelsestrykk (kPa) for en høyde i meter. Nøyaktig 101.325 ved h = 0.
pub fn elevation_to_ambient_pressure(elevation_m: f64) -> f64 {
    SEA_LEVEL_KPA * (1.0 - ISA_LAPSE_FACTOR * elevation_m).powf(ISA_EXPONENT)
}

/// Omgivelsestrykk i psi for en høyde i meter.
pub fn elevation_to_ambient_psi(elevation_m: f64) -> f64 {
    kpa_to_psi(elevation_to_ambient_pressure(elevation_m))
}

/// Kompensert gauge-trykk nå, gitt gauge-trykk satt ved `ref_temp_c`.
/// Ingen avrunding og ingen clamp her.
pub fn compensate(
    gauge_ref_psi: f64,
    ref_temp_c: f64,
    ambient_temp_c: f64,
    ambient_psi: f64,
    keep_absolute_constant: bool,
) -> f64 {
    CompensationInput {
        gauge_ref_psi,
        ref_temp_c,
        ambient_temp_c,
        ambient_psi,
        reference_ambient_psi: None,
        mode: CompensationMode::from_flag(keep_absolute_constant),
    }
    .gauge_now()
}

/// Full input for én kompensasjon. Bygges per kall, caches aldri.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompensationInput {
    pub gauge_ref_psi: f64,
    #[serde(default = "default_ref_temp")]
    pub ref_temp_c: f64,
    pub ambient_temp_c: f64,
    pub ambient_psi: f64,
    /// Omgivelsestrykket der dekket ble pumpet, hvis det var et annet sted
    /// enn der det skal sykles. `None` = samme som `ambient_psi`.
    #[serde(default)]
    pub reference_ambient_psi: Option<f64>,
    #[serde(default)]
    pub mode: CompensationMode,
}

fn default_ref_temp() -> f64 {
    DEFAULT_REF_TEMP_C
}

impl CompensationInput {
    pub fn gauge_now(&self) -> f64 {
        let t_ref = celsius_to_kelvin(self.ref_temp_c);
        let t_now = celsius_to_kelvin(self.ambient_temp_c);
        let abs_ref = self.gauge_ref_psi + self.reference_ambient_psi.unwrap_or(self.ambient_psi);

        let abs_now = match self.mode {
            CompensationMode::GaugeConstant => abs_ref * (t_now / t_ref),
            CompensationMode::AbsoluteConstant => abs_ref,
        };
        abs_now - self.ambient_psi
    }

    /// Som `gauge_now`, men `None` hvis input eller resultat ikke er brukbart.
    pub fn try_gauge_now(&self) -> Option<f64> {
        let inputs_ok = [self.gauge_ref_psi, self.ref_temp_c, self.ambient_temp_c, self.ambient_psi]
            .iter()
            .all(|x| x.is_finite())
            && self.reference_ambient_psi.map_or(true, f64::is_finite)
            && celsius_to_kelvin(self.ref_temp_c) > 0.0
            && celsius_to_kelvin(self.ambient_temp_c) > 0.0;
        if !inputs_ok {
            return None;
        }
        Some(self.gauge_now()).filter(|g| g.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompensatedPressures {
    pub front_psi: f64,
    pub rear_psi: f64,
    pub front_bar: f64,
    pub rear_bar: f64,
    pub ambient_pressure_kpa: f64,
    pub ambient_pressure_psi: f64,
    pub ambient_temp_c: f64,
    pub ref_temp_c: f64,
    pub elevation_m: f64,
    pub mode: CompensationMode,
}

/// Kompenser for- og bakhjul for temperatur og høyde.
///
/// `None` betyr "kompensasjon utilgjengelig": NaN skal aldri ut herfra.
/// Avrunding: psi 1 desimal, omgivelsestrykk 2 desimaler.
pub fn recommend(
    front_ref_psi: f64,
    rear_ref_psi: f64,
    ref_temp_c: f64,
    ambient_temp_c: f64,
    elevation_m: f64,
    keep_absolute_constant: bool,
) -> Option<CompensatedPressures> {
    let mode = CompensationMode::from_flag(keep_absolute_constant);
    if !elevation_m.is_finite() {
        warn!("compensation unavailable: elevation is not finite ({elevation_m})");
        return None;
    }

    let ambient_kpa = elevation_to_ambient_pressure(elevation_m);
    let ambient_psi = kpa_to_psi(ambient_kpa);
    if !ambient_psi.is_finite() || ambient_psi <= 0.0 {
        warn!("compensation unavailable: elevation {elevation_m} m is outside the atmosphere model");
        return None;
    }

    let input = |gauge_ref_psi| CompensationInput {
        gauge_ref_psi,
        ref_temp_c,
        ambient_temp_c,
        ambient_psi,
        reference_ambient_psi: None,
        mode,
    };

    let (front, rear) = match (input(front_ref_psi).try_gauge_now(), input(rear_ref_psi).try_gauge_now()) {
        (Some(f), Some(r)) => (f, r),
        _ => {
            warn!(
                "compensation unavailable: refs={front_ref_psi}/{rear_ref_psi} psi, \
                 ref_temp={ref_temp_c} °C, ambient_temp={ambient_temp_c} °C"
            );
            return None;
        }
    };

    debug!(
        "compensation ({:?}): {:.2}/{:.2} → {:.2}/{:.2} psi @ {:.1} °C, {:.0} m ({:.3} psi ambient)",
        mode, front_ref_psi, rear_ref_psi, front, rear, ambient_temp_c, elevation_m, ambient_psi
    );

    Some(CompensatedPressures {
        front_psi: front.round_to(1),
        rear_psi: rear.round_to(1),
        front_bar: to_bar(front).round_to(2),
        rear_bar: to_bar(rear).round_to(2),
        ambient_pressure_kpa: ambient_kpa.round_to(2),
        ambient_pressure_psi: ambient_psi.round_to(2),
        ambient_temp_c,
        ref_temp_c,
        elevation_m,
        mode,
    })
}

/// Kompenser grunntrykket for et oppsett. Går via urundede psi-verdier,
/// så avrunding skjer én gang, i `recommend`.
pub fn recommend_for_setup(
    setup: &RiderSetup,
    conditions: AmbientConditions,
    ref_temp_c: f64,
    mode: CompensationMode,
) -> Option<CompensatedPressures> {
    let (front_psi, rear_psi) = baseline_psi(setup);
    recommend(
        front_psi,
        rear_psi,
        ref_temp_c,
        conditions.temperature_c,
        conditions.elevation_m,
        mode.keeps_absolute_constant(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_is_exact() {
        assert_eq!(elevation_to_ambient_pressure(0.0), 101.325);
    }

    #[test]
    fn absolute_constant_with_same_ambient_keeps_gauge() {
        let g = compensate(60.0, 20.0, -10.0, 14.0, true);
        assert!((g - 60.0).abs() < 1e-12);
    }

    #[test]
    fn reference_ambient_shifts_gauge_at_altitude() {
        // Pumpet ved havnivå, syklet på 2000 moh: gauge øker i absolutt-modus
        let input = CompensationInput {
            gauge_ref_psi: 60.0,
            ref_temp_c: 20.0,
            ambient_temp_c: 20.0,
            ambient_psi: elevation_to_ambient_psi(2000.0),
            reference_ambient_psi: Some(elevation_to_ambient_psi(0.0)),
            mode: CompensationMode::AbsoluteConstant,
        };
        let g = input.gauge_now();
        let expected = 60.0 + elevation_to_ambient_psi(0.0) - elevation_to_ambient_psi(2000.0);
        assert!((g - expected).abs() < 1e-9);
        assert!(g > 62.0);
    }

    #[test]
    fn absolute_zero_reference_is_unavailable() {
        let input = CompensationInput {
            gauge_ref_psi: 60.0,
            ref_temp_c: -273.15,
            ambient_temp_c: 10.0,
            ambient_psi: 14.0,
            reference_ambient_psi: None,
            mode: CompensationMode::GaugeConstant,
        };
        assert_eq!(input.try_gauge_now(), None);
    }
}
