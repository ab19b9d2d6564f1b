use serde::{Deserialize, Serialize};

use crate::pressure::{wheel_loads, RideSpeed, Surface, TireType, WheelSize, DEFAULT_FRONT_LOAD_FRACTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    #[serde(alias = "lb")]
    Lbs,
}

fn default_front_fraction() -> f64 {
    DEFAULT_FRONT_LOAD_FRACTION
}

/// Rytter- og sykkeloppsett slik det kommer fra skjemaet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderSetup {
    #[serde(alias = "riderWeight")]
    pub rider_weight: f64,
    #[serde(alias = "bikeWeight")]
    pub bike_weight: f64,
    #[serde(default, alias = "unit")]
    pub weight_unit: WeightUnit,
    /// Andel av systemvekten på forhjulet (0.3–0.7)
    #[serde(default = "default_front_fraction", alias = "frontLoadFraction")]
    pub front_load_fraction: f64,
    #[serde(alias = "tireWidthMm", alias = "width_mm")]
    pub tire_width_mm: f64,
    #[serde(default, alias = "rearTireWidthMm")]
    pub rear_tire_width_mm: Option<f64>,
    pub surface: Surface,
    pub speed: RideSpeed,
    #[serde(alias = "tireType")]
    pub tire_type: TireType,
    #[serde(default, alias = "wheelSize")]
    pub wheel_size: WheelSize,
}

impl Default for RiderSetup {
    fn default() -> Self {
        Self {
            rider_weight: 75.0,
            bike_weight: 9.0,
            weight_unit: WeightUnit::Kg,
            front_load_fraction: DEFAULT_FRONT_LOAD_FRACTION,
            tire_width_mm: 28.0,
            rear_tire_width_mm: None,
            surface: Surface::WornPavement,
            speed: RideSpeed::ModerateGroupRide,
            tire_type: TireType::HighPerformance,
            wheel_size: WheelSize::Road700c,
        }
    }
}

impl RiderSetup {
    /// Sjekk før `recommend_baseline`, som ellers avbryter på ugyldig last.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.rider_weight >= 0.0 && self.bike_weight >= 0.0) {
            return Err(format!(
                "weights must be non-negative (rider={}, bike={})",
                self.rider_weight, self.bike_weight
            ));
        }
        if !self.front_load_fraction.is_finite() {
            return Err(format!("front load fraction must be finite (got {})", self.front_load_fraction));
        }
        let rear_width = self.rear_tire_width_mm.unwrap_or(self.tire_width_mm);
        if !(self.tire_width_mm.is_finite() && rear_width.is_finite()) {
            return Err(format!(
                "tire widths must be finite (front={}, rear={})",
                self.tire_width_mm, rear_width
            ));
        }
        let (front, rear) = wheel_loads(self);
        if !(front.is_finite() && rear.is_finite()) {
            return Err(format!(
                "system weight is too large (rider={}, bike={})",
                self.rider_weight, self.bike_weight
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lon: f64,
}

/// Temperatur og høyde fra vær-/høydetilbyderen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientConditions {
    pub temperature_c: f64,
    pub elevation_m: f64,
}

/// Øyeblikksbilde av vind. `from_deg` er meteorologisk (hvorfra vinden kommer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindObservation {
    #[serde(alias = "wind_dir_deg", alias = "direction")]
    pub from_deg: f64,
    #[serde(alias = "wind_speed", alias = "speed_ms")]
    pub speed: f64,
    #[serde(default, alias = "gusts")]
    pub gust: Option<f64>,
}

impl WindObservation {
    pub fn is_usable(&self) -> bool {
        self.from_deg.is_finite() && self.speed.is_finite()
    }
}
