// core/src/pressure.rs
// Grunntrykk per hjul ut fra last, dekkbredde og kategorier.
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ParseLabelError;
use crate::models::RiderSetup;
use crate::units::{kg_to_lbs, to_bar, RoundTo};

pub const PRESSURE_SCALE_K: f64 = 20.0; // psi per (lbs/mm)
pub const MIN_WIDTH_MM: f64 = 20.0;
pub const MAX_WIDTH_MM: f64 = 90.0;
pub const MIN_PSI: f64 = 15.0;
pub const MAX_PSI: f64 = 130.0;

pub const DEFAULT_FRONT_LOAD_FRACTION: f64 = 0.48;
const FRONT_FRACTION_RANGE: (f64, f64) = (0.3, 0.7);

/// Finn variant ut fra visningsetikett eller serde-nøkkel (case-insensitivt).
fn parse_labelled<T: Copy>(
    s: &str,
    kind: &'static str,
    all: &[T],
    label: fn(T) -> &'static str,
    key: fn(T) -> &'static str,
) -> Result<T, ParseLabelError> {
    let wanted = s.trim();
    all.iter()
        .copied()
        .find(|v| label(*v).eq_ignore_ascii_case(wanted) || key(*v).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ParseLabelError { kind, label: s.to_string() })
}

// ──────────────────────────────────────────────────────────────────────────────
// Overflate
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[serde(alias = "New Pavement")]
    NewPavement,
    #[serde(alias = "Worn Pavement / Some Cracks")]
    WornPavement,
    #[serde(alias = "Poor Pavement / Chipseal")]
    PoorPavement,
    #[serde(alias = "Category 1 Gravel")]
    GravelCat1,
    #[serde(alias = "Category 2 Gravel")]
    GravelCat2,
    #[serde(alias = "Category 3 Gravel")]
    GravelCat3,
    #[serde(alias = "Category 4 Gravel")]
    GravelCat4,
}

impl Surface {
    pub const ALL: [Surface; 7] = [
        Surface::NewPavement,
        Surface::WornPavement,
        Surface::PoorPavement,
        Surface::GravelCat1,
        Surface::GravelCat2,
        Surface::GravelCat3,
        Surface::GravelCat4,
    ];

    /// Brøkvis justering, brukes som `psi *= 1 + offset`.
    /// Glattere underlag → høyere trykk, grovere → lavere.
    pub fn offset(self) -> f64 {
        match self {
            Surface::NewPavement => 0.05,
            Surface::WornPavement => 0.0,
            Surface::PoorPavement => -0.05,
            Surface::GravelCat1 => -0.10,
            Surface::GravelCat2 => -0.15,
            Surface::GravelCat3 => -0.20,
            Surface::GravelCat4 => -0.25,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Surface::NewPavement => "New Pavement",
            Surface::WornPavement => "Worn Pavement / Some Cracks",
            Surface::PoorPavement => "Poor Pavement / Chipseal",
            Surface::GravelCat1 => "Category 1 Gravel",
            Surface::GravelCat2 => "Category 2 Gravel",
            Surface::GravelCat3 => "Category 3 Gravel",
            Surface::GravelCat4 => "Category 4 Gravel",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Surface::NewPavement => "new_pavement",
            Surface::WornPavement => "worn_pavement",
            Surface::PoorPavement => "poor_pavement",
            Surface::GravelCat1 => "gravel_cat1",
            Surface::GravelCat2 => "gravel_cat2",
            Surface::GravelCat3 => "gravel_cat3",
            Surface::GravelCat4 => "gravel_cat4",
        }
    }
}

impl FromStr for Surface {
    type Err = ParseLabelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_labelled(s, "surface", &Surface::ALL, Surface::label, Surface::key)
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Fart / intensitet
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideSpeed {
    #[serde(alias = "Casual Ride")]
    Casual,
    #[serde(alias = "Moderate Group Ride")]
    ModerateGroupRide,
    #[serde(alias = "Fast Group Ride")]
    FastGroupRide,
    #[serde(alias = "Racing")]
    Racing,
}

impl RideSpeed {
    pub const ALL: [RideSpeed; 4] = [
        RideSpeed::Casual,
        RideSpeed::ModerateGroupRide,
        RideSpeed::FastGroupRide,
        RideSpeed::Racing,
    ];

    /// Høyere intensitet → høyere trykk (`psi *= 1 + offset`).
    pub fn offset(self) -> f64 {
        match self {
            RideSpeed::Casual => -0.05,
            RideSpeed::ModerateGroupRide => 0.0,
            RideSpeed::FastGroupRide => 0.03,
            RideSpeed::Racing => 0.05,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RideSpeed::Casual => "Casual Ride",
            RideSpeed::ModerateGroupRide => "Moderate Group Ride",
            RideSpeed::FastGroupRide => "Fast Group Ride",
            RideSpeed::Racing => "Racing",
        }
    }

    fn key(self) -> &'static str {
        match self {
            RideSpeed::Casual => "casual",
            RideSpeed::ModerateGroupRide => "moderate_group_ride",
            RideSpeed::FastGroupRide => "fast_group_ride",
            RideSpeed::Racing => "racing",
        }
    }
}

impl FromStr for RideSpeed {
    type Err = ParseLabelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_labelled(s, "speed", &RideSpeed::ALL, RideSpeed::label, RideSpeed::key)
    }
}

impl fmt::Display for RideSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Dekkonstruksjon
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TireType {
    #[serde(alias = "High performance (supple casing)")]
    HighPerformance,
    #[serde(alias = "Standard")]
    Standard,
    #[serde(alias = "Puncture resistant / reinforced")]
    PunctureResistant,
}

impl TireType {
    pub const ALL: [TireType; 3] = [
        TireType::HighPerformance,
        TireType::Standard,
        TireType::PunctureResistant,
    ];

    /// Additivt tillegg i psi. Stivere/punkteringssikre dekk trenger mer.
    pub fn offset_psi(self) -> f64 {
        match self {
            TireType::HighPerformance => 0.0,
            TireType::Standard => 2.0,
            TireType::PunctureResistant => 4.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TireType::HighPerformance => "High performance (supple casing)",
            TireType::Standard => "Standard",
            TireType::PunctureResistant => "Puncture resistant / reinforced",
        }
    }

    fn key(self) -> &'static str {
        match self {
            TireType::HighPerformance => "high_performance",
            TireType::Standard => "standard",
            TireType::PunctureResistant => "puncture_resistant",
        }
    }
}

impl FromStr for TireType {
    type Err = ParseLabelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_labelled(s, "tire type", &TireType::ALL, TireType::label, TireType::key)
    }
}

impl fmt::Display for TireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Hjulstørrelse (reservert – inngår ikke i formelen ennå)
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelSize {
    #[default]
    #[serde(alias = "700c")]
    Road700c,
    #[serde(alias = "650b")]
    Gravel650b,
    #[serde(alias = "26\"", alias = "26in")]
    Mtb26,
    #[serde(alias = "27.5\"", alias = "27.5in")]
    Mtb275,
    #[serde(alias = "29\"", alias = "29in")]
    Mtb29,
}

impl WheelSize {
    pub const ALL: [WheelSize; 5] = [
        WheelSize::Road700c,
        WheelSize::Gravel650b,
        WheelSize::Mtb26,
        WheelSize::Mtb275,
        WheelSize::Mtb29,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WheelSize::Road700c => "700c",
            WheelSize::Gravel650b => "650b",
            WheelSize::Mtb26 => "26in",
            WheelSize::Mtb275 => "27.5in",
            WheelSize::Mtb29 => "29in",
        }
    }

    fn key(self) -> &'static str {
        match self {
            WheelSize::Road700c => "road700c",
            WheelSize::Gravel650b => "gravel650b",
            WheelSize::Mtb26 => "mtb26",
            WheelSize::Mtb275 => "mtb275",
            WheelSize::Mtb29 => "mtb29",
        }
    }
}

impl FromStr for WheelSize {
    type Err = ParseLabelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_labelled(s, "wheel size", &WheelSize::ALL, WheelSize::label, WheelSize::key)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Modell
// ──────────────────────────────────────────────────────────────────────────────

/// Anbefalt trykk (psi) for ett hjul.
///
/// Rekkefølgen er fast: bredde-clamp → `K * last / bredde` → overflate →
/// fart → dekktype (additivt) → clamp til [15, 130]. Bytter man rekkefølge
/// endres tallene.
///
/// Panikk ved ikke-finitt eller negativ last og ikke-finitt bredde:
/// det er en feil hos kalleren, ikke manglende data.
pub fn compute_pressure(
    load_lbs: f64,
    tire_width_mm: f64,
    surface: Surface,
    speed: RideSpeed,
    tire_type: TireType,
) -> f64 {
    assert!(
        load_lbs.is_finite() && load_lbs >= 0.0,
        "wheel load must be a finite, non-negative number of pounds (got {load_lbs})"
    );
    assert!(
        tire_width_mm.is_finite(),
        "tire width must be finite (got {tire_width_mm})"
    );

    let width = tire_width_mm.clamp(MIN_WIDTH_MM, MAX_WIDTH_MM);
    let mut psi = PRESSURE_SCALE_K * (load_lbs / width);
    psi *= 1.0 + surface.offset();
    psi *= 1.0 + speed.offset();
    psi += tire_type.offset_psi();
    psi.clamp(MIN_PSI, MAX_PSI)
}

/// Per-hjul input. `wheel_size` er med for API-stabilitet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelLoad {
    pub load_lbs: f64,
    pub tire_width_mm: f64,
    pub surface: Surface,
    pub speed: RideSpeed,
    pub tire_type: TireType,
    #[serde(default)]
    pub wheel_size: WheelSize,
}

impl WheelLoad {
    pub fn pressure_psi(&self) -> f64 {
        compute_pressure(self.load_lbs, self.tire_width_mm, self.surface, self.speed, self.tire_type)
    }
}

/// Fordel systemvekt (rytter + sykkel) på for- og bakhjul, i pund.
pub fn wheel_loads(setup: &RiderSetup) -> (f64, f64) {
    let system = setup.rider_weight + setup.bike_weight;
    let system_lbs = match setup.weight_unit {
        crate::models::WeightUnit::Kg => kg_to_lbs(system),
        crate::models::WeightUnit::Lbs => system,
    };
    let fraction = setup
        .front_load_fraction
        .clamp(FRONT_FRACTION_RANGE.0, FRONT_FRACTION_RANGE.1);
    let front = system_lbs * fraction;
    (front, system_lbs - front)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselinePressures {
    pub front_psi: f64,
    pub rear_psi: f64,
    pub front_bar: f64,
    pub rear_bar: f64,
    pub front_load_lbs: f64,
    pub rear_load_lbs: f64,
}

fn wheels(setup: &RiderSetup) -> (WheelLoad, WheelLoad) {
    let (front_load, rear_load) = wheel_loads(setup);
    let front = WheelLoad {
        load_lbs: front_load,
        tire_width_mm: setup.tire_width_mm,
        surface: setup.surface,
        speed: setup.speed,
        tire_type: setup.tire_type,
        wheel_size: setup.wheel_size,
    };
    let rear = WheelLoad {
        load_lbs: rear_load,
        tire_width_mm: setup.rear_tire_width_mm.unwrap_or(setup.tire_width_mm),
        ..front
    };
    (front, rear)
}

/// Urundet (front, bak) psi. Grunnlaget kompensasjonen regner videre på.
pub fn baseline_psi(setup: &RiderSetup) -> (f64, f64) {
    let (front, rear) = wheels(setup);
    (front.pressure_psi(), rear.pressure_psi())
}

/// Grunntrykk for begge hjul. Avrunding skjer kun her, ved output-grensen.
pub fn recommend_baseline(setup: &RiderSetup) -> BaselinePressures {
    let (front, rear) = wheels(setup);
    let front_psi = front.pressure_psi();
    let rear_psi = rear.pressure_psi();

    debug!(
        "baseline: loads={:.1}/{:.1} lbs width={:.0}/{:.0} mm → {:.2}/{:.2} psi",
        front.load_lbs, rear.load_lbs, front.tire_width_mm, rear.tire_width_mm, front_psi, rear_psi
    );

    BaselinePressures {
        front_psi: front_psi.round_to(1),
        rear_psi: rear_psi.round_to(1),
        front_bar: to_bar(front_psi).round_to(2),
        rear_bar: to_bar(rear_psi).round_to(2),
        front_load_lbs: front.load_lbs.round_to(1),
        rear_load_lbs: rear.load_lbs.round_to(1),
    }
}
