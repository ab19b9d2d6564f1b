// core/src/wind.rs
// Vindkomponenter og søk etter kurs med mest medvind / minst sidevind.
use std::fmt;

use log::{debug, warn};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::models::WindObservation;
use crate::units::{angle_diff, norm_deg};

pub const DEFAULT_CROSSWIND_PENALTY: f64 = 0.4;
pub const DEFAULT_STEP_DEG: f64 = 5.0;
/// Nedre grense for steg: maks 3600 gitterpunkter.
pub const MIN_STEP_DEG: f64 = 0.1;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_MIN_SEPARATION_DEG: f64 = 15.0;

/// Under denne farten regnes vinden som stille.
pub const CALM_SPEED: f64 = 0.1;

const COMPASS_16: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

/// Nærmeste av 16 kompassretninger: `round(deg / 22.5) mod 16`.
pub fn compass16(deg: f64) -> &'static str {
    let idx = (norm_deg(deg) / 22.5).round() as usize % 16;
    COMPASS_16[idx]
}

/// Retningen vinden blåser MOT (meteorologisk FRA + 180).
#[inline]
pub fn wind_toward_deg(wind_from_deg: f64) -> f64 {
    norm_deg(wind_from_deg + 180.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingScore {
    pub score: f64,
    /// Medvind langs kursen (negativ = motvind)
    pub tail: f64,
    /// Sidevind, alltid >= 0
    pub cross: f64,
    pub wind_toward_deg: f64,
}

/// Score for én kurs: `tail - penalty * cross`, høyere er bedre.
pub fn score_heading(
    wind_from_deg: f64,
    wind_speed: f64,
    heading_deg: f64,
    crosswind_penalty: f64,
) -> HeadingScore {
    let toward = wind_toward_deg(wind_from_deg);
    let delta = angle_diff(heading_deg, toward).to_radians();
    let tail = wind_speed * delta.cos();
    let cross = (wind_speed * delta.sin()).abs();
    HeadingScore {
        score: tail - crosswind_penalty * cross,
        tail,
        cross,
        wind_toward_deg: toward,
    }
}

/// Tillatt vinkelintervall, inklusive endepunkter. Kan gå over 0°
/// (f.eks. 300..30).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleInterval {
    pub start_deg: f64,
    pub end_deg: f64,
}

impl AngleInterval {
    pub fn new(start_deg: f64, end_deg: f64) -> Self {
        Self { start_deg, end_deg }
    }

    pub fn contains(&self, deg: f64) -> bool {
        let d = norm_deg(deg);
        let a = norm_deg(self.start_deg);
        let b = norm_deg(self.end_deg);
        if a <= b {
            d >= a && d <= b
        } else {
            d >= a || d <= b
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingOptions {
    pub step_deg: f64,
    pub top_k: usize,
    pub min_separation_deg: f64,
    pub crosswind_penalty: f64,
    /// Tom liste = hele sirkelen
    pub allowed: Vec<AngleInterval>,
}

impl Default for HeadingOptions {
    fn default() -> Self {
        Self {
            step_deg: DEFAULT_STEP_DEG,
            top_k: DEFAULT_TOP_K,
            min_separation_deg: DEFAULT_MIN_SEPARATION_DEG,
            crosswind_penalty: DEFAULT_CROSSWIND_PENALTY,
            allowed: Vec::new(),
        }
    }
}

impl HeadingOptions {
    /// Sjekk av kontrakten. `Err` har samme tekst som panikken i `recommend_headings`.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.step_deg.is_finite() && self.step_deg >= MIN_STEP_DEG) {
            return Err(format!(
                "heading step must be a finite number of degrees >= {MIN_STEP_DEG} (got {})",
                self.step_deg
            ));
        }
        if !self.crosswind_penalty.is_finite() {
            return Err(format!("crosswind penalty must be finite (got {})", self.crosswind_penalty));
        }
        if !(self.min_separation_deg.is_finite() && self.min_separation_deg >= 0.0) {
            return Err(format!(
                "minimum separation must be a finite, non-negative number of degrees (got {})",
                self.min_separation_deg
            ));
        }
        Ok(())
    }

    fn is_allowed(&self, heading_deg: f64) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|iv| iv.contains(heading_deg))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    pub heading_deg: f64,
    pub tail: f64,
    pub cross: f64,
    pub score: f64,
    pub compass: String,
}

/// Kandidatgitter over [0, 360) med fast steg, filtrert på tillatte intervaller.
fn lattice(opts: &HeadingOptions) -> Vec<f64> {
    if let Err(msg) = opts.validate() {
        panic!("{msg}");
    }
    // maks 3600 punkter
    let n = (360.0 / opts.step_deg).ceil() as usize;
    (0..n)
        .map(|i| i as f64 * opts.step_deg)
        .filter(|h| *h < 360.0)
        .filter(|h| opts.is_allowed(*h))
        .collect()
}

/// Rangerte kurser for observert vind.
///
/// `None` = ingen brukbare vinddata (ikke-finitt retning eller fart).
/// `Some(vec![])` er mulig når de tillatte intervallene ikke treffer gitteret.
pub fn recommend_headings(
    wind_from_deg: f64,
    wind_speed: f64,
    opts: &HeadingOptions,
) -> Option<Vec<HeadingCandidate>> {
    // Ugyldige valg er kontraktsbrudd også når vinddata mangler
    if let Err(msg) = opts.validate() {
        panic!("{msg}");
    }
    if !wind_from_deg.is_finite() || !wind_speed.is_finite() {
        warn!("no wind data: from={wind_from_deg}, speed={wind_speed}");
        return None;
    }

    let mut scored: Vec<(f64, HeadingScore)> = lattice(opts)
        .into_iter()
        .map(|h| (h, score_heading(wind_from_deg, wind_speed, h, opts.crosswind_penalty)))
        .collect();
    // stabil sortering: like scorer beholder stigende kurs
    scored.sort_by_key(|(_, s)| std::cmp::Reverse(OrderedFloat(s.score)));

    let mut picked: Vec<HeadingCandidate> = Vec::with_capacity(opts.top_k);
    for (heading, s) in scored {
        if picked.len() >= opts.top_k {
            break;
        }
        let too_close = picked
            .iter()
            .any(|p| angle_diff(p.heading_deg, heading).abs() < opts.min_separation_deg);
        if too_close {
            continue;
        }
        picked.push(HeadingCandidate {
            heading_deg: heading,
            tail: s.tail,
            cross: s.cross,
            score: s.score,
            compass: compass16(heading).to_string(),
        });
    }

    debug!(
        "headings for wind from {:.0}° @ {:.1}: {:?}",
        wind_from_deg,
        wind_speed,
        picked.iter().map(|c| c.heading_deg).collect::<Vec<_>>()
    );
    Some(picked)
}

/// Som `recommend_headings`, for en hel observasjon.
pub fn recommend_for(obs: &WindObservation, opts: &HeadingOptions) -> Option<Vec<HeadingCandidate>> {
    recommend_headings(obs.from_deg, obs.speed, opts)
}

// ──────────────────────────────────────────────────────────────────────────────
// Komponenter for fast kurs (visning)
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindSide {
    Left,
    Right,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindKind {
    Calm,
    Headwind,
    Tailwind,
    Crosswind,
}

impl fmt::Display for WindKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WindKind::Calm => "calm",
            WindKind::Headwind => "headwind",
            WindKind::Tailwind => "tailwind",
            WindKind::Crosswind => "crosswind",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindComponents {
    /// Positiv = motvind, negativ = medvind
    pub headwind: f64,
    pub crosswind: f64,
    pub side: WindSide,
    pub kind: WindKind,
}

/// Mot-/medvind og sidevind for en fast kurs.
/// Relativ vinkel = vind FRA minus kurs, foldet til [-180, 180].
pub fn wind_components(
    heading_deg: f64,
    wind_from_deg: f64,
    wind_speed: f64,
) -> Option<WindComponents> {
    if !heading_deg.is_finite() || !wind_from_deg.is_finite() || !wind_speed.is_finite() {
        return None;
    }

    let rel_deg = angle_diff(wind_from_deg, heading_deg);
    let rel = rel_deg.to_radians();
    // cos(0)=1 => full motvind; cos(180)=-1 => full medvind
    let headwind = wind_speed * rel.cos();
    let crosswind = (wind_speed * rel.sin()).abs();

    let side = if crosswind < 1e-9 {
        WindSide::None
    } else if rel_deg > 0.0 {
        WindSide::Right
    } else {
        WindSide::Left
    };

    let kind = if wind_speed.abs() < CALM_SPEED {
        WindKind::Calm
    } else if crosswind > headwind.abs() {
        WindKind::Crosswind
    } else if headwind > 0.0 {
        WindKind::Headwind
    } else {
        WindKind::Tailwind
    };

    Some(WindComponents { headwind, crosswind, side, kind })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_rounds_to_nearest() {
        assert_eq!(compass16(0.0), "N");
        assert_eq!(compass16(11.0), "N");
        assert_eq!(compass16(12.0), "NNE");
        assert_eq!(compass16(90.0), "E");
        assert_eq!(compass16(340.0), "NNW");
        assert_eq!(compass16(355.0), "N");
        assert_eq!(compass16(-90.0), "W");
    }

    #[test]
    fn interval_wraps_over_north() {
        let iv = AngleInterval::new(300.0, 30.0);
        assert!(iv.contains(0.0));
        assert!(iv.contains(310.0));
        assert!(iv.contains(30.0));
        assert!(!iv.contains(180.0));
        assert!(!iv.contains(31.0));
    }

    #[test]
    fn lattice_has_72_points_by_default() {
        let pts = lattice(&HeadingOptions::default());
        assert_eq!(pts.len(), 72);
        assert_eq!(pts[0], 0.0);
        assert_eq!(*pts.last().unwrap(), 355.0);
    }

    #[test]
    fn lattice_with_uneven_step_stays_below_360() {
        let opts = HeadingOptions { step_deg: 7.0, ..Default::default() };
        let pts = lattice(&opts);
        assert!(pts.iter().all(|h| *h < 360.0));
        assert_eq!(pts.len(), 52); // 0, 7, ..., 357
    }

    #[test]
    #[should_panic(expected = "heading step")]
    fn zero_step_is_a_contract_violation() {
        let opts = HeadingOptions { step_deg: 0.0, ..Default::default() };
        let _ = lattice(&opts);
    }

    #[test]
    #[should_panic(expected = "heading step")]
    fn tiny_step_is_a_contract_violation() {
        let opts = HeadingOptions { step_deg: 1e-300, ..Default::default() };
        let _ = lattice(&opts);
    }

    #[test]
    fn finest_step_gives_3600_points() {
        let opts = HeadingOptions { step_deg: MIN_STEP_DEG, ..Default::default() };
        let pts = lattice(&opts);
        assert!(pts.len() <= 3600, "for mange punkter: {}", pts.len());
        assert!(pts.len() >= 3599);
    }

    #[test]
    #[should_panic(expected = "crosswind penalty")]
    fn nan_penalty_is_a_contract_violation() {
        let opts = HeadingOptions { crosswind_penalty: f64::NAN, ..Default::default() };
        let _ = recommend_headings(270.0, 12.0, &opts);
    }

    #[test]
    #[should_panic(expected = "minimum separation")]
    fn nan_separation_is_a_contract_violation() {
        let opts = HeadingOptions { min_separation_deg: f64::NAN, ..Default::default() };
        let _ = recommend_headings(270.0, 12.0, &opts);
    }

    #[test]
    #[should_panic(expected = "minimum separation")]
    fn negative_separation_is_a_contract_violation() {
        let opts = HeadingOptions { min_separation_deg: -1.0, ..Default::default() };
        let _ = recommend_headings(270.0, 12.0, &opts);
    }

    #[test]
    fn validate_accepts_defaults() {
        assert_eq!(HeadingOptions::default().validate(), Ok(()));
    }
}
