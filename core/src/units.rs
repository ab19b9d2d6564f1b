// core/src/units.rs
// Enhetskonvertering, avrunding og vinkelhjelpere som deles av modellene.

pub const PSI_PER_BAR: f64 = 14.503_773_773_022; // 1 bar = 14.5038 psi
pub const PSI_PER_KPA: f64 = 0.145_037_737_7;    // 1 kPa (fast konstant)
pub const LBS_PER_KG: f64 = 2.204_622_621_8;
pub const KELVIN_OFFSET: f64 = 273.15;           // °C → K (additivt)

// --- RoundTo trait (offentlig, brukt av modellene ved output-grensen) ---
pub trait RoundTo {
    fn round_to(self, dp: u32) -> f64;
}

impl RoundTo for f64 {
    #[inline]
    fn round_to(self, dp: u32) -> f64 {
        if dp == 0 { return self.round(); }
        let factor = 10_f64.powi(dp as i32);
        (self * factor).round() / factor
    }
}

#[inline]
pub fn to_bar(psi: f64) -> f64 {
    psi / PSI_PER_BAR
}

#[inline]
pub fn bar_to_psi(bar: f64) -> f64 {
    bar * PSI_PER_BAR
}

#[inline]
pub fn kpa_to_psi(kpa: f64) -> f64 {
    kpa * PSI_PER_KPA
}

#[inline]
pub fn kg_to_lbs(kg: f64) -> f64 {
    kg * LBS_PER_KG
}

#[inline]
pub fn celsius_to_kelvin(c: f64) -> f64 {
    c + KELVIN_OFFSET
}

/// Normaliser vinkel til [0, 360)
pub fn norm_deg(d: f64) -> f64 {
    let mut x = d % 360.0;
    if x < 0.0 {
        x += 360.0;
    }
    // -1e-15 % 360 + 360 kan runde til nøyaktig 360.0
    if x >= 360.0 {
        x -= 360.0;
    }
    x
}

/// Signert vinkelforskjell `a - b`, foldet til [-180, 180].
/// Samme konvensjon brukes av scoring, diversitet og wind_components.
pub fn angle_diff(a_deg: f64, b_deg: f64) -> f64 {
    let mut delta = norm_deg(a_deg) - norm_deg(b_deg);
    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_round_trip() {
        for psi in [15.0, 42.5, 61.714, 100.0, 130.0] {
            assert!((to_bar(psi) * PSI_PER_BAR - psi).abs() < 1e-9);
            assert!((bar_to_psi(to_bar(psi)) - psi).abs() < 1e-9);
        }
    }

    #[test]
    fn norm_deg_wraps_negative_and_large() {
        assert_eq!(norm_deg(-90.0), 270.0);
        assert_eq!(norm_deg(720.0), 0.0);
        assert_eq!(norm_deg(365.0), 5.0);
        assert!(norm_deg(-1e-15) < 360.0);
    }

    #[test]
    fn angle_diff_folds_across_north() {
        assert!((angle_diff(10.0, 350.0) - 20.0).abs() < 1e-12);
        assert!((angle_diff(350.0, 10.0) + 20.0).abs() < 1e-12);
        assert!((angle_diff(90.0, 270.0).abs() - 180.0).abs() < 1e-12);
    }

    #[test]
    fn round_to_decimals() {
        assert_eq!(56.2149_f64.round_to(1), 56.2);
        assert_eq!(13.787_f64.round_to(2), 13.79);
        assert_eq!(61.7_f64.round_to(0), 62.0);
    }
}
