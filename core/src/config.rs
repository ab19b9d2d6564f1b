// core/src/config.rs
use std::path::Path;

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::compensation::{CompensationMode, DEFAULT_REF_TEMP_C};
use crate::wind::HeadingOptions;

/// Justerbare standarder. Alle felt har default, så en delvis fil er gyldig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Temperaturen dekktrykket ble satt ved (°C)
    pub ref_temp_c: f64,
    pub compensation_mode: CompensationMode,
    /// Slå av for å bare vise grunntrykket
    pub compensate: bool,
    pub headings: HeadingOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ref_temp_c: DEFAULT_REF_TEMP_C,
            compensation_mode: CompensationMode::GaugeConstant,
            compensate: true,
            headings: HeadingOptions::default(),
        }
    }
}

/// Leser inn innstillinger fra disk (JSON).
/// Hvis filen ikke finnes, returneres default.
pub fn load_settings(path: impl AsRef<Path>) -> anyhow::Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("settings file {} not found, using defaults", path.display());
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&contents)
        .with_context(|| format!("parsing settings in {}", path.display()))?;
    settings
        .headings
        .validate()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("invalid heading options in {}", path.display()))?;
    info!(
        "settings loaded from {} (ref_temp={} °C, mode={:?})",
        path.display(),
        settings.ref_temp_c,
        settings.compensation_mode
    );
    Ok(settings)
}

/// Lagrer innstillinger til disk som JSON (pretty-print).
pub fn save_settings(settings: &Settings, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json).with_context(|| format!("writing settings to {}", path.display()))?;
    info!("settings saved to {}", path.display());
    Ok(())
}
