// core/src/weather_api.rs
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, info};
use serde::Deserialize;
use ureq::Agent;

use crate::error::LookupError;
use crate::models::{AmbientConditions, Coordinates, WindObservation};
use crate::weather::{hour_key, CacheKey, ConditionsProvider};

const BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";
const HOURLY_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Deserialize)]
struct ForecastResp {
    #[serde(default)]
    elevation: Option<f64>,
    hourly: Hourly,
}

#[derive(Debug, Clone, Deserialize)]
struct Hourly {
    time: Vec<String>,
    #[serde(default, alias = "temperature")]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default, alias = "windspeed_10m")]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default, alias = "winddirection_10m")]
    wind_direction_10m: Vec<Option<f64>>,
    #[serde(default, alias = "windgusts_10m")]
    wind_gusts_10m: Vec<Option<f64>>,
}

/// Én timesverdi, valgt nærmest ønsket tidspunkt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlySample {
    pub time: DateTime<Utc>,
    pub temperature_c: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub wind_from_deg: Option<f64>,
    pub wind_gust_ms: Option<f64>,
    pub elevation_m: Option<f64>,
}

/// Indeks for timesverdien nærmest `at`. Ugyldige tidsstempler hoppes over.
pub fn nearest_hourly_index(times: &[String], at: DateTime<Utc>) -> Option<usize> {
    times
        .iter()
        .enumerate()
        .filter_map(|(i, t)| {
            NaiveDateTime::parse_from_str(t, HOURLY_FORMAT)
                .ok()
                .map(|naive| (i, (naive.and_utc() - at).num_seconds().abs()))
        })
        .min_by_key(|(_, dist)| *dist)
        .map(|(i, _)| i)
}

/// Plukk ut timesverdien nærmest `at` fra en Open-Meteo JSON-respons.
pub fn parse_forecast(body: &str, at: DateTime<Utc>) -> Result<HourlySample, LookupError> {
    let resp: ForecastResp = serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;
    let h = &resp.hourly;
    let idx = nearest_hourly_index(&h.time, at).ok_or_else(|| LookupError::NoSample(at.to_rfc3339()))?;

    let pick = |xs: &[Option<f64>]| xs.get(idx).copied().flatten().filter(|x| x.is_finite());
    let time = NaiveDateTime::parse_from_str(&h.time[idx], HOURLY_FORMAT)
        .map_err(|e| LookupError::Decode(e.to_string()))?
        .and_utc();

    Ok(HourlySample {
        time,
        temperature_c: pick(&h.temperature_2m),
        wind_speed_ms: pick(&h.wind_speed_10m),
        wind_from_deg: pick(&h.wind_direction_10m),
        wind_gust_ms: pick(&h.wind_gusts_10m),
        elevation_m: resp.elevation.filter(|x| x.is_finite()),
    })
}

impl HourlySample {
    pub fn ambient(&self) -> Result<AmbientConditions, LookupError> {
        Ok(AmbientConditions {
            temperature_c: self.temperature_c.ok_or(LookupError::MissingValue("temperature"))?,
            elevation_m: self.elevation_m.ok_or(LookupError::MissingValue("elevation"))?,
        })
    }

    pub fn wind(&self) -> Result<WindObservation, LookupError> {
        Ok(WindObservation {
            from_deg: self.wind_from_deg.ok_or(LookupError::MissingValue("wind direction"))?,
            speed: self.wind_speed_ms.ok_or(LookupError::MissingValue("wind speed"))?,
            gust: self.wind_gust_ms,
        })
    }
}

/// Open-Meteo klient – enkel blocking-versjon (ureq).
/// Én respons gir både temperatur og vind, så timesverdien huskes per
/// (lat, lon, time) og `ambient` + `wind` deler ett HTTP-kall.
pub struct OpenMeteoClient {
    agent: Agent,
    base_url: String,
    samples: Mutex<HashMap<CacheKey, HourlySample>>,
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        // En enkel agent; ureq bruker rustls når "tls" er aktivert
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(10))
            .build();
        Self {
            agent,
            base_url: base_url.to_string(),
            samples: Mutex::new(HashMap::new()),
        }
    }

    fn samples(&self) -> MutexGuard<'_, HashMap<CacheKey, HourlySample>> {
        self.samples.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Husket timesverdi, ellers `fetch`. Feil huskes ikke.
    fn sample_with(
        &self,
        at: DateTime<Utc>,
        coords: Coordinates,
        fetch: impl FnOnce() -> Result<HourlySample, LookupError>,
    ) -> Result<HourlySample, LookupError> {
        let key = hour_key(at, coords);
        if let Some(s) = self.samples().get(&key) {
            debug!("[OpenMeteo] reusing sample for {}", s.time);
            return Ok(*s);
        }
        let sample = fetch()?;
        self.samples().insert(key, sample);
        Ok(sample)
    }

    fn url(&self, at: DateTime<Utc>, coords: Coordinates) -> String {
        let day = at.format("%Y-%m-%d");
        format!(
            "{}?latitude={:.4}&longitude={:.4}&hourly=temperature_2m,wind_speed_10m,wind_direction_10m,wind_gusts_10m&wind_speed_unit=ms&timezone=UTC&start_date={day}&end_date={day}",
            self.base_url, coords.lat, coords.lon
        )
    }

    pub fn fetch_sample(&self, at: DateTime<Utc>, coords: Coordinates) -> Result<HourlySample, LookupError> {
        let body = self
            .agent
            .get(&self.url(at, coords))
            .call()
            .map_err(|e| LookupError::Http(e.to_string()))?
            .into_string()
            .map_err(|e| LookupError::Http(e.to_string()))?;
        let sample = parse_forecast(&body, at)?;

        info!(
            "[OpenMeteo] lat={:.3}, lon={:.3} @ {} => {:?}°C, {:?} m/s from {:?}°, elev {:?} m",
            coords.lat,
            coords.lon,
            sample.time,
            sample.temperature_c,
            sample.wind_speed_ms,
            sample.wind_from_deg,
            sample.elevation_m
        );
        Ok(sample)
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionsProvider for OpenMeteoClient {
    fn ambient(&self, at: DateTime<Utc>, coords: Coordinates) -> Result<AmbientConditions, LookupError> {
        self.sample_with(at, coords, || self.fetch_sample(at, coords))?.ambient()
    }

    fn wind(&self, at: DateTime<Utc>, coords: Coordinates) -> Result<WindObservation, LookupError> {
        self.sample_with(at, coords, || self.fetch_sample(at, coords))?.wind()
    }
}
