// core/src/weather.rs
// Sømmen mot vær-/høydetilbyder. Kjernen kaller aldri nettverk selv;
// kalleren injiserer en `ConditionsProvider`.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Timelike, Utc};
use ordered_float::OrderedFloat;

use crate::error::LookupError;
use crate::metrics::{conditions_cache_hit_total, conditions_cache_miss_total, Metrics};
use crate::models::{AmbientConditions, Coordinates, WindObservation};

/// Best-effort og feilbar. `at` er et eksplisitt, fryst tidspunkt.
pub trait ConditionsProvider {
    fn ambient(&self, at: DateTime<Utc>, coords: Coordinates) -> Result<AmbientConditions, LookupError>;
    fn wind(&self, at: DateTime<Utc>, coords: Coordinates) -> Result<WindObservation, LookupError>;
}

/// Faste verdier (test/offline). `None` gir `LookupError::MissingValue`.
#[derive(Debug, Clone, Default)]
pub struct StaticConditions {
    pub ambient: Option<AmbientConditions>,
    pub wind: Option<WindObservation>,
}

impl StaticConditions {
    pub fn new(ambient: Option<AmbientConditions>, wind: Option<WindObservation>) -> Self {
        Self { ambient, wind }
    }
}

impl ConditionsProvider for StaticConditions {
    fn ambient(&self, _at: DateTime<Utc>, _coords: Coordinates) -> Result<AmbientConditions, LookupError> {
        self.ambient.ok_or(LookupError::MissingValue("temperature/elevation"))
    }

    fn wind(&self, _at: DateTime<Utc>, _coords: Coordinates) -> Result<WindObservation, LookupError> {
        self.wind.ok_or(LookupError::MissingValue("wind"))
    }
}

pub(crate) type CacheKey = (OrderedFloat<f64>, OrderedFloat<f64>, i64);

/// Nøkkel (lat, lon, hel time). Tilbyderne leverer timesverdier.
pub(crate) fn hour_key(at: DateTime<Utc>, coords: Coordinates) -> CacheKey {
    let hour = at.timestamp() - i64::from(at.minute()) * 60 - i64::from(at.second());
    (OrderedFloat(coords.lat), OrderedFloat(coords.lon), hour)
}

#[derive(Debug, Clone, Copy)]
struct Cached {
    ambient: Option<AmbientConditions>,
    wind: Option<WindObservation>,
}

/// Cache foran en tilbyder, nøkkel = (lat, lon, time). Kun vellykkede
/// oppslag lagres, så en feil aldri forgifter senere kall.
pub struct CachedConditions<P> {
    inner: P,
    metrics: Metrics,
    cache: Arc<Mutex<HashMap<CacheKey, Cached>>>,
}

impl<P: ConditionsProvider> CachedConditions<P> {
    pub fn new(inner: P, metrics: Metrics) -> Self {
        Self {
            inner,
            metrics,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Cached>> {
        // En panikk i en annen tråd gjør ikke innholdet ugyldig
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lookup<T: Copy>(
        &self,
        at: DateTime<Utc>,
        coords: Coordinates,
        get: fn(&Cached) -> Option<T>,
        set: fn(&mut Cached, T),
        fetch: impl FnOnce() -> Result<T, LookupError>,
    ) -> Result<T, LookupError> {
        let key = hour_key(at, coords);
        if let Some(v) = self.lock().get(&key).and_then(get) {
            conditions_cache_hit_total(&self.metrics).inc();
            return Ok(v);
        }
        conditions_cache_miss_total(&self.metrics).inc();

        // Hent uten å holde låsen over nettverkskallet
        let fetched = fetch()?;
        let mut cache = self.lock();
        let entry = cache.entry(key).or_insert(Cached { ambient: None, wind: None });
        set(entry, fetched);
        Ok(fetched)
    }
}

impl<P: ConditionsProvider> ConditionsProvider for CachedConditions<P> {
    fn ambient(&self, at: DateTime<Utc>, coords: Coordinates) -> Result<AmbientConditions, LookupError> {
        self.lookup(
            at,
            coords,
            |c| c.ambient,
            |c, v| c.ambient = Some(v),
            || self.inner.ambient(at, coords),
        )
    }

    fn wind(&self, at: DateTime<Utc>, coords: Coordinates) -> Result<WindObservation, LookupError> {
        self.lookup(
            at,
            coords,
            |c| c.wind,
            |c, v| c.wind = Some(v),
            || self.inner.wind(at, coords),
        )
    }
}
