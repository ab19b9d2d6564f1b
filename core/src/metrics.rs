// core/src/metrics.rs
// Prometheus-tellere for anbefalinger og vær-cache.
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pressure_recommendations: IntCounter,
    compensation_unavailable: IntCounter,
    wind_no_data: IntCounter,
    cache_hit: IntCounter,
    cache_miss: IntCounter,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("pressure_recommendations", &self.pressure_recommendations.get())
            .field("compensation_unavailable", &self.compensation_unavailable.get())
            .field("wind_no_data", &self.wind_no_data.get())
            .field("cache_hit", &self.cache_hit.get())
            .field("cache_miss", &self.cache_miss.get())
            .finish()
    }
}

fn counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let c = IntCounter::new(name, help)?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}

impl Metrics {
    /// Egen registry per instans, så tester ikke deler tellere.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("ridetune".into()), None)?;
        Ok(Self {
            pressure_recommendations: counter(
                &registry,
                "pressure_recommendations_total",
                "Baseline pressure recommendations computed",
            )?,
            compensation_unavailable: counter(
                &registry,
                "compensation_unavailable_total",
                "Recommendations where temperature/elevation compensation was unavailable",
            )?,
            wind_no_data: counter(
                &registry,
                "wind_no_data_total",
                "Heading recommendations skipped for missing wind data",
            )?,
            cache_hit: counter(&registry, "conditions_cache_hit_total", "Conditions cache hits")?,
            cache_miss: counter(&registry, "conditions_cache_miss_total", "Conditions cache misses")?,
            registry,
        })
    }

    /// Prometheus tekstformat
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

pub fn pressure_recommendations_total(m: &Metrics) -> &IntCounter {
    &m.pressure_recommendations
}

pub fn compensation_unavailable_total(m: &Metrics) -> &IntCounter {
    &m.compensation_unavailable
}

pub fn wind_no_data_total(m: &Metrics) -> &IntCounter {
    &m.wind_no_data
}

pub fn conditions_cache_hit_total(m: &Metrics) -> &IntCounter {
    &m.cache_hit
}

pub fn conditions_cache_miss_total(m: &Metrics) -> &IntCounter {
    &m.cache_miss
}

/// Prosessglobal instans for kallere som ikke eier en egen (f.eks. Python-modulen).
pub static GLOBAL: Lazy<Option<Metrics>> = Lazy::new(|| match Metrics::new() {
    Ok(m) => Some(m),
    Err(e) => {
        log::error!("could not set up metrics registry: {e}");
        None
    }
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_render_with_prefix() {
        let m = Metrics::new().unwrap();
        pressure_recommendations_total(&m).inc();
        conditions_cache_miss_total(&m).inc_by(2);
        let text = m.render().unwrap();
        assert!(text.contains("ridetune_pressure_recommendations_total 1"));
        assert!(text.contains("ridetune_conditions_cache_miss_total 2"));
    }
}
