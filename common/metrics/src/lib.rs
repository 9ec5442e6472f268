//! Thin wrapper around `prometheus` so call sites never touch the registry
//! directly. Metric construction returns a `Result` because registration
//! can fail on name collisions; every call site reports that through
//! `try_create_*` and logs on failure rather than panicking, keeping a
//! rogue metric name from taking the service down.

pub use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

use std::sync::LazyLock;

static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub type Result<T> = std::result::Result<T, prometheus::Error>;

pub fn try_create_int_counter(name: &str, help: &str) -> Result<IntCounter> {
    let counter = IntCounter::new(name, help)?;
    DEFAULT_REGISTRY.register(Box::new(counter.clone()))?;
    Ok(counter)
}

pub fn try_create_int_gauge(name: &str, help: &str) -> Result<IntGauge> {
    let gauge = IntGauge::new(name, help)?;
    DEFAULT_REGISTRY.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

pub fn try_create_int_counter_vec(name: &str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    let counter = IntCounterVec::new(Opts::new(name, help), labels)?;
    DEFAULT_REGISTRY.register(Box::new(counter.clone()))?;
    Ok(counter)
}

pub fn try_create_histogram(name: &str, help: &str) -> Result<Histogram> {
    let histogram = Histogram::with_opts(HistogramOpts::new(name, help))?;
    DEFAULT_REGISTRY.register(Box::new(histogram.clone()))?;
    Ok(histogram)
}

/// Renders the default registry in Prometheus text exposition format, for
/// the `/metrics` endpoint served alongside the OpenAPI side channel.
pub fn gather_text() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let families = DEFAULT_REGISTRY.gather();
    let mut buf = Vec::new();
    if encoder.encode(&families, &mut buf).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_appears_in_gathered_output() {
        let counter = try_create_int_counter("attacker_metrics_test_counter", "test").unwrap();
        counter.inc();
        assert!(gather_text().contains("attacker_metrics_test_counter"));
    }
}
