//! Prometheus metrics for the activation service.

use once_cell::sync::Lazy;
use prometheus::{
    CounterVec, Encoder, HistogramVec, TextEncoder, register_counter_vec, register_histogram_vec,
};

use crate::error::ActivationError;

/// Claim outcomes counter.
pub static CLAIMS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "activation_service_claims_total",
        "Total number of claim requests by outcome",
        &["outcome"]
    )
    .expect("Failed to register claims metric")
});

/// Unbind outcomes counter.
pub static UNBINDS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "activation_service_unbinds_total",
        "Total number of admin unbind requests by outcome",
        &["outcome"]
    )
    .expect("Failed to register unbinds metric")
});

/// Binding store operations counter.
pub static STORE_OPERATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "activation_service_store_operations_total",
        "Total number of binding store operations",
        &["backend", "operation", "status"]
    )
    .expect("Failed to register store_operations metric")
});

/// Claim latency histogram.
pub static CLAIM_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "activation_service_claim_latency_seconds",
        "Claim handling latency in seconds",
        &["outcome"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register claim_latency metric")
});

/// Record a finished claim.
pub fn record_claim(outcome: &str, duration_secs: f64) {
    CLAIMS.with_label_values(&[outcome]).inc();
    CLAIM_LATENCY.with_label_values(&[outcome]).observe(duration_secs);
}

/// Record a finished unbind.
pub fn record_unbind(outcome: &str) {
    UNBINDS.with_label_values(&[outcome]).inc();
}

/// Record a store operation.
pub fn record_store_operation(backend: &str, operation: &str, status: &str) {
    STORE_OPERATIONS
        .with_label_values(&[backend, operation, status])
        .inc();
}

/// Render every registered metric in the Prometheus text format.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn render() -> Result<String, ActivationError> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| ActivationError::internal(format!("metrics encoding: {e}")))?;
    String::from_utf8(buffer).map_err(|e| ActivationError::internal(format!("metrics encoding: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_claim() {
        record_claim("BOUND", 0.002);
        let value = CLAIMS.with_label_values(&["BOUND"]).get();
        assert!(value > 0.0);
        let count = CLAIM_LATENCY.with_label_values(&["BOUND"]).get_sample_count();
        assert!(count > 0);
    }

    #[test]
    fn test_record_store_operation() {
        record_store_operation("memory", "bind_if_absent", "ok");
        let value = STORE_OPERATIONS
            .with_label_values(&["memory", "bind_if_absent", "ok"])
            .get();
        assert!(value > 0.0);
    }

    #[test]
    fn test_render_includes_recorded_series() {
        record_unbind("UNBOUND");
        let text = render().unwrap();
        assert!(text.contains("activation_service_unbinds_total"));
    }
}
