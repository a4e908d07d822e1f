//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cart_offers_http_requests_total` (counter): requests by route, status
//! - `cart_offers_http_request_duration_seconds` (histogram): latency by route
//! - `cart_offers_offers_registered_total` (counter): offers accepted
//! - `cart_offers_registry_size` (gauge): offers currently held
//! - `cart_offers_computations_total` (counter): cart computations by outcome
//! - `cart_offers_segment_fallbacks_total` (counter): resolver failures by reason
//! - `cart_offers_segment_resolution_duration_seconds` (histogram): resolver latency
//!
//! Without an installed recorder every call is a no-op, so library code and
//! tests can record freely.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    counter!(
        "cart_offers_http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "cart_offers_http_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_offer_registered(registry_size: usize) {
    counter!("cart_offers_offers_registered_total").increment(1);
    gauge!("cart_offers_registry_size").set(registry_size as f64);
}

/// `outcome` is "applied" or "unmatched".
pub fn record_computation(outcome: &'static str) {
    counter!("cart_offers_computations_total", "outcome" => outcome).increment(1);
}

pub fn record_segment_fallback(reason: &'static str) {
    counter!("cart_offers_segment_fallbacks_total", "reason" => reason).increment(1);
}

pub fn record_segment_resolution(resolver: &'static str, start: Instant) {
    histogram!(
        "cart_offers_segment_resolution_duration_seconds",
        "resolver" => resolver
    )
    .record(start.elapsed().as_secs_f64());
}
