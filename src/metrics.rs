//! Prometheus metrics for application observability.
//!
//! Metrics are exposed on a dedicated listener when `METRICS_PORT` is set.
//! Without an installed recorder every recording call is a no-op.
//!
//! # Available Metrics
//!
//! - `product_api_requests_total` - Requests served (labels: method, status)
//! - `product_api_request_duration_seconds` - Request latency (labels: method, status)
//! - `product_api_products_changed_total` - Store mutations (label: operation)
//! - `product_api_products` - Current catalog size

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{error, info};

/// Metric names as constants for consistency.
pub mod names {
    pub const REQUESTS_TOTAL: &str = "product_api_requests_total";
    pub const REQUEST_DURATION_SECONDS: &str = "product_api_request_duration_seconds";
    pub const PRODUCTS_CHANGED_TOTAL: &str = "product_api_products_changed_total";
    pub const PRODUCTS: &str = "product_api_products";
}

/// Initialize the Prometheus metrics exporter on `metrics_addr`.
///
/// # Errors
///
/// Returns a message if the exporter cannot be installed (e.g. port in use).
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(names::REQUESTS_TOTAL, "Total number of HTTP requests served");
    describe_histogram!(
        names::REQUEST_DURATION_SECONDS,
        "HTTP request duration in seconds"
    );
    describe_counter!(
        names::PRODUCTS_CHANGED_TOTAL,
        "Total number of product create, update and delete operations"
    );
    describe_gauge!(names::PRODUCTS, "Number of products in the catalog");

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Record a served request.
pub fn record_request(method: &str, status: u16, duration_secs: f64) {
    let method = method.to_string();
    let status = status.to_string();
    counter!(names::REQUESTS_TOTAL, "method" => method.clone(), "status" => status.clone())
        .increment(1);
    histogram!(names::REQUEST_DURATION_SECONDS, "method" => method, "status" => status)
        .record(duration_secs);
}

/// Record a store mutation and the resulting catalog size.
pub fn record_product_change(operation: &'static str, products: usize) {
    counter!(names::PRODUCTS_CHANGED_TOTAL, "operation" => operation).increment(1);
    gauge!(names::PRODUCTS).set(products as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    // These only check that recording without an installed recorder is harmless.

    #[test]
    fn test_record_request() {
        record_request("GET", 200, 0.01);
    }

    #[test]
    fn test_record_product_change() {
        record_product_change("create", 4);
        record_product_change("delete", 3);
    }
}
