use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();

    let handle = builder
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    init_metric_descriptions();

    handle
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "warehouse_quotes_total",
        "Total number of cost quote requests"
    );
    describe_counter!(
        "warehouse_rate_misses_total",
        "Cost resolutions that found no applicable pricing rate"
    );
    describe_histogram!(
        "warehouse_quote_duration_seconds",
        "Quote request duration in seconds"
    );
    describe_counter!(
        "warehouse_reports_total",
        "Total number of cost report requests"
    );
    describe_gauge!(
        "warehouse_rates_info",
        "Service version and build information"
    );

    gauge!("warehouse_rates_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a quote request
pub fn record_quote(api_key: &str, space_type: &str) {
    counter!(
        "warehouse_quotes_total",
        "api_key" => api_key.to_string(),
        "space_type" => space_type.to_string(),
    )
    .increment(1);
}

/// Record a resolution that matched no pricing rate
pub fn record_rate_miss(space_type: &str) {
    counter!(
        "warehouse_rate_misses_total",
        "space_type" => space_type.to_string(),
    )
    .increment(1);
}

/// Record quote request duration
pub fn record_quote_duration(duration: Duration) {
    histogram!("warehouse_quote_duration_seconds").record(duration.as_secs_f64());
}

/// Record a report request
pub fn record_report(api_key: &str, report: &str) {
    counter!(
        "warehouse_reports_total",
        "api_key" => api_key.to_string(),
        "report" => report.to_string(),
    )
    .increment(1);
}
