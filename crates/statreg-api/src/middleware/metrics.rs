//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in
//! middleware. Domain-level gauges (companies, register records,
//! activity entries, staged imports) are updated on each `/metrics`
//! scrape (pull model) — see the metrics handler in `lib.rs`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    Encoder, GaugeVec, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // -- HTTP middleware metrics (push model) --
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // -- Domain gauges (pull model, updated on /metrics scrape) --
    companies_total: prometheus::Gauge,
    register_records_total: GaugeVec,
    activity_entries_total: prometheus::Gauge,
    staged_imports_total: prometheus::Gauge,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics").finish_non_exhaustive()
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("statreg_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "statreg_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let http_errors_total = IntCounterVec::new(
            Opts::new(
                "statreg_http_errors_total",
                "Total HTTP errors (4xx and 5xx)",
            ),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let companies_total =
            prometheus::Gauge::new("statreg_companies_total", "Registered companies")
                .expect("metric can be created");

        let register_records_total = GaugeVec::new(
            Opts::new(
                "statreg_register_records_total",
                "Register records by kind",
            ),
            &["kind"],
        )
        .expect("metric can be created");

        let activity_entries_total = prometheus::Gauge::new(
            "statreg_activity_entries_total",
            "Activity log entries",
        )
        .expect("metric can be created");

        let staged_imports_total = prometheus::Gauge::new(
            "statreg_staged_imports_total",
            "Import batches staged awaiting confirmation",
        )
        .expect("metric can be created");

        for collector in [
            Box::new(http_requests_total.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(http_request_duration_seconds.clone()),
            Box::new(http_errors_total.clone()),
            Box::new(companies_total.clone()),
            Box::new(register_records_total.clone()),
            Box::new(activity_entries_total.clone()),
            Box::new(staged_imports_total.clone()),
        ] {
            registry
                .register(collector)
                .expect("collector can be registered");
        }

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                companies_total,
                register_records_total,
                activity_entries_total,
                staged_imports_total,
            }),
        }
    }

    /// Gauge: registered companies.
    pub fn companies_total(&self) -> &prometheus::Gauge {
        &self.inner.companies_total
    }

    /// Gauge: register records by kind.
    pub fn register_records_total(&self) -> &GaugeVec {
        &self.inner.register_records_total
    }

    /// Gauge: activity log entries.
    pub fn activity_entries_total(&self) -> &prometheus::Gauge {
        &self.inner.activity_entries_total
    }

    /// Gauge: staged import batches.
    pub fn staged_imports_total(&self) -> &prometheus::Gauge {
        &self.inner.staged_imports_total
    }

    /// Record one completed request.
    fn observe(&self, method: &str, path: &str, status: u16, seconds: f64) {
        let status = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(seconds);
        if status.starts_with('4') || status.starts_with('5') {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status])
                .inc();
        }
    }

    /// Gather and encode all metrics in the Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buffer)
            .map_err(|e| e.to_string())?;
        String::from_utf8(buffer).map_err(|e| e.to_string())
    }
}

/// Record method, route template, status, and latency for every request.
///
/// Uses the matched route template (`/v1/companies/:company_id/...`)
/// rather than the raw path so label cardinality stays bounded.
pub async fn metrics_middleware(
    axum::Extension(metrics): axum::Extension<ApiMetrics>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = next.run(req).await;
    metrics.observe(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_counts_requests_and_errors() {
        let metrics = ApiMetrics::new();
        metrics.observe("GET", "/v1/companies", 200, 0.01);
        metrics.observe("POST", "/v1/companies", 422, 0.02);

        let text = metrics.gather_and_encode().unwrap();
        assert!(text.contains("statreg_http_requests_total"));
        assert!(text.contains("statreg_http_errors_total"));
    }

    #[test]
    fn test_domain_gauges_render() {
        let metrics = ApiMetrics::new();
        metrics.companies_total().set(3.0);
        metrics
            .register_records_total()
            .with_label_values(&["allotment"])
            .set(7.0);

        let text = metrics.gather_and_encode().unwrap();
        assert!(text.contains("statreg_companies_total 3"));
        assert!(text.contains("allotment"));
    }
}
