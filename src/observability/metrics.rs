use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to register metric: {0}")]
    Registration(#[from] prometheus::Error),
    #[error("Failed to encode metrics: {0}")]
    Encoding(String),
}

/// Metrics collected over one storefront session
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    pub cart_operations_total: CounterVec,
    pub order_submissions_total: CounterVec,
    pub catalog_load_duration_seconds: Histogram,
    pub catalog_services: Gauge,
    pub cart_restores_total: CounterVec,
}

impl Metrics {
    /// Create a new metrics instance with all metrics registered on a private registry
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let cart_operations_total = CounterVec::new(
            Opts::new("cart_operations_total", "Total number of cart operations"),
            &["operation", "status"],
        )?;

        let order_submissions_total = CounterVec::new(
            Opts::new(
                "order_submissions_total",
                "Total number of order submission attempts",
            ),
            &["status"],
        )?;

        let catalog_load_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "catalog_load_duration_seconds",
                "Catalog load duration in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        let catalog_services = Gauge::new(
            "catalog_services",
            "Number of services in the loaded catalog",
        )?;

        let cart_restores_total = CounterVec::new(
            Opts::new(
                "cart_restores_total",
                "Persisted cart restores by outcome",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(cart_operations_total.clone()))?;
        registry.register(Box::new(order_submissions_total.clone()))?;
        registry.register(Box::new(catalog_load_duration_seconds.clone()))?;
        registry.register(Box::new(catalog_services.clone()))?;
        registry.register(Box::new(cart_restores_total.clone()))?;

        info!("Prometheus metrics initialized");

        Ok(Metrics {
            registry,
            cart_operations_total,
            order_submissions_total,
            catalog_load_duration_seconds,
            catalog_services,
            cart_restores_total,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode all metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    pub fn record_cart_operation(&self, operation: &str, success: bool) {
        let status = if success { "success" } else { "error" };

        self.cart_operations_total
            .with_label_values(&[operation, status])
            .inc();
    }

    /// `status` is one of `submitted`, `refused` or `failed`
    pub fn record_order_submission(&self, status: &str) {
        self.order_submissions_total
            .with_label_values(&[status])
            .inc();
    }

    pub fn record_catalog_load(&self, duration_seconds: f64, service_count: usize) {
        self.catalog_load_duration_seconds.observe(duration_seconds);
        self.catalog_services.set(service_count as f64);
    }

    /// `outcome` is one of `restored`, `missing` or `discarded`
    pub fn record_cart_restore(&self, outcome: &str) {
        self.cart_restores_total.with_label_values(&[outcome]).inc();
    }
}
