use anyhow::Context;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use http::StatusCode;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::{delivery::DeliveryChannel, state::AppState};

/// Counters for the signup delivery chain.
#[derive(Clone)]
pub struct DeliveryMetrics {
    registry: Arc<Registry>,
    delivered: IntCounterVec,
    failed: IntCounter,
    rejected: IntCounter,
}

impl DeliveryMetrics {
    /// Create the counters and register them on a fresh `Registry`.
    pub fn create() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let delivered = IntCounterVec::new(
            Opts::new(
                "signup_delivered_total",
                "Signups delivered, per delivery channel",
            ),
            &["channel"],
        )
        .context("Failed to create `signup_delivered_total` counter")?;
        registry
            .register(Box::new(delivered.clone()))
            .context("Failed to register `signup_delivered_total` metric")?;

        let failed = IntCounter::new(
            "signup_delivery_failed_total",
            "Signups no channel managed to deliver",
        )
        .context("Failed to create `signup_delivery_failed_total` counter")?;
        registry
            .register(Box::new(failed.clone()))
            .context("Failed to register `signup_delivery_failed_total` metric")?;

        let rejected = IntCounter::new(
            "signup_rejected_total",
            "Submissions rejected by validation",
        )
        .context("Failed to create `signup_rejected_total` counter")?;
        registry
            .register(Box::new(rejected.clone()))
            .context("Failed to register `signup_rejected_total` metric")?;

        Ok(Self {
            registry: Arc::new(registry),
            delivered,
            failed,
            rejected,
        })
    }

    pub fn record_delivered(&self, channel: DeliveryChannel) {
        self.delivered.with_label_values(&[channel.as_str()]).inc();
    }

    pub fn record_failed(&self) {
        self.failed.inc();
    }

    pub fn record_rejected(&self) {
        self.rejected.inc();
    }

    /// Render every registered metric in the Prometheus text exposition
    /// format.
    fn render(&self) -> Result<String, MetricsError> {
        let mut buffer = vec![];
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("Failed to encode metrics")
            .map_err(MetricsError::UnexpectedError)?;

        String::from_utf8(buffer)
            .context("Failed to convert metrics to a valid string")
            .map_err(MetricsError::UnexpectedError)
    }
}

/// Create a router to expose the metrics for scraping.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_endpoint))
}

#[tracing::instrument(skip(metrics))]
#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = OK, description = "Metrics in the Prometheus text exposition format")
    )
)]
pub(crate) async fn metrics_endpoint(
    State(metrics): State<Arc<DeliveryMetrics>>,
) -> Result<String, MetricsError> {
    metrics.render()
}

#[derive(thiserror::Error)]
pub enum MetricsError {
    #[error("Unexpected error when generating metrics")]
    UnexpectedError(#[source] anyhow::Error),
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
