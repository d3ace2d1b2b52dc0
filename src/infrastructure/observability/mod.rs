//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    PrometheusMetrics, create_metrics_router, init_metrics, record_cache_lookup,
    record_http_request, record_pipeline_outcome, record_render_incomplete,
};
