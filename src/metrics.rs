//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, IntCounterVec, IntGauge, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("beethoven_http_requests_total", "Total number of HTTP requests"),
        &["method", "endpoint", "status"]
    ).expect("metric can be created");

    // Record store Metrics
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("beethoven_store_operations_total", "Total number of dataset loads and saves"),
        &["operation", "dataset"]
    ).expect("metric can be created");
    pub static ref STORE_OPERATION_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "beethoven_store_operation_duration_seconds",
            "Dataset load/save duration in seconds"
        ).buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["operation", "dataset"]
    ).expect("metric can be created");
    pub static ref STORE_CONFLICTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("beethoven_store_conflicts_total", "Saves rejected because the dataset changed underneath"),
        &["dataset"]
    ).expect("metric can be created");

    // Music lookup Metrics
    pub static ref LOOKUP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("beethoven_lookup_requests_total", "Total number of music provider requests"),
        &["kind", "outcome"]
    ).expect("metric can be created");
    pub static ref LOOKUP_REQUEST_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "beethoven_lookup_request_duration_seconds",
            "Music provider request duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["kind"]
    ).expect("metric can be created");

    // Application Metrics
    pub static ref SESSIONS_ACTIVE: IntGauge = IntGauge::new(
        "beethoven_sessions_active",
        "Current number of logged-in sessions"
    ).expect("metric can be created");
    pub static ref USERS_TOTAL: IntGauge = IntGauge::new(
        "beethoven_users_total",
        "Total number of registered users"
    ).expect("metric can be created");
    pub static ref REVIEWS_TOTAL: IntGauge = IntGauge::new(
        "beethoven_reviews_total",
        "Total number of published reviews"
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("beethoven_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("HTTP_REQUESTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(STORE_OPERATIONS_TOTAL.clone()))
        .expect("STORE_OPERATIONS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(STORE_OPERATION_DURATION_SECONDS.clone()))
        .expect("STORE_OPERATION_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(STORE_CONFLICTS_TOTAL.clone()))
        .expect("STORE_CONFLICTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(LOOKUP_REQUESTS_TOTAL.clone()))
        .expect("LOOKUP_REQUESTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(LOOKUP_REQUEST_DURATION_SECONDS.clone()))
        .expect("LOOKUP_REQUEST_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(SESSIONS_ACTIVE.clone()))
        .expect("SESSIONS_ACTIVE can be registered");
    REGISTRY
        .register(Box::new(USERS_TOTAL.clone()))
        .expect("USERS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(REVIEWS_TOTAL.clone()))
        .expect("REVIEWS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}
