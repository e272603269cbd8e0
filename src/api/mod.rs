//! API layer
//!
//! HTTP handlers for:
//! - JSON API v1 (`/api/v1/...`)
//! - Server-rendered pages
//! - Metrics (Prometheus)

mod dto;
pub mod metrics;
mod pages;
mod v1;

pub use dto::*;

pub use metrics::{metrics_router, track_requests};
pub use pages::pages_router;
pub use v1::v1_router;
