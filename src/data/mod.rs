//! Data layer module
//!
//! Handles all data persistence and caching:
//! - Flat-file datasets (users, reviews, listen list, follows, favorites)
//! - Session cache (volatile)

mod cache;
mod models;
mod store;

pub use cache::{SessionCache, SessionHandle};
pub use models::*;
pub use store::{RecordStore, Snapshot};

#[cfg(test)]
mod store_test;
