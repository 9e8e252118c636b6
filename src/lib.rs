//! Operations console core for a legal-services intake and case-management
//! product.
//!
//! This crate is the layer between the REST backend and whatever renders the
//! staff console: typed endpoint contracts, the kanban pipeline stage engine,
//! funnel/conversion analytics, and per-screen services that own their fetched
//! state. Nothing here renders; everything here is the data a screen shows.

pub mod api;
pub mod config;
pub mod error;
pub mod fetch_seq;
pub mod funnel;
pub mod services;
pub mod stage;
pub mod tracker;
pub mod types;
pub mod validate;

/// Initialize env_logger once for binaries and integration harnesses.
///
/// Safe to call repeatedly; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
