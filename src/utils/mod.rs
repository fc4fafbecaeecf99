//! Shared utilities: errors, logging, metrics, and plotting.

pub mod error;
pub mod logging;
pub mod metrics;
pub mod plot;
