//! Seerr Sync Library
//!
//! An offline-resilient client for Overseerr/Jellyseerr style media request
//! servers: paginated catalog feeds, detail lookups with a local cache
//! fallback, and an incrementally synchronized request list.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
