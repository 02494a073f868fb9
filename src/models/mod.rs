//! Data models.

pub mod config;
pub mod feed;
pub mod media;
pub mod remote;
pub mod request;
