//! External collaborators: remote catalog and local cache.

pub mod cache;
pub mod catalog;
pub mod overseerr;

pub use cache::{CacheStore, JsonFileCache, MemoryCache};
pub use catalog::CatalogClient;
pub use overseerr::OverseerrClient;
