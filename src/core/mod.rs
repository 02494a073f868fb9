//! Core reconciliation and pagination logic.

pub mod details;
pub mod feed;
pub mod mapper;
pub mod reconciler;
pub mod request_list;
pub mod requests;

pub use details::{DetailService, Fetched, Freshness};
pub use feed::{observe_feed, FeedSource};
pub use reconciler::reconcile;
pub use request_list::{LoadOutcome, RequestListSnapshot, RequestListSync};
pub use requests::{FlushReport, RequestService, SubmitOutcome};
