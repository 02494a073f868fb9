//! Raw shapes returned by the remote catalog.
//!
//! These mirror the server's JSON: most fields are optional and movies and
//! shows share one struct. `core::mapper` turns them into tagged domain
//! records right after a fetch.

use serde::{Deserialize, Serialize};

/// Feed or search result item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalogItem {
    pub id: u64,
    /// `movie`, `tv` or `person`.
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f64>,
    pub media_info: Option<RawMediaInfo>,
}

/// Availability block attached to catalog entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMediaInfo {
    pub id: Option<u64>,
    pub tmdb_id: Option<u64>,
    pub status: Option<i64>,
    pub request_id: Option<u64>,
    #[serde(default)]
    pub available: bool,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGenre {
    pub id: u64,
    pub name: String,
}

/// Movie or show details, as one nullable union.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDetail {
    pub id: u64,
    // Movie fields
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    // Show fields
    pub name: Option<String>,
    pub first_air_date: Option<String>,
    pub number_of_seasons: Option<u32>,
    // Shared
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub tagline: Option<String>,
    pub genres: Option<Vec<RawGenre>>,
    pub media_info: Option<RawMediaInfo>,
}

/// A request as listed by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRequest {
    pub id: u64,
    /// Request type, `movie` or `tv`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: i64,
    pub created_at: Option<String>,
    pub media: Option<RawRequestMedia>,
    pub seasons: Option<Vec<RawRequestSeason>>,
}

/// Media block of a request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRequestMedia {
    pub id: Option<u64>,
    pub media_type: Option<String>,
    pub tmdb_id: Option<u64>,
    pub tvdb_id: Option<u64>,
    pub status: Option<i64>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
}

/// Season entry of a show request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRequestSeason {
    pub id: Option<u64>,
    pub season_number: u32,
    pub status: Option<i64>,
}

/// One page of the user's requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestPage {
    pub items: Vec<RawRequest>,
    /// Number of requests the server holds in total.
    pub total_on_server: u64,
}
