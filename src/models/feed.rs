//! Catalog feed models.

use super::media::{MediaKey, MediaKind, MediaStatus};
use serde::{Deserialize, Serialize};

/// A browsable catalog feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Trending,
    PopularMovies,
    PopularShows,
    UpcomingMovies,
    UpcomingShows,
    Search(String),
    MoviesByGenre(u64),
    ShowsByGenre(u64),
    MoviesByStudio(u64),
    ShowsByNetwork(u64),
}

impl FeedKind {
    /// Media kind every item of this feed has, if the feed is single-kind.
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            FeedKind::PopularMovies
            | FeedKind::UpcomingMovies
            | FeedKind::MoviesByGenre(_)
            | FeedKind::MoviesByStudio(_) => Some(MediaKind::Movie),
            FeedKind::PopularShows
            | FeedKind::UpcomingShows
            | FeedKind::ShowsByGenre(_)
            | FeedKind::ShowsByNetwork(_) => Some(MediaKind::Show),
            FeedKind::Trending | FeedKind::Search(_) => None,
        }
    }
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedKind::Trending => write!(f, "trending"),
            FeedKind::PopularMovies => write!(f, "popular movies"),
            FeedKind::PopularShows => write!(f, "popular tv"),
            FeedKind::UpcomingMovies => write!(f, "upcoming movies"),
            FeedKind::UpcomingShows => write!(f, "upcoming tv"),
            FeedKind::Search(query) => write!(f, "search \"{}\"", query),
            FeedKind::MoviesByGenre(id) => write!(f, "movie genre {}", id),
            FeedKind::ShowsByGenre(id) => write!(f, "tv genre {}", id),
            FeedKind::MoviesByStudio(id) => write!(f, "studio {}", id),
            FeedKind::ShowsByNetwork(id) => write!(f, "network {}", id),
        }
    }
}

/// One page of a paginated catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

fn first_page() -> u32 {
    1
}

impl<T> FeedPage<T> {
    pub fn new(page: u32, total_pages: u32, total_results: u64, results: Vec<T>) -> Self {
        Self {
            page,
            total_pages,
            total_results,
            results,
        }
    }
}

/// Lightweight search-result view of a movie or show, as shown in feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub key: MediaKey,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    /// Release or first air date.
    pub date: Option<String>,
    pub rating: Option<f64>,
    pub status: MediaStatus,
}
