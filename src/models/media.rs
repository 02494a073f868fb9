//! Media-related data models.

use serde::{Deserialize, Serialize};

/// Catalog id assigned by the origin (TMDB for most servers).
pub type MediaId = u64;

/// Media kind enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Show,
}

impl MediaKind {
    /// Name used by the server API.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "tv",
        }
    }

    /// Parse a server-side media type string.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "movie" | "movies" => Some(MediaKind::Movie),
            "tv" | "show" | "shows" | "tvshow" | "tvshows" => Some(MediaKind::Show),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        MediaKind::parse(s)
            .ok_or_else(|| crate::Error::validation(format!("unknown media kind: {}", s)))
    }
}

/// Cache key for a piece of media.
///
/// Catalog ids are only unique per kind, so lookups always carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MediaKey {
    pub kind: MediaKind,
    pub id: MediaId,
}

impl MediaKey {
    pub fn new(kind: MediaKind, id: MediaId) -> Self {
        Self { kind, id }
    }

    pub fn movie(id: MediaId) -> Self {
        Self::new(MediaKind::Movie, id)
    }

    pub fn show(id: MediaId) -> Self {
        Self::new(MediaKind::Show, id)
    }
}

impl std::fmt::Display for MediaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Display availability of a piece of media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaStatus {
    #[default]
    Unknown,
    Pending,
    Processing,
    PartiallyAvailable,
    Available,
}

impl MediaStatus {
    /// Map the server's numeric media status.
    pub fn from_code(code: i64) -> Self {
        match code {
            2 => MediaStatus::Pending,
            3 => MediaStatus::Processing,
            4 => MediaStatus::PartiallyAvailable,
            5 => MediaStatus::Available,
            _ => MediaStatus::Unknown,
        }
    }
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MediaStatus::Unknown => "unknown",
            MediaStatus::Pending => "pending",
            MediaStatus::Processing => "processing",
            MediaStatus::PartiallyAvailable => "partially available",
            MediaStatus::Available => "available",
        };
        f.write_str(label)
    }
}

/// Availability sub-record embedded in every detail record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaAvailability {
    /// Server-side media row id, when the server tracks this media.
    pub media_ref: Option<u64>,
    /// Display status.
    pub status: MediaStatus,
    /// Tracked request that drove the status, if any.
    pub request_id: Option<super::request::RequestId>,
    /// Whether the media can be played.
    pub available: bool,
}

/// Movie details.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: MediaId,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// Release date (YYYY-MM-DD).
    pub release_date: Option<String>,
    /// User rating (0-10).
    pub rating: Option<f64>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub genres: Vec<String>,
    pub availability: MediaAvailability,
}

/// TV show details.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShowDetail {
    pub id: MediaId,
    pub name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// First air date (YYYY-MM-DD).
    pub first_air_date: Option<String>,
    pub rating: Option<f64>,
    pub number_of_seasons: Option<u32>,
    pub tagline: Option<String>,
    pub genres: Vec<String>,
    pub availability: MediaAvailability,
}

/// Cached, mergeable representation of a movie or show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DetailRecord {
    #[serde(rename = "movie")]
    Movie(MovieDetail),
    #[serde(rename = "tv")]
    Show(ShowDetail),
}

impl DetailRecord {
    pub fn kind(&self) -> MediaKind {
        match self {
            DetailRecord::Movie(_) => MediaKind::Movie,
            DetailRecord::Show(_) => MediaKind::Show,
        }
    }

    pub fn id(&self) -> MediaId {
        match self {
            DetailRecord::Movie(m) => m.id,
            DetailRecord::Show(s) => s.id,
        }
    }

    pub fn key(&self) -> MediaKey {
        MediaKey::new(self.kind(), self.id())
    }

    /// Title for a movie, name for a show.
    pub fn title(&self) -> &str {
        match self {
            DetailRecord::Movie(m) => &m.title,
            DetailRecord::Show(s) => &s.name,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            DetailRecord::Movie(m) => m.poster_path.as_deref(),
            DetailRecord::Show(s) => s.poster_path.as_deref(),
        }
    }

    pub fn overview(&self) -> Option<&str> {
        match self {
            DetailRecord::Movie(m) => m.overview.as_deref(),
            DetailRecord::Show(s) => s.overview.as_deref(),
        }
    }

    /// Release date for a movie, first air date for a show.
    pub fn date(&self) -> Option<&str> {
        match self {
            DetailRecord::Movie(m) => m.release_date.as_deref(),
            DetailRecord::Show(s) => s.first_air_date.as_deref(),
        }
    }

    pub fn availability(&self) -> &MediaAvailability {
        match self {
            DetailRecord::Movie(m) => &m.availability,
            DetailRecord::Show(s) => &s.availability,
        }
    }

    /// Replace the embedded availability, returning the updated record.
    pub fn with_availability(mut self, availability: MediaAvailability) -> Self {
        match &mut self {
            DetailRecord::Movie(m) => m.availability = availability,
            DetailRecord::Show(s) => s.availability = availability,
        }
        self
    }
}
