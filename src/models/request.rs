//! Media request models.

use super::media::{MediaKey, MediaKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a tracked request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestId {
    /// Id assigned by the server.
    Remote(u64),
    /// Local placeholder for a submission waiting in the offline queue.
    Queued(MediaKey),
}

impl RequestId {
    pub fn is_queued(&self) -> bool {
        matches!(self, RequestId::Queued(_))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Remote(id) => write!(f, "{}", id),
            RequestId::Queued(key) => write!(f, "queued:{}", key),
        }
    }
}

impl std::str::FromStr for RequestId {
    type Err = crate::Error;

    /// Accepts `123`, `#123` or `queued:movie/42`.
    fn from_str(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix("queued:") {
            let (kind, id) = rest
                .split_once('/')
                .ok_or_else(|| crate::Error::validation(format!("invalid queued request id: {}", s)))?;
            let kind: MediaKind = kind.parse()?;
            let id = id
                .parse()
                .map_err(|_| crate::Error::validation(format!("invalid media id: {}", id)))?;
            return Ok(RequestId::Queued(MediaKey::new(kind, id)));
        }

        s.trim_start_matches('#')
            .parse()
            .map(RequestId::Remote)
            .map_err(|_| crate::Error::validation(format!("invalid request id: {}", s)))
    }
}

/// Status of a media request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Declined,
    Available,
}

impl RequestStatus {
    /// Map the server's numeric request status.
    ///
    /// Code 5 is the media-level "available" code, which some servers report
    /// on completed requests.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(RequestStatus::Pending),
            2 => Some(RequestStatus::Approved),
            3 => Some(RequestStatus::Declined),
            4 | 5 => Some(RequestStatus::Available),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Declined => write!(f, "declined"),
            RequestStatus::Available => write!(f, "available"),
        }
    }
}

/// Which seasons of a show a request covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonSelection {
    /// Every season, including ones not aired yet.
    All,
    /// Exactly these season numbers, sorted and unique.
    Seasons(Vec<u32>),
    /// The server reported no season list. Not a valid submission.
    Unspecified,
}

impl SeasonSelection {
    /// Build an explicit selection, sorting and removing duplicates.
    pub fn seasons<I: IntoIterator<Item = u32>>(numbers: I) -> Self {
        let mut numbers: Vec<u32> = numbers.into_iter().collect();
        numbers.sort_unstable();
        numbers.dedup();
        SeasonSelection::Seasons(numbers)
    }

    /// Interpret a season list reported by the server.
    pub fn from_reported(numbers: Option<Vec<u32>>) -> Self {
        match numbers {
            Some(numbers) if !numbers.is_empty() => SeasonSelection::seasons(numbers),
            _ => SeasonSelection::Unspecified,
        }
    }
}

impl std::fmt::Display for SeasonSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeasonSelection::All => write!(f, "all seasons"),
            SeasonSelection::Unspecified => write!(f, "seasons unknown"),
            SeasonSelection::Seasons(numbers) => {
                let list: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
                write!(f, "S{}", list.join(",S"))
            }
        }
    }
}

/// Local record of a user-submitted or remotely-observed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedRequest {
    pub id: RequestId,
    pub media: MediaKey,
    /// Display title, missing until hydrated from the detail record.
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    /// Season selection; `None` for movies.
    pub seasons: Option<SeasonSelection>,
    /// Submitted while offline and not yet accepted by the server.
    #[serde(default)]
    pub offline_queued: bool,
}

impl TrackedRequest {
    /// Title for display, with a fallback for unhydrated requests.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Title unavailable ({})", self.media))
    }

    /// Whether title or poster still have to be fetched from the detail record.
    pub fn needs_hydration(&self) -> bool {
        self.title.is_none() || self.poster_path.is_none()
    }
}

/// Advanced options accepted by the server on submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Quality profile id on the download service.
    pub profile_id: Option<u32>,
    /// Root folder on the download service.
    pub root_folder: Option<String>,
}

/// A request submission, as sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSubmission {
    pub media: MediaKey,
    pub seasons: Option<SeasonSelection>,
    #[serde(default)]
    pub options: RequestOptions,
}

impl RequestSubmission {
    pub fn movie(id: u64) -> Self {
        Self {
            media: MediaKey::movie(id),
            seasons: None,
            options: RequestOptions::default(),
        }
    }

    pub fn show(id: u64, seasons: SeasonSelection) -> Self {
        Self {
            media: MediaKey::show(id),
            seasons: Some(seasons),
            options: RequestOptions::default(),
        }
    }

    /// Check the submission before it leaves the device.
    pub fn validate(&self) -> crate::Result<()> {
        if self.media.id == 0 {
            return Err(crate::Error::validation("media id must be positive"));
        }

        match (self.media.kind, &self.seasons) {
            (MediaKind::Movie, None) => Ok(()),
            (MediaKind::Movie, Some(_)) => Err(crate::Error::validation(
                "movie requests do not take a season selection",
            )),
            (MediaKind::Show, None) | (MediaKind::Show, Some(SeasonSelection::Unspecified)) => {
                Err(crate::Error::validation(
                    "show requests need explicit seasons or all seasons",
                ))
            }
            (MediaKind::Show, Some(SeasonSelection::Seasons(numbers))) if numbers.is_empty() => {
                Err(crate::Error::validation("season list is empty"))
            }
            (MediaKind::Show, Some(_)) => Ok(()),
        }
    }
}

/// Submission waiting for connectivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedRequest {
    pub submission: RequestSubmission,
    pub queued_at: DateTime<Utc>,
}

impl QueuedRequest {
    pub fn key(&self) -> MediaKey {
        self.submission.media
    }
}
