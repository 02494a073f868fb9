//! Conversion from raw remote shapes to tagged domain records.

use crate::models::feed::FeedItem;
use crate::models::media::{
    DetailRecord, MediaAvailability, MediaKey, MediaKind, MediaStatus, MovieDetail, ShowDetail,
};
use crate::models::remote::{RawCatalogItem, RawDetail, RawMediaInfo, RawRequest};
use crate::models::request::{RequestId, RequestStatus, SeasonSelection, TrackedRequest};
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Availability as reported by the server; absent info means unknown.
pub fn availability(info: Option<&RawMediaInfo>) -> MediaAvailability {
    match info {
        Some(info) => MediaAvailability {
            media_ref: info.id,
            status: info.status.map(MediaStatus::from_code).unwrap_or_default(),
            request_id: info.request_id.map(RequestId::Remote),
            available: info.available,
        },
        None => MediaAvailability::default(),
    }
}

/// Turn a detail response into a movie or show record.
///
/// The kind comes from the request, not the payload: both share one shape.
pub fn detail_record(key: MediaKey, raw: RawDetail) -> Result<DetailRecord> {
    if raw.id != key.id {
        tracing::warn!("Detail response for {} carried id {}", key, raw.id);
    }

    let availability = availability(raw.media_info.as_ref());
    let genres = raw
        .genres
        .unwrap_or_default()
        .into_iter()
        .map(|g| g.name)
        .collect();

    match key.kind {
        MediaKind::Movie => {
            let title = raw
                .title
                .or(raw.name)
                .ok_or_else(|| Error::Parse(format!("movie {} has no title", key.id)))?;
            Ok(DetailRecord::Movie(MovieDetail {
                id: key.id,
                title,
                overview: raw.overview,
                poster_path: raw.poster_path,
                backdrop_path: raw.backdrop_path,
                release_date: raw.release_date,
                rating: raw.vote_average,
                runtime: raw.runtime,
                tagline: raw.tagline,
                genres,
                availability,
            }))
        }
        MediaKind::Show => {
            let name = raw
                .name
                .or(raw.title)
                .ok_or_else(|| Error::Parse(format!("show {} has no name", key.id)))?;
            Ok(DetailRecord::Show(ShowDetail {
                id: key.id,
                name,
                overview: raw.overview,
                poster_path: raw.poster_path,
                backdrop_path: raw.backdrop_path,
                first_air_date: raw.first_air_date,
                rating: raw.vote_average,
                number_of_seasons: raw.number_of_seasons,
                tagline: raw.tagline,
                genres,
                availability,
            }))
        }
    }
}

/// Turn a feed entry into a feed item, dropping people and unknown kinds.
///
/// `default_kind` applies when the entry carries no media type, which is the
/// case on single-kind feeds.
pub fn feed_item(raw: RawCatalogItem, default_kind: Option<MediaKind>) -> Option<FeedItem> {
    let kind = match raw.media_type.as_deref() {
        Some(media_type) => MediaKind::parse(media_type)?,
        None => default_kind.or_else(|| {
            if raw.title.is_some() {
                Some(MediaKind::Movie)
            } else if raw.name.is_some() {
                Some(MediaKind::Show)
            } else {
                None
            }
        })?,
    };

    let (title, date) = match kind {
        MediaKind::Movie => (raw.title.or(raw.name), raw.release_date),
        MediaKind::Show => (raw.name.or(raw.title), raw.first_air_date),
    };

    Some(FeedItem {
        key: MediaKey::new(kind, raw.id),
        title: title.unwrap_or_default(),
        overview: raw.overview,
        poster_path: raw.poster_path,
        date,
        rating: raw.vote_average,
        status: availability(raw.media_info.as_ref()).status,
    })
}

/// Turn a listed request into a tracked request.
pub fn tracked_request(raw: RawRequest) -> TrackedRequest {
    let media = raw.media.unwrap_or_default();

    let media_id = media.tmdb_id.or(media.tvdb_id).or(media.id).unwrap_or(raw.id);
    let kind = media
        .media_type
        .as_deref()
        .or(raw.kind.as_deref())
        .and_then(MediaKind::parse)
        .unwrap_or_else(|| {
            tracing::warn!("Request {} has no media type, assuming movie", raw.id);
            MediaKind::Movie
        });

    let status = RequestStatus::from_code(raw.status).unwrap_or_else(|| {
        tracing::warn!(
            "Request {} has unknown status {}, treating as pending",
            raw.id,
            raw.status
        );
        RequestStatus::Pending
    });

    let created_at = raw
        .created_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let seasons = match kind {
        MediaKind::Movie => None,
        MediaKind::Show => Some(SeasonSelection::from_reported(
            raw.seasons
                .map(|seasons| seasons.into_iter().map(|s| s.season_number).collect()),
        )),
    };

    TrackedRequest {
        id: RequestId::Remote(raw.id),
        media: MediaKey::new(kind, media_id),
        title: media.title.or(media.name),
        poster_path: media.poster_path,
        status,
        created_at,
        seasons,
        offline_queued: false,
    }
}
