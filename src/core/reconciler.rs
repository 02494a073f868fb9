//! Merge locally tracked requests into remote availability.

use crate::models::media::{MediaAvailability, MediaStatus};
use crate::models::request::{RequestStatus, TrackedRequest};

/// Combine remote availability with the local tracked request for the same media.
///
/// A remotely confirmed `Available` always wins. Otherwise a tracked request
/// overrides the status, so a freshly submitted request shows up before the
/// server catches up.
pub fn reconcile(
    remote: &MediaAvailability,
    local: Option<&TrackedRequest>,
) -> MediaAvailability {
    if remote.status == MediaStatus::Available {
        return remote.clone();
    }

    let Some(request) = local else {
        return remote.clone();
    };

    let status = match request.status {
        RequestStatus::Pending => MediaStatus::Pending,
        RequestStatus::Approved => MediaStatus::Processing,
        RequestStatus::Available => MediaStatus::Available,
        RequestStatus::Declined => MediaStatus::Unknown,
    };

    MediaAvailability {
        media_ref: remote.media_ref,
        status,
        request_id: Some(request.id),
        available: remote.available || status == MediaStatus::Available,
    }
}
