//! CLI command implementations.

pub mod details;
pub mod feed;
pub mod requests;

use crate::models::media::MediaStatus;
use crate::models::request::RequestStatus;
use colored::{ColoredString, Colorize};

/// Colored label for a media status.
pub(crate) fn media_status_label(status: MediaStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        MediaStatus::Available => label.green(),
        MediaStatus::PartiallyAvailable => label.cyan(),
        MediaStatus::Processing => label.blue(),
        MediaStatus::Pending => label.yellow(),
        MediaStatus::Unknown => label.dimmed(),
    }
}

/// Colored label for a request status.
pub(crate) fn request_status_label(status: RequestStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        RequestStatus::Available => label.green(),
        RequestStatus::Approved => label.blue(),
        RequestStatus::Pending => label.yellow(),
        RequestStatus::Declined => label.red(),
    }
}

/// Year part of a `YYYY-MM-DD` date.
pub(crate) fn year_of(date: Option<&str>) -> String {
    date.and_then(|d| d.get(..4))
        .map(str::to_string)
        .unwrap_or_else(|| "????".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_of() {
        assert_eq!(year_of(Some("1999-03-31")), "1999");
        assert_eq!(year_of(Some("")), "????");
        assert_eq!(year_of(None), "????");
    }
}
