//! Command line argument definitions.

use crate::models::feed::FeedKind;
use crate::models::media::MediaKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Seerr Sync - Browse and request media from Overseerr/Jellyseerr
#[derive(Parser, Debug)]
#[command(name = "seerr-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Offline cache file (overrides [cache].path)
    #[arg(long, global = true, value_name = "PATH")]
    pub offline_cache: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check server, API key and offline cache
    Check,

    /// Browse a catalog feed
    Feed {
        /// Feed to browse
        #[arg(value_enum, value_name = "FEED")]
        feed: FeedArg,

        /// Search query (for `search`)
        #[arg(short, long)]
        query: Option<String>,

        /// Genre, studio or network id
        #[arg(long)]
        id: Option<u64>,

        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show movie or TV show details
    Details {
        /// Media kind
        #[arg(value_enum, value_name = "KIND")]
        kind: KindArg,

        /// Catalog id
        #[arg(value_name = "ID")]
        id: u64,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List your requests
    Requests {
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Request a movie or TV show
    Request {
        /// Media kind
        #[arg(value_enum, value_name = "KIND")]
        kind: KindArg,

        /// Catalog id
        #[arg(value_name = "ID")]
        id: u64,

        /// Seasons to request (e.g., 1,2,3)
        #[arg(long, value_delimiter = ',', conflicts_with = "all_seasons")]
        seasons: Option<Vec<u32>>,

        /// Request every season, including future ones
        #[arg(long)]
        all_seasons: bool,

        /// Quality profile id
        #[arg(long)]
        profile_id: Option<u32>,

        /// Root folder on the download service
        #[arg(long)]
        root_folder: Option<String>,
    },

    /// Cancel a request (e.g., 42 or queued:movie/550)
    Cancel {
        /// Request id
        #[arg(value_name = "REQUEST_ID")]
        request_id: String,
    },

    /// Resubmit requests queued while offline
    Flush,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedArg {
    Trending,
    PopularMovies,
    PopularTv,
    UpcomingMovies,
    UpcomingTv,
    Search,
    MovieGenre,
    TvGenre,
    Studio,
    Network,
}

impl FeedArg {
    /// Combine with `--query` / `--id` into a feed.
    pub fn to_feed(self, query: Option<String>, id: Option<u64>) -> Result<FeedKind, String> {
        let need_id = |name: &str| id.ok_or_else(|| format!("`{}` needs --id", name));
        Ok(match self {
            FeedArg::Trending => FeedKind::Trending,
            FeedArg::PopularMovies => FeedKind::PopularMovies,
            FeedArg::PopularTv => FeedKind::PopularShows,
            FeedArg::UpcomingMovies => FeedKind::UpcomingMovies,
            FeedArg::UpcomingTv => FeedKind::UpcomingShows,
            FeedArg::Search => {
                FeedKind::Search(query.ok_or_else(|| "`search` needs --query".to_string())?)
            }
            FeedArg::MovieGenre => FeedKind::MoviesByGenre(need_id("movie-genre")?),
            FeedArg::TvGenre => FeedKind::ShowsByGenre(need_id("tv-genre")?),
            FeedArg::Studio => FeedKind::MoviesByStudio(need_id("studio")?),
            FeedArg::Network => FeedKind::ShowsByNetwork(need_id("network")?),
        })
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Movie,
    Tv,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Tv => MediaKind::Show,
        }
    }
}
