//! Seerr Sync CLI
//!
//! A command-line client for Overseerr/Jellyseerr that keeps working offline.

use clap::Parser;
use seerr_sync::cli::{
    args::{Cli, Commands},
    commands::{details, feed, requests},
    context::{self, Context},
};
use seerr_sync::models::config::{self, Config};
use seerr_sync::models::media::MediaKey;
use seerr_sync::models::request::{RequestOptions, RequestSubmission, SeasonSelection};
use seerr_sync::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = context::with_cache_override(config::load_config(), cli.offline_cache);

    // Run the appropriate command
    match cli.command {
        Commands::Check => {
            run_preflight_checks(&config).await?;
        }

        Commands::Feed {
            feed: feed_arg,
            query,
            id,
            pages,
            format,
        } => {
            let kind = feed_arg.to_feed(query, id).map_err(anyhow::Error::msg)?;
            let ctx = Context::open(config).await?;
            feed::browse(&ctx, kind, pages, &format).await?;
        }

        Commands::Details { kind, id, format } => {
            let ctx = Context::open(config).await?;
            details::show(&ctx, MediaKey::new(kind.into(), id), &format).await?;
        }

        Commands::Requests { pages, format } => {
            let ctx = Context::open(config).await?;
            requests::list(&ctx, pages, &format).await?;
        }

        Commands::Request {
            kind,
            id,
            seasons,
            all_seasons,
            profile_id,
            root_folder,
        } => {
            let seasons = if all_seasons {
                Some(SeasonSelection::All)
            } else {
                seasons.map(SeasonSelection::seasons)
            };
            let submission = RequestSubmission {
                media: MediaKey::new(kind.into(), id),
                seasons,
                options: RequestOptions {
                    profile_id,
                    root_folder,
                },
            };
            submission.validate()?;

            let ctx = Context::open(config).await?;
            requests::submit(&ctx, submission).await?;
        }

        Commands::Cancel { request_id } => {
            let ctx = Context::open(config).await?;
            requests::cancel(&ctx, &request_id).await?;
        }

        Commands::Flush => {
            let ctx = Context::open(config).await?;
            requests::flush(&ctx).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("seerr_sync=debug")
    } else {
        EnvFilter::new("seerr_sync=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(config: &Config) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config).await?;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
