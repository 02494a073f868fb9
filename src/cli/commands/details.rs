//! Details command implementation.

use super::{media_status_label, year_of};
use crate::cli::context::Context;
use crate::core::DetailService;
use crate::models::media::{DetailRecord, MediaKey};
use anyhow::Result;
use colored::Colorize;

/// Fetch and print details for one movie or show.
pub async fn show(ctx: &Context, key: MediaKey, format: &str) -> Result<()> {
    let service = DetailService::new(ctx.catalog.clone(), ctx.cache.clone());
    let fetched = service.get_details(key).await?;
    let record = &fetched.value;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    if fetched.is_stale() {
        println!(
            "{}",
            "Server unreachable, showing cached details".yellow()
        );
        println!();
    }

    println!(
        "{} ({})",
        record.title().bold().cyan(),
        year_of(record.date())
    );

    match record {
        DetailRecord::Movie(movie) => {
            if let Some(runtime) = movie.runtime {
                println!("  {} {} min", "Runtime:".bold(), runtime);
            }
        }
        DetailRecord::Show(show) => {
            if let Some(seasons) = show.number_of_seasons {
                println!("  {} {}", "Seasons:".bold(), seasons);
            }
        }
    }

    let genres = match record {
        DetailRecord::Movie(movie) => &movie.genres,
        DetailRecord::Show(show) => &show.genres,
    };
    if !genres.is_empty() {
        println!("  {} {}", "Genres:".bold(), genres.join(", "));
    }

    let availability = record.availability();
    println!(
        "  {} {}",
        "Status:".bold(),
        media_status_label(availability.status)
    );
    if let Some(request_id) = availability.request_id {
        println!("  {} {}", "Request:".bold(), request_id);
    }

    if let Some(overview) = record.overview() {
        println!();
        println!("{}", overview);
    }

    Ok(())
}
