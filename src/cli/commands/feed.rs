//! Feed command implementation.

use super::{media_status_label, year_of};
use crate::cli::context::Context;
use crate::core::observe_feed;
use crate::models::feed::{FeedItem, FeedKind};
use anyhow::Result;
use colored::Colorize;
use futures::StreamExt;

/// Print up to `pages` pages of a feed.
pub async fn browse(ctx: &Context, feed: FeedKind, pages: u32, format: &str) -> Result<()> {
    let source = observe_feed(ctx.catalog.clone(), feed.clone());
    let mut stream = source.pages().take(pages.max(1) as usize);

    let mut items: Vec<FeedItem> = Vec::new();
    let mut fetched = 0;
    while let Some(page) = stream.next().await {
        items.extend(page?);
        fetched += 1;
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!(
        "{} {} ({} pages)",
        "Feed:".bold(),
        feed.to_string().cyan(),
        fetched
    );
    println!();

    if items.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    for item in &items {
        println!(
            "  {:<14} {} ({}) [{}]",
            item.key.to_string().dimmed(),
            item.title.bold(),
            year_of(item.date.as_deref()),
            media_status_label(item.status)
        );
    }
    println!();
    println!("{} {}", "Total:".bold(), items.len());

    Ok(())
}
