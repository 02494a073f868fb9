//! Request commands: list, submit, cancel and flush.

use super::request_status_label;
use crate::cli::context::Context;
use crate::core::{LoadOutcome, RequestListSync, RequestService, SubmitOutcome};
use crate::models::request::{RequestId, RequestSubmission, TrackedRequest};
use anyhow::Result;
use colored::Colorize;

/// List the user's requests, including ones queued while offline.
pub async fn list(ctx: &Context, pages: u32, format: &str) -> Result<()> {
    let sync = RequestListSync::new(ctx.catalog.clone(), ctx.cache.clone(), &ctx.config.paging);

    sync.refresh().await?;
    for _ in 1..pages.max(1) {
        if sync.load_more().await? == LoadOutcome::Skipped {
            break;
        }
    }

    let snapshot = sync.snapshot().await;
    let queued: Vec<TrackedRequest> = ctx
        .cache
        .list_tracked_requests()
        .await?
        .into_iter()
        .filter(|r| r.offline_queued)
        .collect();

    if format == "json" {
        let mut all = queued;
        all.extend(snapshot.items);
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    if !queued.is_empty() {
        println!("{}", "Queued (offline)".bold().yellow());
        for request in &queued {
            print_request(request);
        }
        println!();
    }

    if snapshot.items.is_empty() {
        println!("No requests found.");
    } else {
        println!("{}", "Requests".bold().green());
        for request in &snapshot.items {
            print_request(request);
        }
    }

    println!();
    println!(
        "{} {} (page {}{})",
        "Loaded:".bold(),
        snapshot.items.len(),
        snapshot.current_page,
        if snapshot.is_last_page { ", end of list" } else { "" }
    );

    Ok(())
}

/// Submit a request.
pub async fn submit(ctx: &Context, submission: RequestSubmission) -> Result<()> {
    let service = RequestService::new(ctx.catalog.clone(), ctx.cache.clone());

    match service.submit(submission).await? {
        SubmitOutcome::Submitted(request) => {
            println!(
                "{} {} (request {})",
                "Requested".green().bold(),
                request.display_title(),
                request.id
            );
        }
        SubmitOutcome::Queued(request) => {
            println!(
                "{} {}",
                "Server unreachable, queued".yellow().bold(),
                request.display_title()
            );
            println!("  {} run `seerr-sync flush` once back online", "->".yellow());
        }
    }

    Ok(())
}

/// Cancel a request by id.
pub async fn cancel(ctx: &Context, request_id: &str) -> Result<()> {
    let id: RequestId = request_id.parse()?;
    let service = RequestService::new(ctx.catalog.clone(), ctx.cache.clone());

    service.cancel(id).await?;
    println!("{} request {}", "Cancelled".green().bold(), id);

    Ok(())
}

/// Resubmit queued requests.
pub async fn flush(ctx: &Context) -> Result<()> {
    let service = RequestService::new(ctx.catalog.clone(), ctx.cache.clone());
    let report = service.flush_offline_queue().await?;

    if report.is_empty() {
        println!("Offline queue is empty.");
        return Ok(());
    }

    for request in &report.submitted {
        println!(
            "  {} {} (request {})",
            "[OK]".green(),
            request.display_title(),
            request.id
        );
    }
    for (key, reason) in &report.dropped {
        println!("  {} {}: {}", "[DROPPED]".red(), key, reason);
    }
    for key in &report.kept {
        println!("  {} {}", "[KEPT]".yellow(), key);
    }

    println!();
    println!(
        "{} {} submitted, {} dropped, {} still queued",
        "Summary:".bold(),
        report.submitted.len(),
        report.dropped.len(),
        report.kept.len()
    );

    Ok(())
}

fn print_request(request: &TrackedRequest) {
    let seasons = request
        .seasons
        .as_ref()
        .map(|s| format!(" [{}]", s))
        .unwrap_or_default();
    println!(
        "  {:<20} {}{} - {} ({})",
        request.id.to_string().dimmed(),
        request.display_title().bold(),
        seasons,
        request_status_label(request.status),
        request.created_at.format("%Y-%m-%d")
    );
}
