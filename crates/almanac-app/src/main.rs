use std::io::Read;

use almanac_core::config::load_config;
use almanac_rfc::rfc::ical::core::Occurrence;
use almanac_service::service::FeedService;
use almanac_service::window::Window;
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

/// Expand an iCalendar feed into the occurrences around a reference instant.
#[derive(Parser, Debug)]
#[command(name = "almanac")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Feed file to read, or `-` for stdin
    feed: String,

    /// Reference instant (`2024-02-12T08:00:00` or `2024-02-12`); defaults to now
    #[arg(long, value_parser = parse_instant)]
    at: Option<NaiveDateTime>,
}

/// Accepts a wall-clock date-time or a bare date (taken at midnight).
fn parse_instant(raw: &str) -> Result<NaiveDateTime, String> {
    raw.parse::<NaiveDateTime>()
        .or_else(|_| raw.parse::<NaiveDate>().map(|date| date.and_time(chrono::NaiveTime::MIN)))
        .map_err(|e| format!("invalid reference instant {raw:?}: {e}"))
}

#[derive(Debug, Serialize)]
struct Report {
    window: Window,
    occurrences: Vec<Occurrence>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let source = cli.feed;
    let now = cli.at.unwrap_or_else(|| chrono::Local::now().naive_local());

    let text = read_feed(&source)?;
    let service = FeedService::new(&config)?;
    let window = service.window_at(now)?;
    let occurrences = service.occurrences_in(&source, &text, window);

    tracing::info!(feed = %source, count = occurrences.len(), "Feed expanded");

    let report = Report {
        window,
        occurrences,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn read_feed(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read feed from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(source).with_context(|| format!("failed to read feed {source}"))
}
