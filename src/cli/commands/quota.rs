//! YouTube quota probe.

use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::convert::Catalog;
use crate::convert::quota::{OperationKind, QuotaLedger};
use crate::error::ResultExt;
use crate::providers::{QuotaStatus, RateLimiter, YouTubeClient};

use super::TokenArgs;

/// What `quota --json` prints
#[derive(Debug, Serialize)]
struct QuotaSummary {
    #[serde(flatten)]
    status: QuotaStatus,
    daily_budget: u64,
    /// Songs a fresh day's budget can convert (search + add each)
    max_songs_per_day: Option<u64>,
}

/// Probe YouTube quota and print the daily conversion capacity
pub fn cmd_quota(
    rt: &Runtime,
    config: &Config,
    tokens: &TokenArgs,
    json: bool,
) -> anyhow::Result<()> {
    let token = tokens.for_catalog(Catalog::YouTube)?;
    let settings = config.provider_settings(Catalog::YouTube);
    let client = YouTubeClient::with_base_url(settings.base_url)
        .with_rate_limiter(Arc::new(RateLimiter::new(settings.min_request_interval)));

    let status = rt
        .block_on(client.probe_quota(&token))
        .with_context("probing YouTube quota")?;

    let ledger = QuotaLedger::new(&settings.quota);
    let summary = QuotaSummary {
        status,
        daily_budget: settings.quota.daily_budget,
        max_songs_per_day: daily_capacity(&ledger),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    match &summary.status {
        QuotaStatus::Available => println!("✓ YouTube quota available"),
        QuotaStatus::Exceeded { message } => {
            println!("✗ YouTube quota exceeded: {}", message);
            println!("  Quota resets at midnight Pacific Time.");
        }
        QuotaStatus::AccessDenied { message } => {
            println!("✗ YouTube access denied: {}", message);
            println!("  Check the token's scopes and that the YouTube Data API is enabled.");
        }
    }
    println!("  Daily budget: {} units", summary.daily_budget);
    if let Some(songs) = summary.max_songs_per_day {
        println!("  A full day's budget converts about {} songs", songs);
    }
    Ok(())
}

/// Songs a fresh ledger can convert after creating one playlist
fn daily_capacity(ledger: &QuotaLedger) -> Option<u64> {
    let mut ledger = ledger.clone();
    if ledger.charge(OperationKind::CreatePlaylist).is_err() {
        return Some(0);
    }
    ledger.estimated_capacity(&[OperationKind::Search, OperationKind::AppendItem])
}
