//! Playlist conversion command.

use std::time::Duration;

use clap::Args;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::convert::{
    Catalog, ConversionError, ConversionPipeline, ConversionReport, ConversionRequest,
    ConversionSettings, StopReason,
};
use crate::error::{Error, Result};

use super::{TokenArgs, client_for};

/// Arguments for `convert`
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Catalog to read the playlist from
    #[arg(long)]
    pub from: Catalog,
    /// Catalog to create the new playlist on
    #[arg(long)]
    pub to: Catalog,
    /// Source playlist ID or share URL
    pub playlist: String,
    /// Name of the playlist to create
    #[arg(short, long)]
    pub name: String,
    #[command(flatten)]
    pub tokens: TokenArgs,
    /// Only convert the first N items
    #[arg(short, long)]
    pub batch_limit: Option<usize>,
    /// Broad queries and top-result matching instead of precise matching
    #[arg(long)]
    pub broad: bool,
    /// Pause between items in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
    /// Stop after this many seconds and report what was done
    #[arg(long)]
    pub deadline_secs: Option<u64>,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ConvertArgs {
    /// Config-derived settings with command-line overrides applied
    fn settings(&self, config: &Config) -> ConversionSettings {
        let mut settings = config.conversion_settings(self.to);
        if self.broad {
            settings.precise = false;
        }
        if let Some(limit) = self.batch_limit {
            settings.batch_limit = Some(limit);
        }
        if let Some(ms) = self.delay_ms {
            settings.item_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = self.deadline_secs {
            settings.deadline = Some(Duration::from_secs(secs));
        }
        settings
    }
}

/// Convert a playlist between catalogs
pub fn cmd_convert(rt: &Runtime, config: &Config, args: &ConvertArgs) -> anyhow::Result<()> {
    if args.from == args.to {
        return Err(Error::invalid_input("--from and --to must be different catalogs").into());
    }

    let request = ConversionRequest {
        source_token: args.tokens.for_catalog(args.from)?,
        destination_token: args.tokens.for_catalog(args.to)?,
        source_playlist: args.playlist.clone(),
        playlist_name: args.name.clone(),
    };
    let settings = args.settings(config);

    let source = client_for(config, args.from);
    let destination = client_for(config, args.to);
    let pipeline = ConversionPipeline::new(&*source, &*destination, settings);

    let report = rt.block_on(async {
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    eprintln!("\nCancelling after the current item...");
                    cancel.cancel();
                }
            }
        });

        if !args.json {
            println!(
                "Converting {} playlist to {} ({} matching)...",
                args.from,
                args.to,
                if pipeline.settings().precise { "precise" } else { "broad" }
            );
        }

        let result = pipeline.run(&request, &cancel).await;
        watcher.abort();
        result
    });

    let report = report.map_err(Error::from)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    check_outcome(&report)?;
    Ok(())
}

/// Fail a run that an expired token cut short, after its partial report is shown
fn check_outcome(report: &ConversionReport) -> Result<()> {
    match report.stop_reason {
        Some(StopReason::AuthExpired) => Err(ConversionError::Auth {
            catalog: report.destination_catalog,
        }
        .into()),
        _ => Ok(()),
    }
}

fn print_report(report: &ConversionReport) {
    println!();
    if report.added > 0 {
        println!("✓ Playlist converted: {}", report.destination_playlist_id);
    } else {
        println!("✗ No tracks were added to {}", report.destination_playlist_id);
    }
    println!();
    println!("  Source items: {}", report.total_source);
    println!("  Processed:    {}", report.processed);
    println!("  Added:        {}", report.added);
    println!("  Skipped:      {}", report.skipped);
    println!("  Quota used:   {}", report.quota_used);
    if let Some(remaining) = report.estimated_remaining_items {
        println!("  Budget left:  ~{} more items", remaining);
    }

    if report.truncated {
        println!();
        match report.stop_reason {
            Some(reason) => println!("⚠ Stopped early: {}", reason),
            None => println!("⚠ Batch limit reached"),
        }
        println!(
            "  {} of {} items not converted; run again with a new playlist to continue",
            report.total_source - report.processed,
            report.total_source
        );
    }

    if !report.skipped_items.is_empty() {
        println!();
        println!("Skipped:");
        for item in &report.skipped_items {
            println!(
                "  #{:<4} {:<40} {}",
                item.position + 1,
                item.title.as_deref().unwrap_or("(untitled)"),
                item.reason
            );
        }
    }
}
