//! Playlist Porter - converts playlists between Spotify and YouTube.
//!
//! Reads a playlist from one catalog, searches each entry on the other and
//! builds a new playlist there, staying inside the destination's request
//! quota. Everything runs from CLI subcommands.

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod providers;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("playlist_porter=info".parse()?))
        .init();

    cli::run_command(&args)
}
