//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `convert`: Playlist conversion between catalogs
//! - `playlists`: List the authenticated user's playlists
//! - `quota`: YouTube quota probe and daily capacity estimate
//! - `settings`: Show, locate and initialize the config file

mod convert;
mod playlists;
mod quota;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::convert::{AccessToken, Catalog, ProviderClient};
use crate::error::{Error, Result};
use crate::providers::{RateLimiter, SpotifyClient, YouTubeClient};

pub use convert::{ConvertArgs, cmd_convert};
pub use playlists::cmd_playlists;
pub use quota::cmd_quota;
pub use settings::{ConfigAction, cmd_config};

/// Playlist Porter CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a playlist from one catalog to another
    Convert(ConvertArgs),
    /// List your playlists on a catalog
    Playlists {
        /// Catalog to list
        catalog: Catalog,
        #[command(flatten)]
        tokens: TokenArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check remaining YouTube quota
    Quota {
        #[command(flatten)]
        tokens: TokenArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// OAuth access tokens for both catalogs
#[derive(Args, Debug, Clone, Default)]
pub struct TokenArgs {
    /// Spotify access token (or set SPOTIFY_ACCESS_TOKEN env var)
    #[arg(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub spotify_token: Option<String>,
    /// YouTube access token (or set YOUTUBE_ACCESS_TOKEN env var)
    #[arg(long, env = "YOUTUBE_ACCESS_TOKEN", hide_env_values = true)]
    pub youtube_token: Option<String>,
}

impl TokenArgs {
    /// Token for `catalog`, or an error naming the flag and env var to set
    pub fn for_catalog(&self, catalog: Catalog) -> Result<AccessToken> {
        let (token, flag, env) = match catalog {
            Catalog::Spotify => (&self.spotify_token, "--spotify-token", "SPOTIFY_ACCESS_TOKEN"),
            Catalog::YouTube => (&self.youtube_token, "--youtube-token", "YOUTUBE_ACCESS_TOKEN"),
        };

        token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(AccessToken::new)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "{} access token required: use {} or set {}",
                    catalog, flag, env
                ))
            })
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };

    match &cli.command {
        Commands::Convert(args) => cmd_convert(&rt, &config, args),
        Commands::Playlists {
            catalog,
            tokens,
            json,
        } => cmd_playlists(&rt, &config, *catalog, tokens, *json),
        Commands::Quota { tokens, json } => cmd_quota(&rt, &config, tokens, *json),
        Commands::Config { action } => cmd_config(&config, cli.config.as_deref(), action),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Build the client for `catalog` from the resolved provider settings
pub(crate) fn client_for(config: &Config, catalog: Catalog) -> Box<dyn ProviderClient> {
    let settings = config.provider_settings(catalog);
    let limiter = Arc::new(RateLimiter::new(settings.min_request_interval));

    match catalog {
        Catalog::Spotify => Box::new(
            SpotifyClient::with_base_url(settings.base_url).with_rate_limiter(limiter),
        ),
        Catalog::YouTube => Box::new(
            YouTubeClient::with_base_url(settings.base_url).with_rate_limiter(limiter),
        ),
    }
}
