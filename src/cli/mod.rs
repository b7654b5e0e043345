//! Command-line interface for playlist-porter.
//!
//! This module provides CLI commands for converting playlists between
//! catalogs, listing playlists, probing quota and managing the config file.

mod commands;

pub use commands::{Cli, Commands, run_command};
