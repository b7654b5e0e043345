//! Spotify Web API integration
//!
//! Reads playlist tracks, searches the track catalog and writes playlists
//! owned by the token's user.
//!
//! API docs: https://developer.spotify.com/documentation/web-api

pub mod dto;
mod adapter;
mod client;

pub use client::{DEFAULT_BASE_URL, SpotifyClient};
