//! YouTube Data API v3 integration
//!
//! Reads playlist items, searches music videos and writes private playlists
//! on the token's channel.
//!
//! API docs: https://developers.google.com/youtube/v3/docs

pub mod dto;
mod adapter;
mod client;

pub use client::{DEFAULT_BASE_URL, QuotaStatus, YouTubeClient};
