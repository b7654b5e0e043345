//! HTTP clients for the streaming catalogs.
//!
//! Each provider follows the same layout:
//! - `dto.rs` - Exact API response shapes
//! - `adapter.rs` - Converts DTOs to `convert::domain` types
//! - `client.rs` - reqwest client implementing `ProviderClient`

pub mod rate_limit;
pub mod spotify;
pub mod youtube;

use std::time::Duration;

pub use rate_limit::RateLimiter;
pub use spotify::SpotifyClient;
pub use youtube::{QuotaStatus, YouTubeClient};

/// User agent sent with every API request
pub const USER_AGENT: &str = concat!("PlaylistPorter/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client")
}
