//! Playlist conversion core - moves a playlist from one streaming catalog to another.
//!
//! # Architecture
//!
//! The core never talks HTTP. It is split into:
//! - **Domain models** (`domain.rs`) - Items, candidates, decisions, reports and errors
//! - **Identifier** (`identifier.rs`) - Playlist ID extraction from IDs and share URLs
//! - **Normalizer** (`normalize.rs`) - Builds search queries from noisy source metadata
//! - **Ranker** (`ranker.rs`) - Picks one search result per source item
//! - **Quota** (`quota.rs`) - Per-run cost ledger against a provider budget
//! - **Traits** (`traits.rs`) - The `ProviderClient` seam implemented in `crate::providers`
//! - **Pipeline** (`pipeline.rs`) - Orchestrates a run and produces the report
//!
//! # Usage
//!
//! ```ignore
//! use convert::{ConversionPipeline, ConversionRequest, ConversionSettings};
//!
//! let pipeline = ConversionPipeline::new(&spotify, &youtube, ConversionSettings::default());
//! let report = pipeline.run(&request, &CancellationToken::new()).await?;
//! println!("{} of {} added", report.added, report.total_source);
//! ```

pub mod domain;
pub mod identifier;
pub mod normalize;
pub mod pipeline;
pub mod quota;
pub mod ranker;
pub mod traits;

pub use domain::{
    AccessToken, Catalog, ConversionError, ConversionReport, PlaylistSummary, ProviderError,
    SearchCandidate, SkipReason, SourceItem, StopReason,
};
pub use pipeline::{ConversionPipeline, ConversionRequest, ConversionSettings};
pub use quota::{CostTable, QuotaSettings};
pub use traits::ProviderClient;
