//! Conversion pipeline - drives one playlist conversion from start to report.
//!
//! A run moves through four stages and never goes back:
//! 1. **Init** - validate tokens, playlist identifier, name and budget
//! 2. **PlaylistCreated** - fetch source items, charge and create the destination playlist
//! 3. **Iterating** - normalize, search, rank and append each source item in order
//! 4. **Finalized** - assemble the [`ConversionReport`]
//!
//! Failures in the first two stages are returned as [`ConversionError`].
//! Once iteration has begun every per-item failure degrades to a skip; quota
//! exhaustion, provider quota/permission denial, expired tokens, cancellation
//! and the deadline end the run early with a partial report.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::domain::{
    AccessToken, Catalog, ConversionError, ConversionReport, MatchDecision, ProviderError, SkipReason,
    SkippedItem, SourceItem, Stage, StopReason,
};
use super::normalize::{NormalizedQuery, QueryNormalizer, QueryStrategy};
use super::quota::{OperationKind, QuotaLedger, QuotaSettings};
use super::ranker;
use super::traits::ProviderClient;

/// Tunables for a conversion run
#[derive(Debug, Clone)]
pub struct ConversionSettings {
    /// Quoted queries plus authoritative-upload ranking, instead of broad queries and the top hit
    pub precise: bool,
    /// Only convert the first N source items
    pub batch_limit: Option<usize>,
    /// Pause between items, to stay under provider requests-per-second limits
    pub item_delay: Duration,
    /// Stop iterating once this much time has passed since the run started
    pub deadline: Option<Duration>,
    /// Extra words appended to broad queries
    pub broad_qualifier: String,
    pub max_results_precise: u32,
    pub max_results_broad: u32,
    /// Destination provider budget
    pub quota: QuotaSettings,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            precise: true,
            batch_limit: None,
            item_delay: Duration::from_millis(500),
            deadline: None,
            broad_qualifier: "official audio".to_string(),
            max_results_precise: 3,
            max_results_broad: 1,
            quota: QuotaSettings::default(),
        }
    }
}

/// Caller input for one run
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source_token: AccessToken,
    pub destination_token: AccessToken,
    /// Source playlist ID or share URL
    pub source_playlist: String,
    /// Name of the playlist to create on the destination
    pub playlist_name: String,
}

/// Converts one playlist between two catalogs
pub struct ConversionPipeline<'a> {
    source: &'a dyn ProviderClient,
    destination: &'a dyn ProviderClient,
    normalizer: QueryNormalizer,
    settings: ConversionSettings,
}

/// Mutable state owned by a single run
struct RunContext {
    ledger: QuotaLedger,
    processed: usize,
    added: usize,
    skipped_items: Vec<SkippedItem>,
    stop_reason: Option<StopReason>,
}

impl RunContext {
    fn record(&mut self, position: usize, item: &SourceItem, decision: MatchDecision) {
        self.processed += 1;
        match decision {
            MatchDecision::Accepted { .. } => self.added += 1,
            MatchDecision::Skipped { reason } => self.skipped_items.push(SkippedItem {
                position,
                title: item.title.clone(),
                reason,
            }),
        }
    }
}

/// Result of matching one item against the destination
enum Step {
    /// Item decided, continue with the next one
    Next(MatchDecision),
    /// Item decided, then stop
    Last(MatchDecision, StopReason),
    /// Stop without deciding this item
    Halt(StopReason),
}

impl<'a> ConversionPipeline<'a> {
    pub fn new(
        source: &'a dyn ProviderClient,
        destination: &'a dyn ProviderClient,
        settings: ConversionSettings,
    ) -> Self {
        let strategy = if settings.precise {
            QueryStrategy::Precise
        } else {
            QueryStrategy::broad(settings.broad_qualifier.clone())
        };
        Self {
            source,
            destination,
            normalizer: QueryNormalizer::new(strategy),
            settings,
        }
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Run the conversion.
    ///
    /// `cancel` is checked before every item and interrupts the inter-item delay.
    pub async fn run(
        &self,
        request: &ConversionRequest,
        cancel: &CancellationToken,
    ) -> Result<ConversionReport, ConversionError> {
        // Init
        let source_playlist_id = self.validate(request)?;
        let started_at = chrono::Utc::now().to_rfc3339();
        let started = Instant::now();
        let source_catalog = self.source.catalog();
        let destination_catalog = self.destination.catalog();

        // PlaylistCreated
        tracing::info!("Fetching {} playlist: {}", source_catalog, source_playlist_id);
        let items = self
            .source
            .fetch_playlist_items(&source_playlist_id, &request.source_token)
            .await
            .map_err(|e| fatal(source_catalog, Stage::FetchSource, e))?;

        let total_source = items.len();
        let working = match self.settings.batch_limit {
            Some(limit) => &items[..limit.min(total_source)],
            None => &items[..],
        };
        tracing::info!(
            "Found {} items, processing {} (batch limit: {:?})",
            total_source,
            working.len(),
            self.settings.batch_limit
        );

        let mut ctx = RunContext {
            ledger: QuotaLedger::new(&self.settings.quota),
            processed: 0,
            added: 0,
            skipped_items: Vec::new(),
            stop_reason: None,
        };
        ctx.ledger.charge(OperationKind::CreatePlaylist)?;

        let description = format!(
            "Converted from {} ({}/{} tracks)",
            source_catalog,
            working.len(),
            total_source
        );
        let playlist_id = self
            .destination
            .create_playlist(&request.playlist_name, &description, &request.destination_token)
            .await
            .map_err(|e| fatal(destination_catalog, Stage::CreatePlaylist, e))?;
        tracing::info!("Created {} playlist: {}", destination_catalog, playlist_id);

        // Iterating
        let deadline = self.settings.deadline.map(|d| started + d);
        for (position, item) in working.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!("Conversion cancelled after {} items", ctx.processed);
                ctx.stop_reason = Some(StopReason::Cancelled);
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::warn!("Conversion deadline reached after {} items", ctx.processed);
                ctx.stop_reason = Some(StopReason::DeadlineExceeded);
                break;
            }

            let Some(query) = self.normalizer.normalize(item) else {
                tracing::info!(
                    "Skipping item {}/{}: missing title or artist",
                    position + 1,
                    working.len()
                );
                ctx.record(
                    position,
                    item,
                    MatchDecision::Skipped {
                        reason: SkipReason::NoResults,
                    },
                );
                continue;
            };

            tracing::info!("Processing {}/{}: {}", position + 1, working.len(), query.text());
            match self
                .match_and_append(&mut ctx, item, &query, &playlist_id, request)
                .await
            {
                Step::Next(decision) => ctx.record(position, item, decision),
                Step::Last(decision, reason) => {
                    ctx.record(position, item, decision);
                    ctx.stop_reason = Some(reason);
                    break;
                }
                Step::Halt(reason) => {
                    ctx.stop_reason = Some(reason);
                    break;
                }
            }

            if position + 1 < working.len() && !self.settings.item_delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.settings.item_delay) => {}
                }
            }
        }

        // Finalized
        let truncated = working.len() < total_source || ctx.stop_reason.is_some();
        let report = ConversionReport {
            source_catalog,
            destination_catalog,
            total_source,
            processed: ctx.processed,
            added: ctx.added,
            skipped: ctx.skipped_items.len(),
            quota_used: ctx.ledger.spent(),
            destination_playlist_id: playlist_id,
            truncated,
            stop_reason: ctx.stop_reason,
            precise: self.settings.precise,
            estimated_remaining_items: ctx
                .ledger
                .estimated_capacity(&[OperationKind::Search, OperationKind::AppendItem]),
            skipped_items: ctx.skipped_items,
            started_at,
            finished_at: chrono::Utc::now().to_rfc3339(),
        };

        tracing::info!(
            "Conversion finished: {} added, {} skipped, {} quota used{}",
            report.added,
            report.skipped,
            report.quota_used,
            if report.truncated { " (truncated)" } else { "" }
        );
        Ok(report)
    }

    /// Check required inputs and extract the source playlist ID
    fn validate(&self, request: &ConversionRequest) -> Result<String, ConversionError> {
        if request.source_token.is_blank() {
            return Err(ConversionError::Precondition(format!(
                "{} access token is required",
                self.source.catalog()
            )));
        }
        if request.destination_token.is_blank() {
            return Err(ConversionError::Precondition(format!(
                "{} access token is required",
                self.destination.catalog()
            )));
        }
        if request.source_playlist.trim().is_empty() {
            return Err(ConversionError::Precondition(
                "source playlist ID or URL is required".to_string(),
            ));
        }
        if request.playlist_name.trim().is_empty() {
            return Err(ConversionError::Precondition(
                "new playlist name is required".to_string(),
            ));
        }
        if self.settings.quota.daily_budget == 0 {
            return Err(ConversionError::Precondition(
                "quota budget must be greater than zero".to_string(),
            ));
        }

        Ok(self
            .source
            .catalog()
            .extract_playlist_id(&request.source_playlist)?)
    }

    /// Search, rank and append a single item
    async fn match_and_append(
        &self,
        ctx: &mut RunContext,
        item: &SourceItem,
        query: &NormalizedQuery,
        playlist_id: &str,
        request: &ConversionRequest,
    ) -> Step {
        if let Err(e) = ctx.ledger.charge(OperationKind::Search) {
            tracing::warn!("Stopping before search, quota budget reached: {}", e);
            return Step::Halt(StopReason::QuotaBudget);
        }

        let max_results = if self.settings.precise {
            self.settings.max_results_precise
        } else {
            self.settings.max_results_broad
        };

        let candidates = match self
            .destination
            .search_catalog(query.text(), &request.destination_token, max_results)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => return self.provider_failure("search", query, e),
        };

        if candidates.is_empty() {
            tracing::info!("✗ No results for: {}", query.text());
            return Step::Next(MatchDecision::Skipped {
                reason: SkipReason::NoResults,
            });
        }

        let Some(chosen) = ranker::select(item, &candidates, self.settings.precise) else {
            tracing::info!("✗ No usable candidate for: {}", query.text());
            return Step::Next(MatchDecision::Skipped {
                reason: SkipReason::NoQualifyingCandidate,
            });
        };

        if ctx.ledger.would_exceed(OperationKind::AppendItem) {
            tracing::warn!(
                "Quota budget reached after {} units, not adding: {}",
                ctx.ledger.spent(),
                query.text()
            );
            return Step::Last(
                MatchDecision::Skipped {
                    reason: SkipReason::QuotaExhausted,
                },
                StopReason::QuotaBudget,
            );
        }

        if let Err(e) = self
            .destination
            .append_item(playlist_id, &chosen.id, &request.destination_token)
            .await
        {
            return self.provider_failure("append", query, e);
        }

        if let Err(e) = ctx.ledger.charge(OperationKind::AppendItem) {
            tracing::warn!("Append succeeded but could not be charged: {}", e);
        }
        tracing::info!(
            "✓ Added: {} by {} -> {} ({} quota used)",
            query.title(),
            query.artist(),
            chosen.title,
            ctx.ledger.spent()
        );
        Step::Next(MatchDecision::Accepted {
            candidate_id: chosen.id.clone(),
        })
    }

    /// Classify a per-item provider failure
    fn provider_failure(&self, action: &str, query: &NormalizedQuery, error: ProviderError) -> Step {
        let skipped = MatchDecision::Skipped {
            reason: SkipReason::ProviderError,
        };

        if error.is_auth() {
            tracing::error!(
                "{} token rejected during {}, stopping: {}",
                self.destination.catalog(),
                action,
                error
            );
            return Step::Last(skipped, StopReason::AuthExpired);
        }
        if error.is_quota_denial() {
            tracing::warn!(
                "⚠ {} refused {} ({}), stopping conversion",
                self.destination.catalog(),
                action,
                error
            );
            return Step::Last(skipped, StopReason::ProviderQuota);
        }

        tracing::info!("✗ Could not {} track: {} - {}", action, query.text(), error);
        Step::Next(skipped)
    }
}

/// Map a failure before iteration to a run error
fn fatal(catalog: Catalog, stage: Stage, error: ProviderError) -> ConversionError {
    if error.is_auth() {
        return ConversionError::Auth { catalog };
    }
    ConversionError::Provider {
        catalog,
        stage,
        source: error,
    }
}
