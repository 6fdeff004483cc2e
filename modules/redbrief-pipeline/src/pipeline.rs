use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use redbrief_common::{format_timestamp, DigestEntry, PipelineError, Result};

use crate::fetcher::CandidateFetcher;
use crate::traits::{Annotate, DedupeLedger, RecordStore};

/// Counters for one pipeline pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Candidates that survived dedup and flair filtering.
    pub fetched: usize,
    /// Candidates annotated, marked processed, and stored.
    pub annotated: usize,
    /// Candidates dropped because the annotation reply was unparseable.
    pub skipped_malformed: usize,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} candidates, {} annotated, {} skipped (malformed reply)",
            self.fetched, self.annotated, self.skipped_malformed
        )
    }
}

/// One sequential pass: fetch, then annotate/mark/store per candidate.
/// Invocation cadence is the scheduler's concern, not ours.
pub struct Pipeline {
    fetcher: CandidateFetcher,
    annotator: Arc<dyn Annotate>,
    ledger: Arc<dyn DedupeLedger>,
    store: Arc<dyn RecordStore>,
    subreddit: String,
    fetch_limit: u32,
}

impl Pipeline {
    pub fn new(
        fetcher: CandidateFetcher,
        annotator: Arc<dyn Annotate>,
        ledger: Arc<dyn DedupeLedger>,
        store: Arc<dyn RecordStore>,
        subreddit: impl Into<String>,
        fetch_limit: u32,
    ) -> Self {
        Self {
            fetcher,
            annotator,
            ledger,
            store,
            subreddit: subreddit.into(),
            fetch_limit,
        }
    }

    pub async fn run(&self) -> Result<RunStats> {
        self.ledger.initialize().await?;
        self.store.initialize().await?;

        let candidates = self
            .fetcher
            .fetch(self.ledger.as_ref(), &self.subreddit, self.fetch_limit)
            .await?;

        let mut stats = RunStats {
            fetched: candidates.len(),
            ..RunStats::default()
        };

        for candidate in &candidates {
            let annotation = match self.annotator.annotate(&candidate.combined_text).await {
                Ok(annotation) => annotation,
                Err(PipelineError::MalformedResponse { raw }) => {
                    // Not marked processed: the item retries naturally on
                    // the next run. Raw payload logged for diagnosis.
                    warn!(
                        id = candidate.id.as_str(),
                        raw = raw.as_str(),
                        "Unparseable annotation reply, skipping item"
                    );
                    stats.skipped_malformed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            // Ledger mark strictly precedes the digest append. A crash
            // between the two leaves the item marked-but-not-recorded;
            // accepted gap, there is no transaction across the two tables.
            self.ledger.mark_processed(&candidate.id).await?;
            self.store
                .append(&DigestEntry::from_annotation(candidate, &annotation))
                .await?;

            stats.annotated += 1;
            info!(
                id = candidate.id.as_str(),
                score = annotation.score,
                created_at = format_timestamp(candidate.created_at).as_str(),
                "Stored digest entry"
            );
        }

        info!(%stats, "Pipeline pass complete");
        Ok(stats)
    }
}
