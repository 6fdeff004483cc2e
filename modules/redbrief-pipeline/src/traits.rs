// Trait abstractions for the pipeline's four external boundaries.
//
// FeedSource wraps the Reddit listing call, Annotate wraps the scoring
// service, DedupeLedger and RecordStore wrap the two Postgres tables.
// These enable deterministic testing with the in-memory mocks in
// `testing.rs`: no network, no database.

use async_trait::async_trait;

use redbrief_common::{Annotation, DigestEntry, PipelineError, Result};
use reddit_client::{RedditClient, RedditPost};

/// Read-only feed boundary. Returns up to `limit` newest posts in the
/// reverse-chronological order the source provides.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn newest(&self, subreddit: &str, limit: u32) -> Result<Vec<RedditPost>>;
}

#[async_trait]
impl FeedSource for RedditClient {
    async fn newest(&self, subreddit: &str, limit: u32) -> Result<Vec<RedditPost>> {
        RedditClient::newest(self, subreddit, limit)
            .await
            .map_err(|e| PipelineError::Feed(e.to_string()))
    }
}

/// Score and summarize one item's combined text.
#[async_trait]
pub trait Annotate: Send + Sync {
    async fn annotate(&self, content: &str) -> Result<Annotation>;
}

/// The durable set of item ids already annotated.
#[async_trait]
pub trait DedupeLedger: Send + Sync {
    /// Ensure the backing table exists. Idempotent; called every run.
    async fn initialize(&self) -> Result<()>;

    async fn has_processed(&self, item_id: &str) -> Result<bool>;

    /// Insert a marker. Fails with `PipelineError::DuplicateKey` if the id
    /// is already present; callers check `has_processed` first, so a
    /// duplicate here is a logic defect and must surface.
    async fn mark_processed(&self, item_id: &str) -> Result<()>;
}

/// Append-only digest row storage.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Ensure the backing table exists. Idempotent; called every run.
    async fn initialize(&self) -> Result<()>;

    /// Insert exactly one row, commit-or-rollback as a unit.
    async fn append(&self, entry: &DigestEntry) -> Result<()>;
}
