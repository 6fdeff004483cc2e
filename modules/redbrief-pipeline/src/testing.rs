// Test mocks for the pipeline's four trait boundaries.
//
// - MockFeed (FeedSource) — fixed post list
// - ScriptedAnnotator (Annotate) — keyed replies, records what it was asked
// - MemoryLedger (DedupeLedger) — HashSet-backed, duplicate-checking
// - MemoryStore (RecordStore) — Vec-backed
//
// No network, no database. `cargo test` in seconds.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use redbrief_common::{Annotation, DigestEntry, PipelineError, Result};
use reddit_client::RedditPost;

use crate::traits::{Annotate, DedupeLedger, FeedSource, RecordStore};

/// Default epoch for mock posts: 2023-11-14 22:13:20 UTC.
pub const TEST_EPOCH: f64 = 1_700_000_000.0;

/// Build a listing post the way Reddit would return it.
pub fn make_post(id: &str, title: &str, body: &str, flair: Option<&str>) -> RedditPost {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    RedditPost {
        id: id.to_string(),
        title: title.to_string(),
        selftext: body.to_string(),
        created_utc: TEST_EPOCH,
        author: Some("test_author".to_string()),
        permalink: format!("/r/LocalLlama/comments/{id}/{slug}/"),
        link_flair_text: flair.map(|f| f.to_string()),
    }
}

// ---------------------------------------------------------------------------
// MockFeed
// ---------------------------------------------------------------------------

/// Fixed-list feed source. Honors `limit` the way the listing endpoint does.
pub struct MockFeed {
    posts: Vec<RedditPost>,
}

impl MockFeed {
    pub fn new(posts: Vec<RedditPost>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl FeedSource for MockFeed {
    async fn newest(&self, _subreddit: &str, limit: u32) -> Result<Vec<RedditPost>> {
        Ok(self.posts.iter().take(limit as usize).cloned().collect())
    }
}

/// Feed source whose listing call always fails, for fatal-path tests.
pub struct FailingFeed;

#[async_trait]
impl FeedSource for FailingFeed {
    async fn newest(&self, _subreddit: &str, _limit: u32) -> Result<Vec<RedditPost>> {
        Err(PipelineError::Feed("listing fetch failed".to_string()))
    }
}

// ---------------------------------------------------------------------------
// ScriptedAnnotator
// ---------------------------------------------------------------------------

pub enum Reply {
    Score(f64, &'static str),
    Malformed(&'static str),
    Remote,
}

/// Substring-keyed annotator. Unscripted content gets a Remote error, so a
/// candidate that should never reach the annotator aborts the test run
/// loudly instead of passing silently.
pub struct ScriptedAnnotator {
    replies: Vec<(String, Reply)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedAnnotator {
    pub fn new() -> Self {
        Self {
            replies: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Register a reply for any content containing `key`.
    pub fn on(mut self, key: &str, reply: Reply) -> Self {
        self.replies.push((key.to_string(), reply));
        self
    }

    /// The contents this annotator was asked to score, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for ScriptedAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Annotate for ScriptedAnnotator {
    async fn annotate(&self, content: &str) -> Result<Annotation> {
        self.calls.lock().unwrap().push(content.to_string());

        for (key, reply) in &self.replies {
            if content.contains(key.as_str()) {
                return match reply {
                    Reply::Score(score, summary) => Ok(Annotation {
                        score: *score,
                        summary: (*summary).to_string(),
                    }),
                    Reply::Malformed(raw) => Err(PipelineError::MalformedResponse {
                        raw: (*raw).to_string(),
                    }),
                    Reply::Remote => {
                        Err(PipelineError::Remote("connection refused".to_string()))
                    }
                };
            }
        }

        Err(PipelineError::Remote(format!(
            "unscripted annotation request: {content}"
        )))
    }
}

// ---------------------------------------------------------------------------
// MemoryLedger
// ---------------------------------------------------------------------------

/// In-memory dedupe ledger with the same duplicate semantics as Postgres:
/// marking an already-present id is an error, not a no-op.
pub struct MemoryLedger {
    ids: Mutex<HashSet<String>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            ids: Mutex::new(HashSet::new()),
        }
    }

    /// Pre-populate an id, as if a previous run had processed it.
    pub fn seed(&self, item_id: &str) {
        self.ids.lock().unwrap().insert(item_id.to_string());
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.ids.lock().unwrap().contains(item_id)
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DedupeLedger for MemoryLedger {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn has_processed(&self, item_id: &str) -> Result<bool> {
        Ok(self.contains(item_id))
    }

    async fn mark_processed(&self, item_id: &str) -> Result<()> {
        let mut ids = self.ids.lock().unwrap();
        if !ids.insert(item_id.to_string()) {
            return Err(PipelineError::DuplicateKey(item_id.to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

pub struct MemoryStore {
    entries: Mutex<Vec<DigestEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<DigestEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn append(&self, entry: &DigestEntry) -> Result<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}
