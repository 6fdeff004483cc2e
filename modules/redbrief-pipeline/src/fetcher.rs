use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info};

use redbrief_common::{Candidate, PipelineError, Result};
use reddit_client::RedditPost;

use crate::traits::{DedupeLedger, FeedSource};

const REDDIT_URL: &str = "https://www.reddit.com";

/// Fetches the newest posts, drops already-processed and excluded-flair
/// posts, and normalizes the survivors into annotation candidates.
pub struct CandidateFetcher {
    source: Arc<dyn FeedSource>,
    excluded_flairs: Vec<String>,
    tz_offset: FixedOffset,
}

impl std::fmt::Debug for CandidateFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateFetcher")
            .field("excluded_flairs", &self.excluded_flairs)
            .field("tz_offset", &self.tz_offset)
            .finish_non_exhaustive()
    }
}

impl CandidateFetcher {
    pub fn new(
        source: Arc<dyn FeedSource>,
        excluded_flairs: Vec<String>,
        tz_offset_hours: i32,
    ) -> Result<Self> {
        let tz_offset = tz_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                PipelineError::Config(format!("invalid timezone offset: {tz_offset_hours}h"))
            })?;
        Ok(Self {
            source,
            excluded_flairs,
            tz_offset,
        })
    }

    /// One fresh pass over the listing. Not restartable mid-fetch; a new
    /// call re-queries the source.
    pub async fn fetch(
        &self,
        ledger: &dyn DedupeLedger,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<Candidate>> {
        let posts = self.source.newest(subreddit, limit).await?;
        let total = posts.len();

        let mut candidates = Vec::new();
        for post in posts {
            if ledger.has_processed(&post.id).await? {
                debug!(id = post.id.as_str(), "Already processed, skipping");
                continue;
            }

            if let Some(flair) = &post.link_flair_text {
                if self.excluded_flairs.iter().any(|f| f == flair) {
                    debug!(
                        id = post.id.as_str(),
                        flair = flair.as_str(),
                        "Excluded flair, skipping"
                    );
                    continue;
                }
            }

            candidates.push(self.normalize(post)?);
        }

        info!(
            subreddit,
            fetched = total,
            candidates = candidates.len(),
            "Candidates after dedup and flair filtering"
        );
        Ok(candidates)
    }

    fn normalize(&self, post: RedditPost) -> Result<Candidate> {
        let created = DateTime::from_timestamp(post.created_utc as i64, 0).ok_or_else(|| {
            PipelineError::Feed(format!("post {} has an out-of-range timestamp", post.id))
        })?;
        // Shift to the configured fixed offset; stored without zone.
        let created_at = created.with_timezone(&self.tz_offset).naive_local();

        let combined_text = format!("{}\n\n{}", post.title, post.selftext);
        let source_url = format!("{REDDIT_URL}{}", post.permalink);

        Ok(Candidate {
            id: post.id,
            title: post.title,
            body: post.selftext,
            combined_text,
            created_at,
            author: post.author,
            source_url,
            flair: post.link_flair_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redbrief_common::format_timestamp;

    use crate::testing::{make_post, MemoryLedger, MockFeed};

    fn fetcher(source: MockFeed, offset_hours: i32) -> CandidateFetcher {
        CandidateFetcher::new(
            Arc::new(source),
            vec!["Discussion".to_string(), "Question | Help".to_string()],
            offset_hours,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn excluded_flair_is_dropped_regardless_of_ledger_state() {
        let feed = MockFeed::new(vec![
            make_post("a1", "Kept", "body", Some("News")),
            make_post("b2", "Dropped", "body", Some("Discussion")),
            make_post("c3", "No flair", "body", None),
        ]);
        let ledger = MemoryLedger::new();

        let candidates = fetcher(feed, 8)
            .fetch(&ledger, "LocalLlama", 10)
            .await
            .unwrap();

        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "c3"]);
    }

    #[tokio::test]
    async fn already_processed_posts_are_skipped() {
        let feed = MockFeed::new(vec![
            make_post("a1", "Seen", "body", None),
            make_post("b2", "Fresh", "body", None),
        ]);
        let ledger = MemoryLedger::new();
        ledger.seed("a1");

        let candidates = fetcher(feed, 8)
            .fetch(&ledger, "LocalLlama", 10)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "b2");
    }

    #[tokio::test]
    async fn normalization_builds_combined_text_and_url() {
        let feed = MockFeed::new(vec![make_post("a1", "New 7B model", "Weights out.", None)]);
        let ledger = MemoryLedger::new();

        let candidates = fetcher(feed, 8)
            .fetch(&ledger, "LocalLlama", 10)
            .await
            .unwrap();

        let c = &candidates[0];
        assert_eq!(c.combined_text, "New 7B model\n\nWeights out.");
        assert_eq!(
            c.source_url,
            "https://www.reddit.com/r/LocalLlama/comments/a1/new_7b_model/"
        );
        assert_eq!(c.author.as_deref(), Some("test_author"));
    }

    #[tokio::test]
    async fn created_at_is_shifted_by_the_configured_offset() {
        // 1700000000 = 2023-11-14 22:13:20 UTC
        let mut post = make_post("a1", "t", "b", None);
        post.created_utc = 1_700_000_000.0;
        let feed = MockFeed::new(vec![post]);
        let ledger = MemoryLedger::new();

        let candidates = fetcher(feed, 8)
            .fetch(&ledger, "LocalLlama", 10)
            .await
            .unwrap();

        assert_eq!(
            format_timestamp(candidates[0].created_at),
            "2023-11-15 06:13:20"
        );
    }

    #[tokio::test]
    async fn deleted_author_is_carried_as_none() {
        let mut post = make_post("a1", "t", "b", None);
        post.author = None;
        let feed = MockFeed::new(vec![post]);
        let ledger = MemoryLedger::new();

        let candidates = fetcher(feed, 8)
            .fetch(&ledger, "LocalLlama", 10)
            .await
            .unwrap();

        assert_eq!(candidates[0].author, None);
    }

    #[test]
    fn out_of_range_offset_is_a_config_error() {
        let feed = MockFeed::new(vec![]);
        let err = CandidateFetcher::new(Arc::new(feed), vec![], 999).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn offset_too_large_to_convert_to_seconds_is_a_config_error() {
        // i32::MAX hours overflows the seconds conversion; must reject,
        // not panic.
        let feed = MockFeed::new(vec![]);
        let err = CandidateFetcher::new(Arc::new(feed), vec![], i32::MAX).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
