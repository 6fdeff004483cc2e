pub mod error;
pub mod types;

pub use error::{RedditError, Result};
pub use types::RedditPost;

use types::{AccessToken, Listing};

const AUTH_BASE_URL: &str = "https://www.reddit.com";
const API_BASE_URL: &str = "https://oauth.reddit.com";

/// Read-only Reddit API client using the script-app client-credentials flow.
/// A fresh token is fetched per listing call; this client runs once per
/// pipeline invocation, so token caching buys nothing.
pub struct RedditClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
    auth_base_url: String,
    api_base_url: String,
}

impl RedditClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: user_agent.into(),
            auth_base_url: AUTH_BASE_URL.to_string(),
            api_base_url: API_BASE_URL.to_string(),
        }
    }

    /// Point both the auth and API endpoints at `url`. For tests.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.auth_base_url = url.to_string();
        self.api_base_url = url.to_string();
        self
    }

    async fn access_token(&self) -> Result<String> {
        let url = format!("{}/api/v1/access_token", self.auth_base_url);
        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Auth(format!("{status}: {body}")));
        }

        let token: AccessToken = resp.json().await?;
        Ok(token.access_token)
    }

    /// Fetch up to `limit` newest posts of a subreddit, in the
    /// reverse-chronological order Reddit returns them.
    pub async fn newest(&self, subreddit: &str, limit: u32) -> Result<Vec<RedditPost>> {
        let token = self.access_token().await?;

        let url = format!(
            "{}/r/{}/new?limit={}&raw_json=1",
            self.api_base_url, subreddit, limit
        );
        tracing::debug!(subreddit, limit, "Fetching newest posts");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let listing: Listing = resp.json().await?;
        let posts: Vec<RedditPost> = listing
            .data
            .children
            .into_iter()
            .map(|thing| thing.data)
            .collect();

        tracing::info!(subreddit, count = posts.len(), "Fetched listing");
        Ok(posts)
    }
}
