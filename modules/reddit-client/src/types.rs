use serde::{Deserialize, Deserializer};

/// Token exchange response from `/api/v1/access_token`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccessToken {
    pub access_token: String,
}

/// A `/r/{subreddit}/new` listing: `{"data": {"children": [{"data": ...}]}}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListingData {
    pub children: Vec<Thing>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Thing {
    pub data: RedditPost,
}

/// One post as returned by the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    /// Body text; empty for link posts.
    #[serde(default)]
    pub selftext: String,
    /// Creation time as a UTC epoch (Reddit sends it as a float).
    pub created_utc: f64,
    /// None when the account was deleted. Reddit reports deleted authors
    /// as the literal string "[deleted]" rather than null.
    #[serde(default, deserialize_with = "deleted_as_none")]
    pub author: Option<String>,
    /// Site-relative permalink, e.g. `/r/LocalLlama/comments/abc/...`.
    pub permalink: String,
    #[serde(default)]
    pub link_flair_text: Option<String>,
}

fn deleted_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let author = Option::<String>::deserialize(deserializer)?;
    Ok(author.filter(|a| a != "[deleted]"))
}
