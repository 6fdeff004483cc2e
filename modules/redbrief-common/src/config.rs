use std::env;

use tracing::info;

/// Default flairs excluded from annotation, matching the editorial policy
/// for the digest: purely discursive posts carry no daily-brief value.
const DEFAULT_EXCLUDED_FLAIRS: &[&str] = &["Question | Help", "Discussion", "Other", "Funny"];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Reddit API
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,

    // Annotation service
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,

    // Postgres
    pub database_url: String,

    // Pipeline
    pub subreddit: String,
    pub fetch_limit: u32,
    pub tz_offset_hours: i32,
    pub excluded_flairs: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            reddit_client_id: required_env("REDDIT_CLIENT_ID"),
            reddit_client_secret: required_env("REDDIT_CLIENT_SECRET"),
            reddit_user_agent: required_env("REDDIT_USER_AGENT"),
            openai_api_key: required_env("OPENAI_API_KEY"),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo-1106".to_string()),
            database_url: required_env("DATABASE_URL"),
            subreddit: env::var("SUBREDDIT").unwrap_or_else(|_| "LocalLlama".to_string()),
            fetch_limit: env::var("FETCH_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("FETCH_LIMIT must be a number"),
            tz_offset_hours: env::var("TZ_OFFSET_HOURS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .expect("TZ_OFFSET_HOURS must be a number"),
            excluded_flairs: env::var("EXCLUDED_FLAIRS")
                .map(|raw| parse_flair_list(&raw))
                .unwrap_or_else(|_| {
                    DEFAULT_EXCLUDED_FLAIRS
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),
        }
    }

    /// Log the non-secret parts of the config at startup.
    pub fn log_redacted(&self) {
        info!(
            subreddit = self.subreddit.as_str(),
            fetch_limit = self.fetch_limit,
            tz_offset_hours = self.tz_offset_hours,
            model = self.openai_model.as_str(),
            base_url = self.openai_base_url.as_str(),
            excluded_flairs = ?self.excluded_flairs,
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

/// Comma-separated flair list. Flair text may contain spaces and pipes
/// ("Question | Help"), so only commas delimit.
fn parse_flair_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flair_list_splits_on_commas_only() {
        let flairs = parse_flair_list("Question | Help, Discussion,Funny, ");
        assert_eq!(flairs, vec!["Question | Help", "Discussion", "Funny"]);
    }

    #[test]
    fn default_exclusions_cover_discursive_flairs() {
        assert!(DEFAULT_EXCLUDED_FLAIRS.contains(&"Question | Help"));
        assert_eq!(DEFAULT_EXCLUDED_FLAIRS.len(), 4);
    }
}
