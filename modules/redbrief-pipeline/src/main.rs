use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::ChatClient;
use reddit_client::RedditClient;
use redbrief_common::Config;
use redbrief_pipeline::annotator::Annotator;
use redbrief_pipeline::fetcher::CandidateFetcher;
use redbrief_pipeline::ledger::PgLedger;
use redbrief_pipeline::pipeline::Pipeline;
use redbrief_pipeline::store::PgDigestStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("redbrief_pipeline=info".parse()?),
        )
        .init();

    info!("redbrief pipeline starting...");

    let config = Config::from_env();
    config.log_redacted();

    // One pool for both tables; connections are checked out per operation.
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await?;

    let reddit = RedditClient::new(
        config.reddit_client_id.as_str(),
        config.reddit_client_secret.as_str(),
        config.reddit_user_agent.as_str(),
    );
    let chat = ChatClient::new(config.openai_api_key.as_str(), config.openai_model.as_str())
        .with_base_url(config.openai_base_url.as_str());

    let fetcher = CandidateFetcher::new(
        Arc::new(reddit),
        config.excluded_flairs.clone(),
        config.tz_offset_hours,
    )?;

    let pipeline = Pipeline::new(
        fetcher,
        Arc::new(Annotator::new(chat)),
        Arc::new(PgLedger::new(pool.clone())),
        Arc::new(PgDigestStore::new(pool)),
        config.subreddit.clone(),
        config.fetch_limit,
    );

    let stats = pipeline.run().await?;
    info!("Pipeline run complete. {stats}");

    Ok(())
}
