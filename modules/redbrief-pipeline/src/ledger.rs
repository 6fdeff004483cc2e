// Postgres dedupe ledger: one table keyed by post id, nothing else.

use async_trait::async_trait;
use sqlx::PgPool;

use redbrief_common::{PipelineError, Result};

use crate::traits::DedupeLedger;

pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DedupeLedger for PgLedger {
    async fn initialize(&self) -> Result<()> {
        sqlx::query("CREATE TABLE IF NOT EXISTS processed_posts (id TEXT PRIMARY KEY)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn has_processed(&self, item_id: &str) -> Result<bool> {
        let row = sqlx::query_scalar::<_, String>("SELECT id FROM processed_posts WHERE id = $1")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn mark_processed(&self, item_id: &str) -> Result<()> {
        let result = sqlx::query("INSERT INTO processed_posts (id) VALUES ($1)")
            .bind(item_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(PipelineError::DuplicateKey(item_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
