// Postgres persistence for finalized digest rows. Rows are appended once
// and never updated or deleted here; the curated flag belongs to the
// downstream curation process.

use async_trait::async_trait;
use sqlx::PgPool;

use redbrief_common::{DigestEntry, Result};

use crate::traits::RecordStore;

pub struct PgDigestStore {
    pool: PgPool,
}

impl PgDigestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgDigestStore {
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS digest_entries (
                id BIGSERIAL PRIMARY KEY,
                summary TEXT NOT NULL,
                entry_timestamp TIMESTAMP NOT NULL,
                author TEXT,
                rating DOUBLE PRECISION,
                source_url TEXT NOT NULL,
                curated BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append(&self, entry: &DigestEntry) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO digest_entries
                (summary, entry_timestamp, author, rating, source_url, curated)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&entry.summary)
        .bind(entry.created_at)
        .bind(&entry.author)
        .bind(entry.rating)
        .bind(&entry.source_url)
        .bind(entry.curated)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
