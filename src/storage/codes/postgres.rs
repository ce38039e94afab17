//! Persistent code store implementation using PostgreSQL.

use crate::domain::model::{Fingerprint, ShortCode};
use crate::error::StoreError;
use crate::storage::codes::{CodeStore, InsertOutcome};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

/// Uniqueness lives in the schema: the fingerprint is the primary key and the
/// code carries a `UNIQUE` constraint, so `ON CONFLICT DO NOTHING` is the
/// atomic insert-if-absent.
#[derive(Clone)]
pub struct PostgresCodeStore {
    pool: PgPool,
}

impl PostgresCodeStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Self::new_with_pool(pool).await
    }

    pub async fn new_with_pool(pool: PgPool) -> Result<Self, StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS security_codes (
                fingerprint TEXT PRIMARY KEY,
                short_code TEXT NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode_code(raw: String) -> Result<ShortCode, StoreError> {
    ShortCode::parse(&raw).map_err(|e| StoreError::Corrupt(format!("stored code `{}`: {}", raw, e)))
}

#[async_trait]
impl CodeStore for PostgresCodeStore {
    async fn insert_if_absent(
        &self,
        fingerprint: Fingerprint,
        code: &ShortCode,
    ) -> Result<InsertOutcome, StoreError> {
        let inserted = sqlx::query(
            "INSERT INTO security_codes (fingerprint, short_code) VALUES ($1, $2)
             ON CONFLICT DO NOTHING
             RETURNING fingerprint",
        )
        .bind(fingerprint.to_hex())
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;
        if inserted.is_some() {
            return Ok(InsertOutcome::Inserted);
        }

        // Rows are never deleted, so whichever key conflicted is still there.
        match self.code_for(&fingerprint).await? {
            Some(existing) => Ok(InsertOutcome::FingerprintTaken(existing)),
            None => Ok(InsertOutcome::CodeTaken),
        }
    }

    async fn code_for(&self, fingerprint: &Fingerprint) -> Result<Option<ShortCode>, StoreError> {
        let row = sqlx::query("SELECT short_code FROM security_codes WHERE fingerprint = $1")
            .bind(fingerprint.to_hex())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.try_get::<String, _>("short_code"))
            .transpose()?
            .map(decode_code)
            .transpose()
    }

    async fn fingerprint_for(&self, code: &ShortCode) -> Result<Option<Fingerprint>, StoreError> {
        let row = sqlx::query("SELECT fingerprint FROM security_codes WHERE short_code = $1")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => {
                let raw: String = r.try_get("fingerprint")?;
                raw.parse()
                    .map(Some)
                    .map_err(|e| StoreError::Corrupt(format!("stored fingerprint `{}`: {}", raw, e)))
            }
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
