//! Document store — named collections of JSON documents.
//!
//! `PgDocumentStore` keeps every collection in the single `documents` table created by
//! `db::ensure_schema`.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// Adds documents to named collections. A single add is atomic or fails as a whole.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores `document` in `collection` and returns its new id.
    async fn add(&self, collection: &str, document: serde_json::Value) -> Result<String>;
}

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn add(&self, collection: &str, document: serde_json::Value) -> Result<String> {
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO documents (id, collection, data) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(collection)
            .bind(&document)
            .execute(&self.pool)
            .await?;

        info!("Inserted document {id} into collection '{collection}'");
        Ok(id.to_string())
    }
}
