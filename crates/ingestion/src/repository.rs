//! Content repository for database persistence

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use media_catalog_core::models::{ContentRecord, ContentTag, SourceType};
use sqlx::PgPool;
use uuid::Uuid;

/// Storage operations the ingestion pipeline needs
///
/// Deliberately narrow: an existence probe for dedup, a record insert, and
/// a tag insert. Everything the pipeline persists goes through these three.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Whether a record with this external id already exists for the source
    async fn exists_by_external_id(
        &self,
        source_type: SourceType,
        external_id: &str,
    ) -> Result<bool>;

    /// Persist a record and return its id
    ///
    /// Saving an external id that already exists for the source returns the
    /// existing row's id without modifying it.
    async fn save(&self, record: &ContentRecord) -> Result<Uuid>;

    /// Attach a tag to a persisted record
    async fn save_tag(&self, content_id: Uuid, tag: &ContentTag) -> Result<()>;
}

/// PostgreSQL implementation of the content repository
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn exists_by_external_id(
        &self,
        source_type: SourceType,
        external_id: &str,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM content WHERE source_type = $1 AND external_id = $2)",
        )
        .bind(source_type.as_str())
        .bind(external_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check content existence")?;

        Ok(exists)
    }

    async fn save(&self, record: &ContentRecord) -> Result<Uuid> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO content
                (id, source_type, external_id, title, description, thumbnail_url,
                 view_count, rating_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (source_type, external_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.source_type.as_str())
        .bind(&record.external_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.thumbnail_url)
        .bind(record.view_count)
        .bind(record.rating_count)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to insert content")?;

        match inserted {
            Some(id) => Ok(id),
            // Conflict with a concurrent writer; reuse its row.
            None => {
                let existing = sqlx::query_scalar::<_, Uuid>(
                    "SELECT id FROM content WHERE source_type = $1 AND external_id = $2",
                )
                .bind(record.source_type.as_str())
                .bind(&record.external_id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to load content after insert conflict")?;
                Ok(existing)
            }
        }
    }

    async fn save_tag(&self, content_id: Uuid, tag: &ContentTag) -> Result<()> {
        sqlx::query("INSERT INTO content_tags (content_id, genre_id, name) VALUES ($1, $2, $3)")
            .bind(content_id)
            .bind(tag.genre_id)
            .bind(&tag.name)
            .execute(&self.pool)
            .await
            .context("Failed to insert content tag")?;

        Ok(())
    }
}
