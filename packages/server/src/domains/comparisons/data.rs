//! Postgres persistence for comparisons.
//!
//! The store exclusively owns persistence; nothing is cached across
//! requests. Rows are insert-only - no updates, no deletes, no TTL.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::kernel::traits::BaseComparisonStore;

use super::models::{
    ComparisonRecord, ComparisonRow, NewComparison, RecentComparison, TrendRow,
};

/// Comparison store backed by the `comparisons` table.
#[derive(Clone)]
pub struct PgComparisonStore {
    pool: PgPool,
}

impl PgComparisonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseComparisonStore for PgComparisonStore {
    async fn insert(&self, comparison: &NewComparison) -> Result<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO comparisons (template, tone, criteria, item_a, item_b, result)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(&comparison.template)
        .bind(&comparison.tone)
        .bind(&comparison.criteria)
        .bind(&comparison.item_a)
        .bind(&comparison.item_b)
        .bind(Json(&comparison.result))
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<RecentComparison>> {
        sqlx::query_as::<_, RecentComparison>(
            "SELECT id, created_at, template, tone, criteria, item_a, item_b
             FROM comparisons
             ORDER BY created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn trend_window(&self, limit: i64) -> Result<Vec<TrendRow>> {
        sqlx::query_as::<_, TrendRow>(
            "SELECT item_a, item_b, template
             FROM comparisons
             ORDER BY created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ComparisonRecord>> {
        let row = sqlx::query_as::<_, ComparisonRow>(
            "SELECT id, created_at, template, tone, criteria, item_a, item_b, result
             FROM comparisons
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ComparisonRecord::from))
    }
}
