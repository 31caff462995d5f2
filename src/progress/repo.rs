use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{ModuleName, ProgressRecord, ProgressUpsert};

/// Row store backing learner progress.
///
/// Implementations must treat `(user_id, module_name)` as the conflict key:
/// `upsert` updates the existing row in place or inserts a new one.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn upsert(&self, entry: &ProgressUpsert) -> anyhow::Result<ProgressRecord>;

    async fn find(
        &self,
        user_id: Uuid,
        module_name: &ModuleName,
    ) -> anyhow::Result<Option<ProgressRecord>>;

    /// Most recently accessed first.
    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<ProgressRecord>>;

    /// Deleting a missing row is not an error.
    async fn delete(&self, user_id: Uuid, module_name: &ModuleName) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgProgressStore {
    db: PgPool,
}

impl PgProgressStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn upsert(&self, entry: &ProgressUpsert) -> anyhow::Result<ProgressRecord> {
        sqlx::query_as::<_, ProgressRecord>(
            r#"
            INSERT INTO user_progress (user_id, module_name, is_completed, last_accessed)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, module_name) DO UPDATE SET
                is_completed = EXCLUDED.is_completed,
                last_accessed = EXCLUDED.last_accessed
            RETURNING id, user_id, module_name, is_completed, last_accessed, created_at
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.module_name.as_str())
        .bind(entry.is_completed)
        .bind(entry.last_accessed)
        .fetch_one(&self.db)
        .await
        .context("upsert user_progress")
    }

    async fn find(
        &self,
        user_id: Uuid,
        module_name: &ModuleName,
    ) -> anyhow::Result<Option<ProgressRecord>> {
        sqlx::query_as::<_, ProgressRecord>(
            r#"
            SELECT id, user_id, module_name, is_completed, last_accessed, created_at
              FROM user_progress
             WHERE user_id = $1 AND module_name = $2
            "#,
        )
        .bind(user_id)
        .bind(module_name.as_str())
        .fetch_optional(&self.db)
        .await
        .context("select user_progress")
    }

    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<ProgressRecord>> {
        sqlx::query_as::<_, ProgressRecord>(
            r#"
            SELECT id, user_id, module_name, is_completed, last_accessed, created_at
              FROM user_progress
             WHERE user_id = $1
             ORDER BY last_accessed DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list user_progress")
    }

    async fn delete(&self, user_id: Uuid, module_name: &ModuleName) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM user_progress
             WHERE user_id = $1 AND module_name = $2
            "#,
        )
        .bind(user_id)
        .bind(module_name.as_str())
        .execute(&self.db)
        .await
        .context("delete user_progress")?;
        Ok(())
    }
}
