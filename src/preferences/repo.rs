use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewPreference, Preference};
use crate::db::StoreError;

/// Every lookup by id is filtered by owner as well.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Preference>, StoreError>;
    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<Preference>, StoreError>;
    async fn exists(
        &self,
        user_id: Uuid,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<bool, StoreError>;
    async fn create(&self, pref: NewPreference<'_>) -> Result<Preference, StoreError>;
    /// Returns whether a row was removed.
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgPreferenceStore {
    db: PgPool,
}

impl PgPreferenceStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Preference>, StoreError> {
        let rows = sqlx::query_as::<_, Preference>(
            r#"
            SELECT id, user_id, category, subcategory, created_at
            FROM preferences
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_owned(&self, id: Uuid, user_id: Uuid) -> Result<Option<Preference>, StoreError> {
        let row = sqlx::query_as::<_, Preference>(
            r#"
            SELECT id, user_id, category, subcategory, created_at
            FROM preferences
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn exists(
        &self,
        user_id: Uuid,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<bool, StoreError> {
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                  FROM preferences
                 WHERE user_id = $1
                   AND category = $2
                   AND subcategory IS NOT DISTINCT FROM $3
            )
            "#,
        )
        .bind(user_id)
        .bind(category)
        .bind(subcategory)
        .fetch_one(&self.db)
        .await?;
        Ok(found)
    }

    async fn create(&self, pref: NewPreference<'_>) -> Result<Preference, StoreError> {
        sqlx::query_as::<_, Preference>(
            r#"
            INSERT INTO preferences (user_id, category, subcategory)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, category, subcategory, created_at
            "#,
        )
        .bind(pref.user_id)
        .bind(pref.category)
        .bind(pref.subcategory)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::from_write)
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM preferences WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
