//! Category repository
//!
//! The category table is the canonical name list; cafés only ever
//! reference rows that exist here.

use std::collections::HashMap;

use sqlx::{FromRow, SqlitePool};

use super::DbError;

/// Category record from database
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by id.
    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(self.pool)
                .await?;
        Ok(categories)
    }

    /// Resolve category names to ids.
    ///
    /// Names that don't exist are simply absent from the returned map;
    /// callers decide whether that is an error (the consistency
    /// validator reports the missing ones).
    pub async fn resolve<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<HashMap<String, i64>, DbError> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "SELECT id, name FROM categories WHERE name IN (",
        );
        let mut separated = builder.separated(", ");
        for name in names {
            separated.push_bind(name.as_ref());
        }
        separated.push_unseparated(")");

        let rows: Vec<Category> = builder.build_query_as().fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(|c| (c.name, c.id)).collect())
    }

    /// Insert a category unless it already exists; returns its id.
    /// Used by the seeder.
    pub async fn insert_if_missing(&self, name: &str) -> Result<i64, DbError> {
        sqlx::query("INSERT INTO categories (name) VALUES (?) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(self.pool)
            .await?;

        let row: Category = sqlx::query_as("SELECT id, name FROM categories WHERE name = ?")
            .bind(name)
            .fetch_one(self.pool)
            .await?;
        Ok(row.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, pool::create_pool_with_options};

    async fn test_pool() -> SqlitePool {
        let pool = create_pool_with_options("sqlite::memory:", 1)
            .await
            .expect("pool");
        migrations::run(&pool).await.expect("migrations");
        pool
    }

    #[tokio::test]
    async fn insert_if_missing_is_idempotent() {
        let pool = test_pool().await;
        let repo = CategoryRepo::new(&pool);

        let first = repo.insert_if_missing("wifi").await.unwrap();
        let second = repo.insert_if_missing("wifi").await.unwrap();
        assert_eq!(first, second);

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn resolve_returns_only_known_names() {
        let pool = test_pool().await;
        let repo = CategoryRepo::new(&pool);
        repo.insert_if_missing("wifi").await.unwrap();
        repo.insert_if_missing("quiet").await.unwrap();

        let resolved = repo
            .resolve(&["wifi", "quiet", "arcade"])
            .await
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(resolved.contains_key("wifi"));
        assert!(resolved.contains_key("quiet"));
        assert!(!resolved.contains_key("arcade"));
    }

    #[tokio::test]
    async fn resolve_empty_input() {
        let pool = test_pool().await;
        let repo = CategoryRepo::new(&pool);
        let resolved = repo.resolve::<&str>(&[]).await.unwrap();
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let pool = test_pool().await;
        let repo = CategoryRepo::new(&pool);
        repo.insert_if_missing("quiet").await.unwrap();
        repo.insert_if_missing("wifi").await.unwrap();

        let all = repo.list().await.unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["quiet", "wifi"]);
    }
}
