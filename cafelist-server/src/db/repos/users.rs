//! User repository

use sqlx::{FromRow, SqlitePool};

use super::DbError;

const DUPLICATE_EMAIL: &str = "user with this email already exists";

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user; duplicate emails conflict.
    pub async fn create(&self, email: &str, hashed_password: &str) -> Result<User, DbError> {
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (email, hashed_password)
            VALUES (?, ?)
            RETURNING id, email, hashed_password, is_active, is_superuser, is_verified
            "#,
        )
        .bind(email)
        .bind(hashed_password)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::from_unique(e, DUPLICATE_EMAIL))?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, hashed_password, is_active, is_superuser, is_verified \
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, hashed_password, is_active, is_superuser, is_verified \
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "user",
            id: id.to_string(),
        })
    }

    /// Flip the active flag; inactive users can't authenticate.
    pub async fn set_active(&self, id: i64, is_active: bool) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "user",
                id: id.to_string(),
            });
        }
        Ok(())
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
    async fn create_defaults_to_active() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);
        let user = repo.create("a@example.com", "hash").await.unwrap();
        assert!(user.is_active);
        assert!(!user.is_superuser);
        assert!(!user.is_verified);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);
        repo.create("a@example.com", "hash").await.unwrap();
        let err = repo.create("a@example.com", "other").await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_and_deactivate() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);
        let user = repo.create("a@example.com", "hash").await.unwrap();

        assert!(repo.find_by_email("a@example.com").await.unwrap().is_some());
        assert!(repo.find_by_email("b@example.com").await.unwrap().is_none());

        repo.set_active(user.id, false).await.unwrap();
        assert!(!repo.get(user.id).await.unwrap().is_active);
    }
}
