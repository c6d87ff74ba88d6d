use async_trait::async_trait;
use sqlx::PgPool;

use super::{on_write, strict_page};
use crate::models::{NewUser, User};
use crate::storage::{Page, StorageError, UserStore};

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, id: i64) -> Result<User, StorageError> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound("user"))
    }

    async fn list(&self) -> Result<Vec<User>, StorageError> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, StorageError> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound("user"))
    }

    async fn find_by_name(&self, name: &str, page: Page) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query_as::<_, User>(
            "SELECT id, name, email FROM users \
             WHERE name = $1 ORDER BY id LIMIT $2 OFFSET $3",
        )
        .bind(name)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        strict_page(rows, page)
    }

    async fn insert(&self, draft: NewUser) -> Result<User, StorageError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email",
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .fetch_one(&self.pool)
        .await
        .map_err(on_write("user"))
    }

    async fn update(&self, user: &User) -> Result<User, StorageError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2, email = $3 WHERE id = $1 RETURNING id, name, email",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(on_write("user"))?
        .ok_or(StorageError::NotFound("user"))
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        // The account and the user's tickets cascade in the schema.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("user"));
        }
        Ok(())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StorageError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
