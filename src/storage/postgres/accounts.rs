use async_trait::async_trait;
use sqlx::PgPool;

use super::on_write;
use crate::models::{NewAccount, UserAccount};
use crate::storage::{AccountStore, StorageError};

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<UserAccount>, StorageError> {
        let account = sqlx::query_as::<_, UserAccount>(
            "SELECT id, user_id, money FROM user_accounts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn insert(&self, draft: NewAccount) -> Result<UserAccount, StorageError> {
        sqlx::query_as::<_, UserAccount>(
            "INSERT INTO user_accounts (user_id, money) VALUES ($1, $2) \
             RETURNING id, user_id, money",
        )
        .bind(draft.user_id)
        .bind(draft.money)
        .fetch_one(&self.pool)
        .await
        .map_err(on_write("user account"))
    }

    async fn update(&self, account: &UserAccount) -> Result<UserAccount, StorageError> {
        sqlx::query_as::<_, UserAccount>(
            "UPDATE user_accounts SET money = $2 WHERE id = $1 RETURNING id, user_id, money",
        )
        .bind(account.id)
        .bind(account.money)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound("user account"))
    }
}
