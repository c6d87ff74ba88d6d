use rust_decimal::Decimal;
use std::sync::Arc;

use super::ServiceError;
use crate::models::{NewAccount, UserAccount};
use crate::storage::{AccountStore, StorageError, UserStore};

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    users: Arc<dyn UserStore>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, users: Arc<dyn UserStore>) -> Self {
        Self { accounts, users }
    }

    pub async fn get_for_user(&self, user_id: i64) -> Result<UserAccount, ServiceError> {
        self.users.get(user_id).await?;
        self.accounts
            .find_by_user(user_id)
            .await?
            .ok_or(StorageError::NotFound("user account").into())
    }

    /// Top up a user's balance, creating the account on first refill.
    pub async fn refill(&self, user_id: i64, money: Decimal) -> Result<UserAccount, ServiceError> {
        if money <= Decimal::ZERO {
            return Err(ServiceError::validation("refill amount must be positive"));
        }
        self.users.get(user_id).await?;
        match self.accounts.find_by_user(user_id).await? {
            Some(mut account) => {
                account.money += money;
                Ok(self.accounts.update(&account).await?)
            }
            None => Ok(self.accounts.insert(NewAccount { user_id, money }).await?),
        }
    }
}
