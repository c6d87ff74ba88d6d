use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::codec::{decode, encode};
use super::{entry_key, ns_entries, KvStore, NS_ACCOUNT};
use crate::models::{NewAccount, UserAccount};
use crate::storage::{AccountStore, StorageError};

pub struct MemoryAccountStore {
    kv: Arc<KvStore>,
}

impl MemoryAccountStore {
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }
}

pub(crate) fn scan_accounts(
    map: &HashMap<String, String>,
) -> Result<Vec<UserAccount>, StorageError> {
    ns_entries(map, NS_ACCOUNT)
        .into_iter()
        .map(|(_, raw)| decode::<UserAccount>(&raw))
        .collect()
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<UserAccount>, StorageError> {
        let accounts = self.kv.with_read(scan_accounts)?;
        Ok(accounts.into_iter().find(|a| a.user_id == user_id))
    }

    async fn insert(&self, draft: NewAccount) -> Result<UserAccount, StorageError> {
        self.kv.with_write(|map| {
            let accounts = scan_accounts(map)?;
            if accounts.iter().any(|a| a.user_id == draft.user_id) {
                return Err(StorageError::Duplicate("user account"));
            }
            let account = UserAccount {
                id: self.kv.next_id(NS_ACCOUNT, map),
                user_id: draft.user_id,
                money: draft.money,
            };
            let raw = encode(&account)?;
            map.insert(entry_key(NS_ACCOUNT, account.id), raw);
            Ok(account)
        })
    }

    async fn update(&self, account: &UserAccount) -> Result<UserAccount, StorageError> {
        self.kv.with_write(|map| {
            if !map.contains_key(&entry_key(NS_ACCOUNT, account.id)) {
                return Err(StorageError::NotFound("user account"));
            }
            let raw = encode(account)?;
            map.insert(entry_key(NS_ACCOUNT, account.id), raw);
            Ok(account.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn store() -> MemoryAccountStore {
        MemoryAccountStore::new(Arc::new(KvStore::new()))
    }

    #[tokio::test]
    async fn one_account_per_user() {
        let store = store();
        store
            .insert(NewAccount {
                user_id: 1,
                money: Decimal::from(50),
            })
            .await
            .unwrap();
        let err = store
            .insert(NewAccount {
                user_id: 1,
                money: Decimal::from(10),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Duplicate("user account")));
    }

    #[tokio::test]
    async fn missing_account_is_none_not_an_error() {
        let store = store();
        assert!(store.find_by_user(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_replaces_the_balance() {
        let store = store();
        let mut account = store
            .insert(NewAccount {
                user_id: 1,
                money: Decimal::from(50),
            })
            .await
            .unwrap();
        account.money += Decimal::from(25);
        store.update(&account).await.unwrap();
        let found = store.find_by_user(1).await.unwrap().unwrap();
        assert_eq!(found.money, Decimal::from(75));
    }
}
