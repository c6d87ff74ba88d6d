use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::codec::{decode, encode};
use super::{entry_key, ns_entries, KvStore, NS_ACCOUNT, NS_TICKET, NS_USER};
use crate::models::{NewUser, Ticket, User, UserAccount};
use crate::storage::{window, Page, StorageError, UserStore};

pub struct MemoryUserStore {
    kv: Arc<KvStore>,
}

impl MemoryUserStore {
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }
}

fn scan_users(map: &HashMap<String, String>) -> Result<Vec<User>, StorageError> {
    ns_entries(map, NS_USER)
        .into_iter()
        .map(|(_, raw)| decode::<User>(&raw))
        .collect()
}

fn email_taken(users: &[User], email: &str, excluding: Option<i64>) -> bool {
    users
        .iter()
        .any(|u| u.email == email && Some(u.id) != excluding)
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: i64) -> Result<User, StorageError> {
        self.kv.with_read(|map| {
            map.get(&entry_key(NS_USER, id))
                .ok_or(StorageError::NotFound("user"))
                .and_then(|raw| decode(raw))
        })
    }

    async fn list(&self) -> Result<Vec<User>, StorageError> {
        self.kv.with_read(scan_users)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, StorageError> {
        self.kv
            .with_read(scan_users)?
            .into_iter()
            .find(|u| u.email == email)
            .ok_or(StorageError::NotFound("user"))
    }

    async fn find_by_name(&self, name: &str, page: Page) -> Result<Vec<User>, StorageError> {
        let matching: Vec<User> = self
            .kv
            .with_read(scan_users)?
            .into_iter()
            .filter(|u| u.name == name)
            .collect();
        window(matching, page)
    }

    async fn insert(&self, draft: NewUser) -> Result<User, StorageError> {
        self.kv.with_write(|map| {
            let users = scan_users(map)?;
            if email_taken(&users, &draft.email, None) {
                return Err(StorageError::Duplicate("user"));
            }
            let user = User {
                id: self.kv.next_id(NS_USER, map),
                name: draft.name,
                email: draft.email,
            };
            let raw = encode(&user)?;
            map.insert(entry_key(NS_USER, user.id), raw);
            Ok(user)
        })
    }

    async fn update(&self, user: &User) -> Result<User, StorageError> {
        self.kv.with_write(|map| {
            if !map.contains_key(&entry_key(NS_USER, user.id)) {
                return Err(StorageError::NotFound("user"));
            }
            let users = scan_users(map)?;
            if email_taken(&users, &user.email, Some(user.id)) {
                return Err(StorageError::Duplicate("user"));
            }
            let raw = encode(user)?;
            map.insert(entry_key(NS_USER, user.id), raw);
            Ok(user.clone())
        })
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.kv.with_write(|map| {
            if map.remove(&entry_key(NS_USER, id)).is_none() {
                return Err(StorageError::NotFound("user"));
            }
            // Cascade: the user owns their tickets and their account.
            let owned: Vec<i64> = ns_entries(map, NS_TICKET)
                .into_iter()
                .filter_map(|(ticket_id, raw)| {
                    decode::<Ticket>(&raw)
                        .ok()
                        .filter(|t| t.user_id == id)
                        .map(|_| ticket_id)
                })
                .collect();
            for ticket_id in owned {
                map.remove(&entry_key(NS_TICKET, ticket_id));
            }
            let account: Option<i64> = ns_entries(map, NS_ACCOUNT)
                .into_iter()
                .filter_map(|(account_id, raw)| {
                    decode::<UserAccount>(&raw)
                        .ok()
                        .filter(|a| a.user_id == id)
                        .map(|_| account_id)
                })
                .next();
            if let Some(account_id) = account {
                map.remove(&entry_key(NS_ACCOUNT, account_id));
            }
            Ok(())
        })
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StorageError> {
        let users = self.kv.with_read(scan_users)?;
        Ok(email_taken(&users, email, None))
    }
}
