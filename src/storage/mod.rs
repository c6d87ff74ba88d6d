//! Storage contract shared by the two backends.
//!
//! One trait per entity, implemented by the in-memory key-value store
//! ([`memory`]) and by the Postgres repositories ([`postgres`]). The backend
//! is chosen at startup and injected as a [`Stores`] bundle; nothing below
//! the composition root knows which one it got.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{
    Event, NewAccount, NewEvent, NewTicket, NewUser, Ticket, TicketCategory, User, UserAccount,
};

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("duplicate {0}")]
    Duplicate(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("page window exceeds the result set")]
    PageOutOfRange,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("malformed stored record: {0}")]
    Codec(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// A 1-based page window. Both fields must be positive; the window is
/// `[size * (num - 1), size * num)` and must lie entirely within the filtered
/// result set — no partial pages (strict windowing, not a clamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub size: i64,
    pub num: i64,
}

impl Page {
    pub fn new(size: i64, num: i64) -> Result<Self, StorageError> {
        if size <= 0 {
            return Err(StorageError::InvalidArgument("page size must be positive"));
        }
        if num <= 0 {
            return Err(StorageError::InvalidArgument(
                "page number must be positive",
            ));
        }
        Ok(Self { size, num })
    }

    pub fn offset(&self) -> i64 {
        self.size * (self.num - 1)
    }
}

/// Apply the strict page window to an already-filtered, already-ordered list.
pub(crate) fn window<T>(items: Vec<T>, page: Page) -> Result<Vec<T>, StorageError> {
    let end = page.offset() + page.size;
    if end as usize > items.len() {
        return Err(StorageError::PageOutOfRange);
    }
    Ok(items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.size as usize)
        .collect())
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Event, StorageError>;
    async fn list(&self) -> Result<Vec<Event>, StorageError>;
    async fn find_by_title(&self, title: &str, page: Page) -> Result<Vec<Event>, StorageError>;
    async fn find_for_day(&self, day: NaiveDate, page: Page) -> Result<Vec<Event>, StorageError>;
    async fn insert(&self, draft: NewEvent) -> Result<Event, StorageError>;
    async fn update(&self, event: &Event) -> Result<Event, StorageError>;
    async fn delete(&self, id: i64) -> Result<(), StorageError>;
    async fn exists_by_title_and_date(
        &self,
        title: &str,
        date: DateTime<Utc>,
    ) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<User, StorageError>;
    async fn list(&self) -> Result<Vec<User>, StorageError>;
    async fn find_by_email(&self, email: &str) -> Result<User, StorageError>;
    async fn find_by_name(&self, name: &str, page: Page) -> Result<Vec<User>, StorageError>;
    async fn insert(&self, draft: NewUser) -> Result<User, StorageError>;
    async fn update(&self, user: &User) -> Result<User, StorageError>;
    async fn delete(&self, id: i64) -> Result<(), StorageError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<UserAccount>, StorageError>;
    async fn insert(&self, draft: NewAccount) -> Result<UserAccount, StorageError>;
    async fn update(&self, account: &UserAccount) -> Result<UserAccount, StorageError>;
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Ticket, StorageError>;
    async fn list(&self) -> Result<Vec<Ticket>, StorageError>;
    async fn find_by_user(&self, user_id: i64, page: Page) -> Result<Vec<Ticket>, StorageError>;
    async fn find_by_event(&self, event_id: i64, page: Page) -> Result<Vec<Ticket>, StorageError>;
    async fn is_booked(
        &self,
        event_id: i64,
        place: i32,
        category: TicketCategory,
    ) -> Result<bool, StorageError>;
    async fn insert(&self, draft: NewTicket) -> Result<Ticket, StorageError>;
    async fn update(&self, ticket: &Ticket) -> Result<Ticket, StorageError>;
    /// Debit the booking user's account by `price` and insert the ticket as
    /// one atomic step. The caller validates first; this is the write-time
    /// enforcement of the funds and slot invariants.
    async fn book(&self, draft: NewTicket, price: Decimal) -> Result<Ticket, StorageError>;
    async fn delete(&self, id: i64) -> Result<(), StorageError>;
}

/// The injected backend bundle. Built once at the composition root and
/// cloned into services; replaces any notion of a process-global store.
#[derive(Clone)]
pub struct Stores {
    pub events: Arc<dyn EventStore>,
    pub users: Arc<dyn UserStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub tickets: Arc<dyn TicketStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        let kv = Arc::new(memory::KvStore::new());
        Self {
            events: Arc::new(memory::MemoryEventStore::new(kv.clone())),
            users: Arc::new(memory::MemoryUserStore::new(kv.clone())),
            accounts: Arc::new(memory::MemoryAccountStore::new(kv.clone())),
            tickets: Arc::new(memory::MemoryTicketStore::new(kv)),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            events: Arc::new(postgres::PgEventStore::new(pool.clone())),
            users: Arc::new(postgres::PgUserStore::new(pool.clone())),
            accounts: Arc::new(postgres::PgAccountStore::new(pool.clone())),
            tickets: Arc::new(postgres::PgTicketStore::new(pool)),
        }
    }
}
