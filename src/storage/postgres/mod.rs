//! Postgres repositories.
//!
//! Runtime `sqlx` queries against the relational schema in `migrations/`.
//! Uniqueness lives in the database constraints; a unique violation on write
//! maps to [`StorageError::Duplicate`], so the check-then-act window between
//! a service-level existence check and the insert is closed at write time.

use sqlx::Error as SqlxError;

mod accounts;
mod events;
mod tickets;
mod users;

pub use accounts::PgAccountStore;
pub use events::PgEventStore;
pub use tickets::PgTicketStore;
pub use users::PgUserStore;

use super::{Page, StorageError};

/// Map a write error, turning a unique-constraint violation into a
/// `Duplicate` for the given entity.
fn on_write(entity: &'static str) -> impl FnOnce(SqlxError) -> StorageError {
    move |e| match &e {
        SqlxError::Database(db) if db.is_unique_violation() => StorageError::Duplicate(entity),
        _ => StorageError::Database(e),
    }
}

/// Enforce the strict page window on rows fetched with
/// `LIMIT size OFFSET size * (num - 1)`: a short page means the window ran
/// past the filtered result set.
fn strict_page<T>(rows: Vec<T>, page: Page) -> Result<Vec<T>, StorageError> {
    if rows.len() < page.size as usize {
        return Err(StorageError::PageOutOfRange);
    }
    Ok(rows)
}
