//! Domain services.
//!
//! One service per entity, each validating its inputs before touching the
//! store and returning typed errors. Nothing is swallowed here; the
//! conversion to the soft HTTP envelope happens once, at the handler
//! boundary, so internal callers and tests can tell failure causes apart.

use thiserror::Error;

use crate::storage::StorageError;

pub mod accounts;
pub mod events;
pub mod facade;
pub mod tickets;
pub mod users;

pub use accounts::AccountService;
pub use events::EventService;
pub use facade::BookingFacade;
pub use tickets::TicketService;
pub use users::UserService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}
