use crate::services::BookingFacade;

/// Shared application state, cloned cheaply into every handler.
#[derive(Clone)]
pub struct AppState {
    pub facade: BookingFacade,
}

impl AppState {
    pub fn new(facade: BookingFacade) -> Self {
        Self { facade }
    }
}
