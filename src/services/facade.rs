use super::{AccountService, EventService, TicketService, UserService};
use crate::storage::Stores;

/// The single aggregate handed to the web layer: all four services built
/// over one injected [`Stores`] backend. Pure composition, no logic of its
/// own.
#[derive(Clone)]
pub struct BookingFacade {
    pub events: EventService,
    pub users: UserService,
    pub accounts: AccountService,
    pub tickets: TicketService,
}

impl BookingFacade {
    pub fn new(stores: Stores) -> Self {
        Self {
            events: EventService::new(stores.events.clone()),
            users: UserService::new(stores.users.clone()),
            accounts: AccountService::new(stores.accounts.clone(), stores.users.clone()),
            tickets: TicketService::new(
                stores.tickets,
                stores.events,
                stores.users,
                stores.accounts,
            ),
        }
    }
}
