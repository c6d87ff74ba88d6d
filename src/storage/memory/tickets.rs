use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::accounts::scan_accounts;
use super::codec::{decode, encode};
use super::{entry_key, ns_entries, KvStore, NS_ACCOUNT, NS_TICKET};
use crate::models::{NewTicket, Ticket, TicketCategory};
use crate::storage::{window, Page, StorageError, TicketStore};

pub struct MemoryTicketStore {
    kv: Arc<KvStore>,
}

impl MemoryTicketStore {
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }
}

fn scan_tickets(map: &HashMap<String, String>) -> Result<Vec<Ticket>, StorageError> {
    ns_entries(map, NS_TICKET)
        .into_iter()
        .map(|(_, raw)| decode::<Ticket>(&raw))
        .collect()
}

fn slot_taken(
    tickets: &[Ticket],
    event_id: i64,
    place: i32,
    category: TicketCategory,
    excluding: Option<i64>,
) -> bool {
    tickets.iter().any(|t| {
        t.event_id == event_id
            && t.place == place
            && t.category == category
            && Some(t.id) != excluding
    })
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn get(&self, id: i64) -> Result<Ticket, StorageError> {
        self.kv.with_read(|map| {
            map.get(&entry_key(NS_TICKET, id))
                .ok_or(StorageError::NotFound("ticket"))
                .and_then(|raw| decode(raw))
        })
    }

    async fn list(&self) -> Result<Vec<Ticket>, StorageError> {
        self.kv.with_read(scan_tickets)
    }

    async fn find_by_user(&self, user_id: i64, page: Page) -> Result<Vec<Ticket>, StorageError> {
        let matching: Vec<Ticket> = self
            .kv
            .with_read(scan_tickets)?
            .into_iter()
            .filter(|t| t.user_id == user_id)
            .collect();
        window(matching, page)
    }

    async fn find_by_event(&self, event_id: i64, page: Page) -> Result<Vec<Ticket>, StorageError> {
        let matching: Vec<Ticket> = self
            .kv
            .with_read(scan_tickets)?
            .into_iter()
            .filter(|t| t.event_id == event_id)
            .collect();
        window(matching, page)
    }

    async fn is_booked(
        &self,
        event_id: i64,
        place: i32,
        category: TicketCategory,
    ) -> Result<bool, StorageError> {
        let tickets = self.kv.with_read(scan_tickets)?;
        Ok(slot_taken(&tickets, event_id, place, category, None))
    }

    async fn insert(&self, draft: NewTicket) -> Result<Ticket, StorageError> {
        self.kv.with_write(|map| {
            let tickets = scan_tickets(map)?;
            if slot_taken(&tickets, draft.event_id, draft.place, draft.category, None) {
                return Err(StorageError::Duplicate("ticket"));
            }
            let ticket = Ticket {
                id: self.kv.next_id(NS_TICKET, map),
                user_id: draft.user_id,
                event_id: draft.event_id,
                place: draft.place,
                category: draft.category,
            };
            let raw = encode(&ticket)?;
            map.insert(entry_key(NS_TICKET, ticket.id), raw);
            Ok(ticket)
        })
    }

    async fn update(&self, ticket: &Ticket) -> Result<Ticket, StorageError> {
        self.kv.with_write(|map| {
            if !map.contains_key(&entry_key(NS_TICKET, ticket.id)) {
                return Err(StorageError::NotFound("ticket"));
            }
            let tickets = scan_tickets(map)?;
            if slot_taken(
                &tickets,
                ticket.event_id,
                ticket.place,
                ticket.category,
                Some(ticket.id),
            ) {
                return Err(StorageError::Duplicate("ticket"));
            }
            let raw = encode(ticket)?;
            map.insert(entry_key(NS_TICKET, ticket.id), raw);
            Ok(ticket.clone())
        })
    }

    async fn book(&self, draft: NewTicket, price: Decimal) -> Result<Ticket, StorageError> {
        self.kv.with_write(|map| {
            let tickets = scan_tickets(map)?;
            if slot_taken(&tickets, draft.event_id, draft.place, draft.category, None) {
                return Err(StorageError::Duplicate("ticket"));
            }
            let mut account = scan_accounts(map)?
                .into_iter()
                .find(|a| a.user_id == draft.user_id)
                .ok_or(StorageError::NotFound("user account"))?;
            if account.money < price {
                return Err(StorageError::InsufficientFunds);
            }
            account.money -= price;
            let ticket = Ticket {
                id: self.kv.next_id(NS_TICKET, map),
                user_id: draft.user_id,
                event_id: draft.event_id,
                place: draft.place,
                category: draft.category,
            };
            // Encode both records before touching the map so a codec failure
            // cannot leave a debit without a ticket.
            let account_raw = encode(&account)?;
            let ticket_raw = encode(&ticket)?;
            map.insert(entry_key(NS_ACCOUNT, account.id), account_raw);
            map.insert(entry_key(NS_TICKET, ticket.id), ticket_raw);
            Ok(ticket)
        })
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.kv.with_write(|map| {
            if map.remove(&entry_key(NS_TICKET, id)).is_none() {
                return Err(StorageError::NotFound("ticket"));
            }
            Ok(())
        })
    }
}
