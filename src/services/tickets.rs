use std::sync::Arc;

use super::ServiceError;
use crate::models::{NewTicket, Ticket, TicketCategory};
use crate::storage::{AccountStore, EventStore, Page, StorageError, TicketStore, UserStore};

#[derive(Clone)]
pub struct TicketService {
    tickets: Arc<dyn TicketStore>,
    events: Arc<dyn EventStore>,
    users: Arc<dyn UserStore>,
    accounts: Arc<dyn AccountStore>,
}

impl TicketService {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        events: Arc<dyn EventStore>,
        users: Arc<dyn UserStore>,
        accounts: Arc<dyn AccountStore>,
    ) -> Self {
        Self {
            tickets,
            events,
            users,
            accounts,
        }
    }

    pub async fn get(&self, id: i64) -> Result<Ticket, ServiceError> {
        Ok(self.tickets.get(id).await?)
    }

    pub async fn find_by_user(
        &self,
        user_id: i64,
        page_size: i64,
        page_num: i64,
    ) -> Result<Vec<Ticket>, ServiceError> {
        let page = Page::new(page_size, page_num)?;
        Ok(self.tickets.find_by_user(user_id, page).await?)
    }

    pub async fn find_by_event(
        &self,
        event_id: i64,
        page_size: i64,
        page_num: i64,
    ) -> Result<Vec<Ticket>, ServiceError> {
        let page = Page::new(page_size, page_num)?;
        Ok(self.tickets.find_by_event(event_id, page).await?)
    }

    /// Book a ticket: validate, then debit and insert as one atomic step.
    ///
    /// Step order: user exists, event exists, slot free, account exists,
    /// balance covers the price. Any failure leaves no ticket and no balance
    /// change.
    pub async fn book(
        &self,
        user_id: i64,
        event_id: i64,
        place: i32,
        category: TicketCategory,
    ) -> Result<Ticket, ServiceError> {
        self.users.get(user_id).await?;
        let event = self.events.get(event_id).await?;
        if self.tickets.is_booked(event_id, place, category).await? {
            return Err(StorageError::Duplicate("ticket").into());
        }
        let account = self
            .accounts
            .find_by_user(user_id)
            .await?
            .ok_or(StorageError::NotFound("user account"))?;
        if account.money < event.ticket_price {
            return Err(StorageError::InsufficientFunds.into());
        }
        let draft = NewTicket {
            user_id,
            event_id,
            place,
            category,
        };
        // The store re-checks funds and slot at write time, so a concurrent
        // booking between the checks above and this call still cannot
        // overdraw or double-sell.
        Ok(self.tickets.book(draft, event.ticket_price).await?)
    }

    pub async fn update(&self, ticket: &Ticket) -> Result<Ticket, ServiceError> {
        self.users.get(ticket.user_id).await?;
        self.events.get(ticket.event_id).await?;
        Ok(self.tickets.update(ticket).await?)
    }

    pub async fn cancel(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.tickets.delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewEvent, NewUser};
    use crate::services::{AccountService, EventService, UserService};
    use crate::storage::Stores;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    struct Fixture {
        tickets: TicketService,
        accounts: AccountService,
        stores: Stores,
    }

    fn fixture() -> Fixture {
        let stores = Stores::in_memory();
        Fixture {
            tickets: TicketService::new(
                stores.tickets.clone(),
                stores.events.clone(),
                stores.users.clone(),
                stores.accounts.clone(),
            ),
            accounts: AccountService::new(stores.accounts.clone(), stores.users.clone()),
            stores,
        }
    }

    async fn seed_user(fx: &Fixture) -> i64 {
        UserService::new(fx.stores.users.clone())
            .create(NewUser {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_event(fx: &Fixture, price: i64) -> i64 {
        EventService::new(fx.stores.events.clone())
            .create(NewEvent {
                title: "opening".to_string(),
                date: Utc.with_ymd_and_hms(2022, 5, 16, 12, 0, 0).unwrap(),
                ticket_price: Decimal::from(price),
            })
            .await
            .unwrap()
            .id
    }

    async fn balance_of(fx: &Fixture, user_id: i64) -> Decimal {
        fx.stores
            .accounts
            .find_by_user(user_id)
            .await
            .unwrap()
            .unwrap()
            .money
    }

    #[tokio::test]
    async fn a_valid_booking_debits_and_creates_the_ticket() {
        let fx = fixture();
        let user_id = seed_user(&fx).await;
        let event_id = seed_event(&fx, 40).await;
        fx.accounts.refill(user_id, Decimal::from(100)).await.unwrap();

        let ticket = fx
            .tickets
            .book(user_id, event_id, 5, TicketCategory::Standard)
            .await
            .unwrap();
        assert_eq!(ticket.user_id, user_id);
        assert_eq!(ticket.event_id, event_id);
        assert_eq!(balance_of(&fx, user_id).await, Decimal::from(60));
    }

    #[tokio::test]
    async fn booking_fails_for_a_missing_user() {
        let fx = fixture();
        let event_id = seed_event(&fx, 40).await;
        assert!(matches!(
            fx.tickets.book(999, event_id, 5, TicketCategory::Bar).await,
            Err(ServiceError::Storage(StorageError::NotFound("user")))
        ));
        assert!(fx.stores.tickets.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn booking_fails_for_a_missing_event() {
        let fx = fixture();
        let user_id = seed_user(&fx).await;
        fx.accounts.refill(user_id, Decimal::from(100)).await.unwrap();
        assert!(matches!(
            fx.tickets.book(user_id, 999, 5, TicketCategory::Bar).await,
            Err(ServiceError::Storage(StorageError::NotFound("event")))
        ));
        assert_eq!(balance_of(&fx, user_id).await, Decimal::from(100));
    }

    #[tokio::test]
    async fn booking_a_taken_slot_fails_without_a_debit() {
        let fx = fixture();
        let user_id = seed_user(&fx).await;
        let event_id = seed_event(&fx, 40).await;
        fx.accounts.refill(user_id, Decimal::from(100)).await.unwrap();
        fx.tickets
            .book(user_id, event_id, 5, TicketCategory::Premium)
            .await
            .unwrap();

        assert!(matches!(
            fx.tickets
                .book(user_id, event_id, 5, TicketCategory::Premium)
                .await,
            Err(ServiceError::Storage(StorageError::Duplicate("ticket")))
        ));
        assert_eq!(fx.stores.tickets.list().await.unwrap().len(), 1);
        assert_eq!(balance_of(&fx, user_id).await, Decimal::from(60));
    }

    #[tokio::test]
    async fn booking_without_an_account_fails() {
        let fx = fixture();
        let user_id = seed_user(&fx).await;
        let event_id = seed_event(&fx, 40).await;
        assert!(matches!(
            fx.tickets
                .book(user_id, event_id, 5, TicketCategory::Standard)
                .await,
            Err(ServiceError::Storage(StorageError::NotFound("user account")))
        ));
        assert!(fx.stores.tickets.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn booking_beyond_the_balance_fails_without_a_debit() {
        let fx = fixture();
        let user_id = seed_user(&fx).await;
        let event_id = seed_event(&fx, 40).await;
        fx.accounts.refill(user_id, Decimal::from(30)).await.unwrap();

        assert!(matches!(
            fx.tickets
                .book(user_id, event_id, 5, TicketCategory::Standard)
                .await,
            Err(ServiceError::Storage(StorageError::InsufficientFunds))
        ));
        assert!(fx.stores.tickets.list().await.unwrap().is_empty());
        assert_eq!(balance_of(&fx, user_id).await, Decimal::from(30));
    }

    #[tokio::test]
    async fn cancelling_a_missing_ticket_fails() {
        let fx = fixture();
        assert!(matches!(
            fx.tickets.cancel(999).await,
            Err(ServiceError::Storage(StorageError::NotFound("ticket")))
        ));
    }
}
