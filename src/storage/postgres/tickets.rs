use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{on_write, strict_page};
use crate::models::{NewTicket, Ticket, TicketCategory};
use crate::storage::{Page, StorageError, TicketStore};

pub struct PgTicketStore {
    pool: PgPool,
}

impl PgTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn get(&self, id: i64) -> Result<Ticket, StorageError> {
        sqlx::query_as::<_, Ticket>(
            "SELECT id, user_id, event_id, place, category FROM tickets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound("ticket"))
    }

    async fn list(&self) -> Result<Vec<Ticket>, StorageError> {
        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT id, user_id, event_id, place, category FROM tickets ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }

    async fn find_by_user(&self, user_id: i64, page: Page) -> Result<Vec<Ticket>, StorageError> {
        let rows = sqlx::query_as::<_, Ticket>(
            "SELECT id, user_id, event_id, place, category FROM tickets \
             WHERE user_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        strict_page(rows, page)
    }

    async fn find_by_event(&self, event_id: i64, page: Page) -> Result<Vec<Ticket>, StorageError> {
        let rows = sqlx::query_as::<_, Ticket>(
            "SELECT id, user_id, event_id, place, category FROM tickets \
             WHERE event_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
        )
        .bind(event_id)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        strict_page(rows, page)
    }

    async fn is_booked(
        &self,
        event_id: i64,
        place: i32,
        category: TicketCategory,
    ) -> Result<bool, StorageError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM tickets \
             WHERE event_id = $1 AND place = $2 AND category = $3)",
        )
        .bind(event_id)
        .bind(place)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert(&self, draft: NewTicket) -> Result<Ticket, StorageError> {
        sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (user_id, event_id, place, category) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, event_id, place, category",
        )
        .bind(draft.user_id)
        .bind(draft.event_id)
        .bind(draft.place)
        .bind(draft.category)
        .fetch_one(&self.pool)
        .await
        .map_err(on_write("ticket"))
    }

    async fn update(&self, ticket: &Ticket) -> Result<Ticket, StorageError> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET user_id = $2, event_id = $3, place = $4, category = $5 \
             WHERE id = $1 \
             RETURNING id, user_id, event_id, place, category",
        )
        .bind(ticket.id)
        .bind(ticket.user_id)
        .bind(ticket.event_id)
        .bind(ticket.place)
        .bind(ticket.category)
        .fetch_optional(&self.pool)
        .await
        .map_err(on_write("ticket"))?
        .ok_or(StorageError::NotFound("ticket"))
    }

    async fn book(&self, draft: NewTicket, price: Decimal) -> Result<Ticket, StorageError> {
        let mut tx = self.pool.begin().await?;

        // Conditional debit; zero rows means no account or not enough money.
        // Dropping the transaction on any early return rolls the debit back.
        let debit = sqlx::query(
            "UPDATE user_accounts SET money = money - $2 \
             WHERE user_id = $1 AND money >= $2",
        )
        .bind(draft.user_id)
        .bind(price)
        .execute(&mut *tx)
        .await?;

        if debit.rows_affected() == 0 {
            let has_account = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM user_accounts WHERE user_id = $1)",
            )
            .bind(draft.user_id)
            .fetch_one(&mut *tx)
            .await?;
            return Err(if has_account {
                StorageError::InsufficientFunds
            } else {
                StorageError::NotFound("user account")
            });
        }

        let ticket = sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (user_id, event_id, place, category) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, event_id, place, category",
        )
        .bind(draft.user_id)
        .bind(draft.event_id)
        .bind(draft.place)
        .bind(draft.category)
        .fetch_one(&mut *tx)
        .await
        .map_err(on_write("ticket"))?;

        tx.commit().await?;
        Ok(ticket)
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("ticket"));
        }
        Ok(())
    }
}
