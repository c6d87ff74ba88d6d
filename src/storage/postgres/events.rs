use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;

use super::{on_write, strict_page};
use crate::models::{Event, NewEvent};
use crate::storage::{EventStore, Page, StorageError};

pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn get(&self, id: i64) -> Result<Event, StorageError> {
        sqlx::query_as::<_, Event>(
            "SELECT id, title, date, ticket_price FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound("event"))
    }

    async fn list(&self) -> Result<Vec<Event>, StorageError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, title, date, ticket_price FROM events ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn find_by_title(&self, title: &str, page: Page) -> Result<Vec<Event>, StorageError> {
        let rows = sqlx::query_as::<_, Event>(
            "SELECT id, title, date, ticket_price FROM events \
             WHERE title = $1 ORDER BY id LIMIT $2 OFFSET $3",
        )
        .bind(title)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        strict_page(rows, page)
    }

    async fn find_for_day(&self, day: NaiveDate, page: Page) -> Result<Vec<Event>, StorageError> {
        let start = day.and_time(NaiveTime::MIN).and_utc();
        let end = day
            .succ_opt()
            .ok_or(StorageError::InvalidArgument("day out of range"))?
            .and_time(NaiveTime::MIN)
            .and_utc();
        let rows = sqlx::query_as::<_, Event>(
            "SELECT id, title, date, ticket_price FROM events \
             WHERE date >= $1 AND date < $2 ORDER BY id LIMIT $3 OFFSET $4",
        )
        .bind(start)
        .bind(end)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        strict_page(rows, page)
    }

    async fn insert(&self, draft: NewEvent) -> Result<Event, StorageError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (title, date, ticket_price) VALUES ($1, $2, $3) \
             RETURNING id, title, date, ticket_price",
        )
        .bind(&draft.title)
        .bind(draft.date)
        .bind(draft.ticket_price)
        .fetch_one(&self.pool)
        .await
        .map_err(on_write("event"))
    }

    async fn update(&self, event: &Event) -> Result<Event, StorageError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET title = $2, date = $3, ticket_price = $4 WHERE id = $1 \
             RETURNING id, title, date, ticket_price",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(event.date)
        .bind(event.ticket_price)
        .fetch_optional(&self.pool)
        .await
        .map_err(on_write("event"))?
        .ok_or(StorageError::NotFound("event"))
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        // Tickets go with the event via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("event"));
        }
        Ok(())
    }

    async fn exists_by_title_and_date(
        &self,
        title: &str,
        date: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM events WHERE title = $1 AND date = $2)",
        )
        .bind(title)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
