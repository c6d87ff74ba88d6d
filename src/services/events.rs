use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::{require_non_empty, ServiceError};
use crate::models::{Event, NewEvent};
use crate::storage::{EventStore, Page, StorageError};

#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    pub async fn get(&self, id: i64) -> Result<Event, ServiceError> {
        Ok(self.events.get(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Event>, ServiceError> {
        Ok(self.events.list().await?)
    }

    pub async fn find_by_title(
        &self,
        title: &str,
        page_size: i64,
        page_num: i64,
    ) -> Result<Vec<Event>, ServiceError> {
        require_non_empty(title, "title")?;
        let page = Page::new(page_size, page_num)?;
        Ok(self.events.find_by_title(title, page).await?)
    }

    pub async fn find_for_day(
        &self,
        day: NaiveDate,
        page_size: i64,
        page_num: i64,
    ) -> Result<Vec<Event>, ServiceError> {
        let page = Page::new(page_size, page_num)?;
        Ok(self.events.find_for_day(day, page).await?)
    }

    pub async fn create(&self, draft: NewEvent) -> Result<Event, ServiceError> {
        require_non_empty(&draft.title, "title")?;
        if draft.ticket_price < Decimal::ZERO {
            return Err(ServiceError::validation("ticket price must not be negative"));
        }
        if self
            .events
            .exists_by_title_and_date(&draft.title, draft.date)
            .await?
        {
            return Err(StorageError::Duplicate("event").into());
        }
        Ok(self.events.insert(draft).await?)
    }

    pub async fn update(&self, event: &Event) -> Result<Event, ServiceError> {
        require_non_empty(&event.title, "title")?;
        if event.ticket_price < Decimal::ZERO {
            return Err(ServiceError::validation("ticket price must not be negative"));
        }
        let current = self.events.get(event.id).await?;
        let slot_changed = current.title != event.title || current.date != event.date;
        if slot_changed
            && self
                .events
                .exists_by_title_and_date(&event.title, event.date)
                .await?
        {
            return Err(StorageError::Duplicate("event").into());
        }
        Ok(self.events.update(event).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        Ok(self.events.delete(id).await?)
    }
}
