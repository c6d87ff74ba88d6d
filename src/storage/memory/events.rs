use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use super::codec::{decode, encode};
use super::{entry_key, ns_entries, KvStore, NS_EVENT, NS_TICKET};
use crate::models::{Event, NewEvent, Ticket};
use crate::storage::{window, EventStore, Page, StorageError};

pub struct MemoryEventStore {
    kv: Arc<KvStore>,
}

impl MemoryEventStore {
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }
}

fn scan_events(map: &HashMap<String, String>) -> Result<Vec<Event>, StorageError> {
    ns_entries(map, NS_EVENT)
        .into_iter()
        .map(|(_, raw)| decode::<Event>(&raw))
        .collect()
}

fn has_title_and_date(
    events: &[Event],
    title: &str,
    date: DateTime<Utc>,
    excluding: Option<i64>,
) -> bool {
    events
        .iter()
        .any(|e| e.title == title && e.date == date && Some(e.id) != excluding)
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn get(&self, id: i64) -> Result<Event, StorageError> {
        self.kv.with_read(|map| {
            map.get(&entry_key(NS_EVENT, id))
                .ok_or(StorageError::NotFound("event"))
                .and_then(|raw| decode(raw))
        })
    }

    async fn list(&self) -> Result<Vec<Event>, StorageError> {
        self.kv.with_read(scan_events)
    }

    async fn find_by_title(&self, title: &str, page: Page) -> Result<Vec<Event>, StorageError> {
        let matching: Vec<Event> = self
            .kv
            .with_read(scan_events)?
            .into_iter()
            .filter(|e| e.title == title)
            .collect();
        window(matching, page)
    }

    async fn find_for_day(&self, day: NaiveDate, page: Page) -> Result<Vec<Event>, StorageError> {
        let matching: Vec<Event> = self
            .kv
            .with_read(scan_events)?
            .into_iter()
            .filter(|e| e.date.date_naive() == day)
            .collect();
        window(matching, page)
    }

    async fn insert(&self, draft: NewEvent) -> Result<Event, StorageError> {
        self.kv.with_write(|map| {
            let events = scan_events(map)?;
            if has_title_and_date(&events, &draft.title, draft.date, None) {
                return Err(StorageError::Duplicate("event"));
            }
            let event = Event {
                id: self.kv.next_id(NS_EVENT, map),
                title: draft.title,
                date: draft.date,
                ticket_price: draft.ticket_price,
            };
            let raw = encode(&event)?;
            map.insert(entry_key(NS_EVENT, event.id), raw);
            Ok(event)
        })
    }

    async fn update(&self, event: &Event) -> Result<Event, StorageError> {
        self.kv.with_write(|map| {
            if !map.contains_key(&entry_key(NS_EVENT, event.id)) {
                return Err(StorageError::NotFound("event"));
            }
            let events = scan_events(map)?;
            if has_title_and_date(&events, &event.title, event.date, Some(event.id)) {
                return Err(StorageError::Duplicate("event"));
            }
            let raw = encode(event)?;
            map.insert(entry_key(NS_EVENT, event.id), raw);
            Ok(event.clone())
        })
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        self.kv.with_write(|map| {
            if map.remove(&entry_key(NS_EVENT, id)).is_none() {
                return Err(StorageError::NotFound("event"));
            }
            // Cascade: the event owns its tickets.
            let owned: Vec<i64> = ns_entries(map, NS_TICKET)
                .into_iter()
                .filter_map(|(ticket_id, raw)| {
                    decode::<Ticket>(&raw)
                        .ok()
                        .filter(|t| t.event_id == id)
                        .map(|_| ticket_id)
                })
                .collect();
            for ticket_id in owned {
                map.remove(&entry_key(NS_TICKET, ticket_id));
            }
            Ok(())
        })
    }

    async fn exists_by_title_and_date(
        &self,
        title: &str,
        date: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let events = self.kv.with_read(scan_events)?;
        Ok(has_title_and_date(&events, title, date, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn store() -> MemoryEventStore {
        MemoryEventStore::new(Arc::new(KvStore::new()))
    }

    fn draft(title: &str, day: u32, hour: u32) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            date: Utc.with_ymd_and_hms(2022, 5, day, hour, 0, 0).unwrap(),
            ticket_price: Decimal::from(50),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = store();
        for n in 1..=12 {
            let event = store.insert(draft(&format!("event {n}"), 16, 12)).await.unwrap();
            assert_eq!(event.id, n);
        }
    }

    #[tokio::test]
    async fn insert_after_six_existing_yields_seven() {
        let store = store();
        for n in 1..=6 {
            store.insert(draft(&format!("event {n}"), 16, 12)).await.unwrap();
        }
        let event = store.insert(draft("Third event", 16, 12)).await.unwrap();
        assert_eq!(event.id, 7);
    }

    #[tokio::test]
    async fn rejected_insert_does_not_consume_an_id() {
        let store = store();
        store.insert(draft("opening", 16, 12)).await.unwrap();
        store.insert(draft("opening", 16, 12)).await.unwrap_err();
        let next = store.insert(draft("second", 16, 12)).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn duplicate_title_and_date_is_rejected() {
        let store = store();
        store.insert(draft("opening", 16, 12)).await.unwrap();
        let err = store.insert(draft("opening", 16, 12)).await.unwrap_err();
        assert!(matches!(err, StorageError::Duplicate("event")));
        // Same title on another date is fine.
        store.insert(draft("opening", 17, 12)).await.unwrap();
    }

    #[tokio::test]
    async fn update_rejects_stealing_another_events_slot() {
        let store = store();
        store.insert(draft("first", 16, 12)).await.unwrap();
        let mut second = store.insert(draft("second", 16, 12)).await.unwrap();
        second.title = "first".to_string();
        let err = store.update(&second).await.unwrap_err();
        assert!(matches!(err, StorageError::Duplicate("event")));
    }

    #[tokio::test]
    async fn update_of_missing_event_fails() {
        let store = store();
        let ghost = Event {
            id: 999,
            title: "ghost".to_string(),
            date: Utc.with_ymd_and_hms(2022, 5, 16, 12, 0, 0).unwrap(),
            ticket_price: Decimal::from(10),
        };
        assert!(matches!(
            store.update(&ghost).await,
            Err(StorageError::NotFound("event"))
        ));
    }

    #[tokio::test]
    async fn find_by_title_pages_strictly() {
        let store = store();
        store.insert(draft("Third event", 16, 12)).await.unwrap();
        store.insert(draft("Third event", 17, 12)).await.unwrap();
        store.insert(draft("other", 18, 12)).await.unwrap();

        let page = Page::new(2, 1).unwrap();
        let found = store.find_by_title("Third event", page).await.unwrap();
        assert_eq!(found.len(), 2);

        let overshoot = Page::new(2, 2).unwrap();
        assert!(matches!(
            store.find_by_title("Third event", overshoot).await,
            Err(StorageError::PageOutOfRange)
        ));
    }

    #[tokio::test]
    async fn find_for_day_matches_the_calendar_date() {
        let store = store();
        store.insert(draft("morning", 16, 9)).await.unwrap();
        store.insert(draft("evening", 16, 20)).await.unwrap();
        store.insert(draft("next day", 17, 9)).await.unwrap();

        let day = NaiveDate::from_ymd_opt(2022, 5, 16).unwrap();
        let found = store
            .find_for_day(day, Page::new(2, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|e| e.date.date_naive() == day));
    }

    #[tokio::test]
    async fn delete_of_missing_event_leaves_store_unchanged() {
        let store = store();
        store.insert(draft("kept", 16, 12)).await.unwrap();
        assert!(matches!(
            store.delete(999).await,
            Err(StorageError::NotFound("event"))
        ));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
