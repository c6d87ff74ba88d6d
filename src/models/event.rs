use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Fixed date format used for event dates and day queries on the wire:
/// day-month-year hour:minute.
pub const DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Parse a date string in the fixed [`DATE_FORMAT`]; the wall-clock time is
/// interpreted as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(input.trim(), DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub date: DateTime<Utc>,
    pub ticket_price: Decimal,
}

/// Event draft; the id is assigned by the store on insert.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub date: DateTime<Utc>,
    pub ticket_price: Decimal,
}
