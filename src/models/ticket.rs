use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Seat category. Persisted by symbolic name in both storage backends; in
/// Postgres it maps to the `ticket_category` enum type from the migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "ticket_category", rename_all = "UPPERCASE")]
pub enum TicketCategory {
    Bar,
    Premium,
    Standard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub place: i32,
    pub category: TicketCategory,
}

/// Ticket draft; the id is assigned by the store on insert.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub user_id: i64,
    pub event_id: i64,
    pub place: i32,
    pub category: TicketCategory,
}
