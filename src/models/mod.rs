pub mod account;
pub mod event;
pub mod ticket;
pub mod user;

pub use account::{NewAccount, UserAccount};
pub use event::{parse_date, Event, NewEvent, DATE_FORMAT};
pub use ticket::{NewTicket, Ticket, TicketCategory};
pub use user::{NewUser, User};
