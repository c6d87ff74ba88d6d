use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{accounts, events, health_check, tickets, users};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events", get(events::list_events))
        .route("/events", post(events::create_event))
        .route("/events", put(events::update_event))
        .route("/events/:id", get(events::get_event))
        .route("/events/:id", delete(events::delete_event))
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users", put(users::update_user))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id", delete(users::delete_user))
        .route("/tickets", post(tickets::book_ticket))
        .route("/tickets", put(tickets::update_ticket))
        .route("/tickets/:id", get(tickets::get_ticket))
        .route("/tickets/:id", delete(tickets::cancel_ticket))
        .route("/tickets/user/:user_id", get(tickets::tickets_by_user))
        .route("/tickets/event/:event_id", get(tickets::tickets_by_event))
        .route("/accounts/user/:user_id", get(accounts::get_account))
        .route("/accounts/refill", post(accounts::refill_account))
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
