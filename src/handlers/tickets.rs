use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::page_params;
use crate::models::{Ticket, TicketCategory};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    page_size: Option<i64>,
    page_num: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTicketRequest {
    user_id: i64,
    event_id: i64,
    place: i32,
    category: TicketCategory,
}

pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let ticket = state.facade.tickets.get(id).await?;
    Ok(success(ticket, "Ticket found").into_response())
}

pub async fn tickets_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let (size, num) = page_params(query.page_size, query.page_num)?;
    let tickets = state.facade.tickets.find_by_user(user_id, size, num).await?;
    Ok(success(tickets, "Tickets found for user").into_response())
}

pub async fn tickets_by_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let (size, num) = page_params(query.page_size, query.page_num)?;
    let tickets = state
        .facade
        .tickets
        .find_by_event(event_id, size, num)
        .await?;
    Ok(success(tickets, "Tickets found for event").into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    id: i64,
    user_id: i64,
    event_id: i64,
    place: i32,
    category: TicketCategory,
}

pub async fn update_ticket(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<UpdateTicketRequest>,
) -> Result<Response, AppError> {
    let ticket = Ticket {
        id: body.id,
        user_id: body.user_id,
        event_id: body.event_id,
        place: body.place,
        category: body.category,
    };
    let ticket = state.facade.tickets.update(&ticket).await?;
    Ok(success(ticket, "Ticket updated").into_response())
}

pub async fn book_ticket(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<BookTicketRequest>,
) -> Result<Response, AppError> {
    let ticket = state
        .facade
        .tickets
        .book(body.user_id, body.event_id, body.place, body.category)
        .await?;
    Ok(created(ticket, "Ticket booked").into_response())
}

pub async fn cancel_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.facade.tickets.cancel(id).await?;
    Ok(empty_success("Ticket cancelled").into_response())
}
