use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::page_params;
use crate::models::{parse_date, Event, NewEvent};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    title: Option<String>,
    day: Option<String>,
    page_size: Option<i64>,
    page_num: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    title: String,
    /// Fixed format: day-month-year hour:minute.
    date: String,
    ticket_price: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    id: i64,
    title: String,
    date: String,
    ticket_price: Decimal,
}

fn parse_date_param(raw: &str) -> Result<DateTime<Utc>, AppError> {
    parse_date(raw).ok_or_else(|| {
        AppError::ValidationError(format!("'{raw}' is not a valid dd-MM-yyyy HH:mm date"))
    })
}

/// `GET /events` — all events, or a page of them filtered by `title` or by
/// `day`.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Response, AppError> {
    if let Some(title) = query.title {
        let (size, num) = page_params(query.page_size, query.page_num)?;
        let events = state.facade.events.find_by_title(&title, size, num).await?;
        return Ok(success(events, "Events found by title").into_response());
    }
    if let Some(day) = query.day {
        let (size, num) = page_params(query.page_size, query.page_num)?;
        let date = parse_date_param(&day)?.date_naive();
        let events = state.facade.events.find_for_day(date, size, num).await?;
        return Ok(success(events, "Events found for day").into_response());
    }
    let events = state.facade.events.list().await?;
    Ok(success(events, "All events").into_response())
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let event = state.facade.events.get(id).await?;
    Ok(success(event, "Event found").into_response())
}

pub async fn create_event(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    let draft = NewEvent {
        title: body.title,
        date: parse_date_param(&body.date)?,
        ticket_price: body.ticket_price,
    };
    let event = state.facade.events.create(draft).await?;
    Ok(created(event, "Event created").into_response())
}

pub async fn update_event(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<UpdateEventRequest>,
) -> Result<Response, AppError> {
    let event = Event {
        id: body.id,
        title: body.title,
        date: parse_date_param(&body.date)?,
        ticket_price: body.ticket_price,
    };
    let event = state.facade.events.update(&event).await?;
    Ok(success(event, "Event updated").into_response())
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.facade.events.delete(id).await?;
    Ok(empty_success("Event deleted").into_response())
}
