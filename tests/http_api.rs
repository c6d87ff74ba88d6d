//! Route-level tests over the in-memory backend.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use tickethub_server::routes::create_routes;
use tickethub_server::services::BookingFacade;
use tickethub_server::state::AppState;
use tickethub_server::storage::Stores;

fn app() -> Router {
    create_routes(AppState::new(BookingFacade::new(Stores::in_memory())))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn seed_user(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        post("/users", json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

async fn seed_event(app: &Router, title: &str, date: &str) -> i64 {
    let (status, body) = send(
        app,
        post(
            "/events",
            json!({"title": title, "date": date, "ticketPrice": "40"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_check_reports_ok() {
    let app = app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn booking_flow_end_to_end() {
    let app = app();
    let user_id = seed_user(&app).await;
    let event_id = seed_event(&app, "opening", "16-05-2022 12:00").await;

    let (status, _) = send(
        &app,
        post("/accounts/refill", json!({"userId": user_id, "money": "100"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let book = json!({
        "userId": user_id,
        "eventId": event_id,
        "place": 5,
        "category": "PREMIUM"
    });
    let (status, body) = send(&app, post("/tickets", book.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["place"], 5);
    assert_eq!(body["data"]["category"], "PREMIUM");

    // The same slot cannot be booked twice, and the failed attempt must not
    // touch the balance.
    let (status, body) = send(&app, post("/tickets", book)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, body) = send(&app, get(&format!("/accounts/user/{user_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["money"], "60");
}

#[tokio::test]
async fn refill_creates_the_account_on_first_use() {
    let app = app();
    let user_id = seed_user(&app).await;

    let (status, _) = send(&app, get(&format!("/accounts/user/{user_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        post("/accounts/refill", json!({"userId": user_id, "money": "50"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["money"], "50");
}

#[tokio::test]
async fn booking_with_insufficient_funds_is_a_conflict() {
    let app = app();
    let user_id = seed_user(&app).await;
    let event_id = seed_event(&app, "opening", "16-05-2022 12:00").await;
    send(
        &app,
        post("/accounts/refill", json!({"userId": user_id, "money": "10"})),
    )
    .await;

    let (status, body) = send(
        &app,
        post(
            "/tickets",
            json!({"userId": user_id, "eventId": event_id, "place": 1, "category": "BAR"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "insufficient funds");
}

#[tokio::test]
async fn events_by_title_returns_the_exact_page() {
    let app = app();
    seed_event(&app, "Third event", "16-05-2022 12:00").await;
    seed_event(&app, "Third event", "17-05-2022 12:00").await;
    seed_event(&app, "other", "18-05-2022 12:00").await;

    let (status, body) = send(
        &app,
        get("/events?title=Third%20event&pageSize=2&pageNum=1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Past the end of the result set the strict window fails.
    let (status, _) = send(
        &app,
        get("/events?title=Third%20event&pageSize=2&pageNum=2"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn windowed_finders_require_page_params() {
    let app = app();
    let (status, body) = send(&app, get("/events?title=opening")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn duplicate_event_slot_is_a_conflict() {
    let app = app();
    seed_event(&app, "opening", "16-05-2022 12:00").await;
    let (status, body) = send(
        &app,
        post(
            "/events",
            json!({"title": "opening", "date": "16-05-2022 12:00", "ticketPrice": "40"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn an_event_can_be_renamed_in_place() {
    let app = app();
    let event_id = seed_event(&app, "opening", "16-05-2022 12:00").await;

    let (status, body) = send(
        &app,
        put(
            "/events",
            json!({
                "id": event_id,
                "title": "opening night",
                "date": "16-05-2022 12:00",
                "ticketPrice": "40"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "opening night");

    let (status, body) = send(&app, get(&format!("/events/{event_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "opening night");
}

#[tokio::test]
async fn a_booked_ticket_can_be_moved_to_a_free_place() {
    let app = app();
    let user_id = seed_user(&app).await;
    let event_id = seed_event(&app, "opening", "16-05-2022 12:00").await;
    send(
        &app,
        post("/accounts/refill", json!({"userId": user_id, "money": "100"})),
    )
    .await;
    let (_, body) = send(
        &app,
        post(
            "/tickets",
            json!({"userId": user_id, "eventId": event_id, "place": 5, "category": "STANDARD"}),
        ),
    )
    .await;
    let ticket_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        put(
            "/tickets",
            json!({
                "id": ticket_id,
                "userId": user_id,
                "eventId": event_id,
                "place": 6,
                "category": "STANDARD"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["place"], 6);
}

#[tokio::test]
async fn malformed_dates_are_rejected() {
    let app = app();
    let (status, _) = send(
        &app,
        post(
            "/events",
            json!({"title": "opening", "date": "2022-05-16", "ticketPrice": "40"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_missing_ticket_is_not_found() {
    let app = app();
    let (status, body) = send(&app, delete("/tickets/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn user_lookup_by_email_matches_exactly() {
    let app = app();
    seed_user(&app).await;
    let (status, body) = send(&app, get("/users?email=ada@example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada");

    let (status, _) = send(&app, get("/users?email=da@example.com")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_user_cascades_to_their_tickets() {
    let app = app();
    let user_id = seed_user(&app).await;
    let event_id = seed_event(&app, "opening", "16-05-2022 12:00").await;
    send(
        &app,
        post("/accounts/refill", json!({"userId": user_id, "money": "100"})),
    )
    .await;
    send(
        &app,
        post(
            "/tickets",
            json!({"userId": user_id, "eventId": event_id, "place": 5, "category": "STANDARD"}),
        ),
    )
    .await;

    let (status, _) = send(&app, delete(&format!("/users/{user_id}"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        get(&format!("/tickets/user/{user_id}?pageSize=1&pageNum=1")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
