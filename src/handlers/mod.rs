use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod accounts;
pub mod events;
pub mod tickets;
pub mod users;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "tickethub-api",
    };

    success(payload, "Health check successful").into_response()
}

/// The windowed finders require both bounds; bound values themselves are
/// validated in the service layer.
fn page_params(page_size: Option<i64>, page_num: Option<i64>) -> Result<(i64, i64), AppError> {
    match (page_size, page_num) {
        (Some(size), Some(num)) => Ok((size, num)),
        _ => Err(AppError::ValidationError(
            "pageSize and pageNum are required".to_string(),
        )),
    }
}
