use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefillRequest {
    user_id: i64,
    money: Decimal,
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Response, AppError> {
    let account = state.facade.accounts.get_for_user(user_id).await?;
    Ok(success(account, "Account found").into_response())
}

pub async fn refill_account(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<RefillRequest>,
) -> Result<Response, AppError> {
    let account = state.facade.accounts.refill(body.user_id, body.money).await?;
    Ok(success(account, "Account refilled").into_response())
}
