use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's prepaid balance. At most one account per user; created lazily on
/// the first refill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub user_id: i64,
    pub money: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: i64,
    pub money: Decimal,
}
