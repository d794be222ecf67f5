use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    /// Defaults to the time the order is stored.
    pub order_date: Option<DateTime<Utc>>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub user_id: Option<i32>,
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
    pub order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HighValueQuery {
    pub price_threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub order_id: i32,
    pub quantity: i32,
    pub order_date: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
    pub product_title: String,
    pub product_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderQuantity {
    pub order_id: i32,
    pub quantity: i32,
    pub order_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserOrderStats {
    pub user_id: i32,
    pub order_count: i64,
    pub total_spent: f64,
    pub average_spent: f64,
    pub last_purchase_date: DateTime<Utc>,
}
