#![allow(dead_code)]

use chrono::{DateTime, Utc};
use shop_orders_api::{
    db::{create_orm_conn, run_migrations},
    dto::{orders::CreateOrderRequest, products::CreateProductRequest, users::CreateUserRequest},
    models::{Order, Product, User},
    services::{order_service, product_service, user_service},
    state::AppState,
};

/// Fresh in-memory store with the schema applied.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:", 1).await?;
    run_migrations(&orm).await?;
    Ok(AppState { orm })
}

pub async fn create_user(state: &AppState, name: &str, email: &str) -> anyhow::Result<User> {
    let resp = user_service::create_user(
        state,
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            age: Some(30),
        },
    )
    .await?;
    Ok(resp.data.expect("user data"))
}

pub async fn create_product(state: &AppState, title: &str, price: f64) -> anyhow::Result<Product> {
    let resp = product_service::create_product(state, product_request(title, price)).await?;
    Ok(resp.data.expect("product data"))
}

pub fn product_request(title: &str, price: f64) -> CreateProductRequest {
    CreateProductRequest {
        title: title.to_string(),
        price,
        description: format!("{title} description"),
        category: "test".to_string(),
        image: "https://example.com/item.png".to_string(),
        rating_rate: 4.0,
        rating_count: 12,
    }
}

pub async fn create_order(
    state: &AppState,
    user_id: i32,
    product_id: i32,
    quantity: i32,
    order_date: Option<DateTime<Utc>>,
) -> anyhow::Result<Order> {
    let resp = order_service::create_order(
        state,
        CreateOrderRequest {
            user_id,
            product_id,
            quantity,
            order_date,
        },
    )
    .await?;
    Ok(resp.data.expect("order data"))
}

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}
