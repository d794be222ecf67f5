use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::orders::{
        CreateOrderRequest, HighValueQuery, OrderDetail, OrderQuantity, UpdateOrderRequest,
        UserOrderStats,
    },
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    models::Order,
    response::ApiResponse,
    routes::params::ListQuery,
    services::{
        order_service,
        report_service::{self, DEFAULT_PRICE_THRESHOLD},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/with-details", get(list_orders_with_details))
        .route("/quantity-union", get(quantity_union))
        .route("/sorted", get(sorted_orders))
        .route("/high-value", get(high_value_orders))
        .route("/stats/all", get(user_stats))
        .route("/{id}", get(get_order).delete(delete_order))
        .route("/update/{id}", post(update_order))
        .route("/user/{user_id}", get(orders_by_user))
        .route("/product/{product_id}", get(orders_by_product))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<Order>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "User or product does not exist"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let resp = order_service::create_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("skip" = Option<u64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<u64>, Query, description = "Max rows, default 100"),
    ),
    responses(
        (status = 200, description = "List orders", body = ApiResponse<Vec<Order>>),
        (status = 400, description = "Invalid pagination"),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let resp = order_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/with-details",
    params(
        ("skip" = Option<u64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<u64>, Query, description = "Max rows, default 100"),
    ),
    responses(
        (status = 200, description = "Orders joined with user and product", body = ApiResponse<Vec<OrderDetail>>),
        (status = 400, description = "Invalid pagination"),
    ),
    tag = "Orders"
)]
pub async fn list_orders_with_details(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<OrderDetail>>>> {
    let resp = report_service::list_order_details(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/quantity-union",
    responses(
        (status = 200, description = "Orders with quantity > 5 or < 2", body = ApiResponse<Vec<OrderQuantity>>),
    ),
    tag = "Orders"
)]
pub async fn quantity_union(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<OrderQuantity>>>> {
    let resp = report_service::list_quantity_union(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/sorted",
    responses(
        (status = 200, description = "Orders, newest first", body = ApiResponse<Vec<Order>>),
    ),
    tag = "Orders"
)]
pub async fn sorted_orders(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let resp = report_service::list_orders_by_date(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/high-value",
    params(
        ("price_threshold" = Option<f64>, Query, description = "Exclusive product price floor, default 100.0"),
    ),
    responses(
        (status = 200, description = "Orders for products above the threshold", body = ApiResponse<Vec<Order>>),
        (status = 400, description = "Invalid threshold"),
    ),
    tag = "Orders"
)]
pub async fn high_value_orders(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<HighValueQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let threshold = query.price_threshold.unwrap_or(DEFAULT_PRICE_THRESHOLD);
    let resp = report_service::list_high_value_orders(&state, threshold).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/stats/all",
    responses(
        (status = 200, description = "Per-user order statistics", body = ApiResponse<Vec<UserOrderStats>>),
    ),
    tag = "Orders"
)]
pub async fn user_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<UserOrderStats>>>> {
    let resp = report_service::list_user_stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Get order", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/update/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = ApiResponse<Order>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "User or product does not exist"),
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "Deleted order"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    order_service::delete_order(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/orders/user/{user_id}",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Orders placed by the user", body = ApiResponse<Vec<Order>>),
        (status = 404, description = "User has no orders"),
    ),
    tag = "Orders"
)]
pub async fn orders_by_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i32>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let resp = order_service::list_orders_by_user(&state, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/product/{product_id}",
    params(
        ("product_id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Orders of the product", body = ApiResponse<Vec<Order>>),
        (status = 404, description = "Product has no orders"),
    ),
    tag = "Orders"
)]
pub async fn orders_by_product(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i32>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let resp = order_service::list_orders_by_product(&state, product_id).await?;
    Ok(Json(resp))
}
