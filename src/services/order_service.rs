use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::{
    db::OrmConn,
    dto::orders::{CreateOrderRequest, UpdateOrderRequest},
    entity::{
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        products::Entity as Products,
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    services::{product_service::product_from_entity, user_service::user_from_entity},
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_positive_quantity(payload.quantity)?;

    let order_date = payload.order_date.unwrap_or_else(Utc::now);
    let order = OrderActive {
        id: NotSet,
        user_id: Set(payload.user_id),
        product_id: Set(payload.product_id),
        quantity: Set(payload.quantity),
        order_date: Set(order_date.into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(order_id = order.id, user_id = order.user_id, "order created");

    let order = attach_one(&state.orm, order).await?;
    Ok(ApiResponse::success("Order created", order, Some(Meta::empty())))
}

pub async fn list_orders(state: &AppState, query: ListQuery) -> AppResult<ApiResponse<Vec<Order>>> {
    let (skip, limit) = query.normalize()?;
    let finder = Orders::find().order_by_asc(OrderCol::Id);

    let total = finder.clone().count(&state.orm).await?;

    let orders = finder
        .offset(skip)
        .limit(limit)
        .all(&state.orm)
        .await?;
    let items = attach_relations(&state.orm, orders).await?;

    Ok(ApiResponse::success("Ok", items, Some(Meta::new(skip, limit, total))))
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let order = attach_one(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn update_order(
    state: &AppState,
    id: i32,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.clone().into();
    if let Some(user_id) = payload.user_id {
        active.user_id = Set(user_id);
    }
    if let Some(product_id) = payload.product_id {
        active.product_id = Set(product_id);
    }
    if let Some(quantity) = payload.quantity {
        ensure_positive_quantity(quantity)?;
        active.quantity = Set(quantity);
    }
    if let Some(order_date) = payload.order_date {
        active.order_date = Set(order_date.into());
    }

    let order = if active.is_changed() {
        let order = active.update(&state.orm).await?;
        tracing::info!(order_id = order.id, "order updated");
        order
    } else {
        existing
    };

    let order = attach_one(&state.orm, order).await?;
    Ok(ApiResponse::success("Updated", order, Some(Meta::empty())))
}

pub async fn delete_order(state: &AppState, id: i32) -> AppResult<()> {
    let result = Orders::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(order_id = id, "order deleted");
    Ok(())
}

/// Orders placed by a user. An empty result is reported as not found.
pub async fn list_orders_by_user(
    state: &AppState,
    user_id: i32,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .order_by_asc(OrderCol::Id)
        .all(&state.orm)
        .await?;
    if orders.is_empty() {
        return Err(AppError::NotFound);
    }

    let items = attach_relations(&state.orm, orders).await?;
    Ok(ApiResponse::success("Ok", items, Some(Meta::empty())))
}

/// Orders of a product. An empty result is reported as not found.
pub async fn list_orders_by_product(
    state: &AppState,
    product_id: i32,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = Orders::find()
        .filter(OrderCol::ProductId.eq(product_id))
        .order_by_asc(OrderCol::Id)
        .all(&state.orm)
        .await?;
    if orders.is_empty() {
        return Err(AppError::NotFound);
    }

    let items = attach_relations(&state.orm, orders).await?;
    Ok(ApiResponse::success("Ok", items, Some(Meta::empty())))
}

fn ensure_positive_quantity(quantity: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

async fn attach_one(conn: &OrmConn, order: OrderModel) -> AppResult<Order> {
    let mut orders = attach_relations(conn, vec![order]).await?;
    orders
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order vanished while loading relations")))
}

/// Load the user and product of every order in two batched queries,
/// preserving the input order.
pub(crate) async fn attach_relations(
    conn: &OrmConn,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<Order>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let users = orders.load_one(Users, conn).await?;
    let products = orders.load_one(Products, conn).await?;

    orders
        .into_iter()
        .zip(users)
        .zip(products)
        .map(|((order, user), product)| {
            let user = user.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "order {} references missing user {}",
                    order.id,
                    order.user_id
                ))
            })?;
            let product = product.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "order {} references missing product {}",
                    order.id,
                    order.product_id
                ))
            })?;
            Ok(Order {
                id: order.id,
                user_id: order.user_id,
                product_id: order.product_id,
                quantity: order.quantity,
                order_date: order.order_date.with_timezone(&Utc),
                user: user_from_entity(user),
                product: product_from_entity(product),
            })
        })
        .collect()
}
