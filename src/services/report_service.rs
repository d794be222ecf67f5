//! Derived order views: joins, sorting, set union, subquery filters and
//! per-user aggregates.

use chrono::Utc;
use sea_orm::sea_query::{
    Alias, ConditionalStatement, Expr, Func, Query, SelectStatement, SimpleExpr, UnionType,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, prelude::DateTimeWithTimeZone,
};

use crate::{
    dto::orders::{OrderDetail, OrderQuantity, UserOrderStats},
    entity::{
        orders::{self, Column as OrderCol, Entity as Orders},
        products::{Column as ProdCol, Entity as Products},
        users::Column as UserCol,
    },
    error::{AppError, AppResult},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    services::order_service::attach_relations,
    state::AppState,
};

pub const DEFAULT_PRICE_THRESHOLD: f64 = 100.0;

#[derive(Debug, FromQueryResult)]
struct OrderDetailRow {
    order_id: i32,
    quantity: i32,
    order_date: DateTimeWithTimeZone,
    user_name: String,
    user_email: String,
    product_title: String,
    product_price: f64,
}

#[derive(Debug, FromQueryResult)]
struct OrderQuantityRow {
    order_id: i32,
    quantity: i32,
    order_date: DateTimeWithTimeZone,
}

#[derive(Debug, FromQueryResult)]
struct UserStatsRow {
    user_id: i32,
    order_count: i64,
    total_spent: f64,
    average_spent: f64,
    last_purchase_date: DateTimeWithTimeZone,
}

/// Orders inner-joined with their user and product.
pub async fn list_order_details(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<OrderDetail>>> {
    let (skip, limit) = query.normalize()?;

    let joined = Orders::find()
        .join(JoinType::InnerJoin, orders::Relation::Users.def())
        .join(JoinType::InnerJoin, orders::Relation::Products.def());

    let total = joined.clone().count(&state.orm).await?;

    let rows = joined
        .select_only()
        .column_as(OrderCol::Id, "order_id")
        .column(OrderCol::Quantity)
        .column(OrderCol::OrderDate)
        .column_as(UserCol::Name, "user_name")
        .column_as(UserCol::Email, "user_email")
        .column_as(ProdCol::Title, "product_title")
        .column_as(ProdCol::Price, "product_price")
        .order_by_asc(OrderCol::Id)
        .offset(skip)
        .limit(limit)
        .into_model::<OrderDetailRow>()
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(|row| OrderDetail {
            order_id: row.order_id,
            quantity: row.quantity,
            order_date: row.order_date.with_timezone(&Utc),
            user_name: row.user_name,
            user_email: row.user_email,
            product_title: row.product_title,
            product_price: row.product_price,
        })
        .collect();

    Ok(ApiResponse::success("Ok", items, Some(Meta::new(skip, limit, total))))
}

/// Every order, newest first.
pub async fn list_orders_by_date(state: &AppState) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = Orders::find()
        .order_by_desc(OrderCol::OrderDate)
        .order_by_asc(OrderCol::Id)
        .all(&state.orm)
        .await?;

    let items = attach_relations(&state.orm, orders).await?;
    Ok(ApiResponse::success("Ok", items, Some(Meta::empty())))
}

/// Orders for products priced strictly above `price_threshold`.
pub async fn list_high_value_orders(
    state: &AppState,
    price_threshold: f64,
) -> AppResult<ApiResponse<Vec<Order>>> {
    if !price_threshold.is_finite() {
        return Err(AppError::BadRequest(
            "price_threshold must be a finite number".to_string(),
        ));
    }

    let pricey_products = Query::select()
        .column(ProdCol::Id)
        .from(Products)
        .and_where(ProdCol::Price.gt(price_threshold))
        .to_owned();

    let orders = Orders::find()
        .filter(OrderCol::ProductId.in_subquery(pricey_products))
        .order_by_asc(OrderCol::Id)
        .all(&state.orm)
        .await?;

    let items = attach_relations(&state.orm, orders).await?;
    Ok(ApiResponse::success("Ok", items, Some(Meta::empty())))
}

/// Bulk orders (quantity > 5) united with single-item orders (quantity < 2).
pub async fn list_quantity_union(state: &AppState) -> AppResult<ApiResponse<Vec<OrderQuantity>>> {
    let single = quantity_select()
        .and_where(OrderCol::Quantity.lt(2))
        .to_owned();
    let union = quantity_select()
        .and_where(OrderCol::Quantity.gt(5))
        .union(UnionType::Distinct, single)
        .to_owned();

    let backend: DbBackend = state.orm.get_database_backend();
    let mut rows = OrderQuantityRow::find_by_statement(backend.build(&union))
        .all(&state.orm)
        .await?;
    rows.sort_by_key(|row| row.order_id);

    let items = rows
        .into_iter()
        .map(|row| OrderQuantity {
            order_id: row.order_id,
            quantity: row.quantity,
            order_date: row.order_date.with_timezone(&Utc),
        })
        .collect();

    Ok(ApiResponse::success("Ok", items, Some(Meta::empty())))
}

fn quantity_select() -> SelectStatement {
    Query::select()
        .expr_as(Expr::col(OrderCol::Id), Alias::new("order_id"))
        .column(OrderCol::Quantity)
        .column(OrderCol::OrderDate)
        .from(Orders)
        .to_owned()
}

/// Per-user order count, spend and last purchase. Users without orders are absent.
pub async fn list_user_stats(state: &AppState) -> AppResult<ApiResponse<Vec<UserOrderStats>>> {
    let spent = Expr::col((Orders, OrderCol::Quantity)).mul(Expr::col((Products, ProdCol::Price)));

    let rows = Orders::find()
        .select_only()
        .column(OrderCol::UserId)
        .column_as(
            SimpleExpr::FunctionCall(Func::count(Expr::col((Orders, OrderCol::Id)))),
            "order_count",
        )
        .column_as(
            SimpleExpr::FunctionCall(Func::sum(spent.clone())),
            "total_spent",
        )
        .column_as(SimpleExpr::FunctionCall(Func::avg(spent)), "average_spent")
        .column_as(
            SimpleExpr::FunctionCall(Func::max(Expr::col((Orders, OrderCol::OrderDate)))),
            "last_purchase_date",
        )
        .join(JoinType::InnerJoin, orders::Relation::Products.def())
        .group_by(OrderCol::UserId)
        .order_by_asc(OrderCol::UserId)
        .into_model::<UserStatsRow>()
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(|row| UserOrderStats {
            user_id: row.user_id,
            order_count: row.order_count,
            total_spent: row.total_spent,
            average_spent: row.average_spent,
            last_purchase_date: row.last_purchase_date.with_timezone(&Utc),
        })
        .collect();

    Ok(ApiResponse::success("Ok", items, Some(Meta::empty())))
}
