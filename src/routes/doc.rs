use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        orders::{
            CreateOrderRequest, OrderDetail, OrderQuantity, UpdateOrderRequest, UserOrderStats,
        },
        products::{CreateProductRequest, UpdateProductRequest},
        users::{CreateUserRequest, UpdateUserRequest},
    },
    models::{Order, Product, User},
    response::Meta,
    routes::{health, orders, params, products, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::create_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        products::create_product,
        products::list_products,
        products::get_product,
        products::update_product,
        products::delete_product,
        orders::create_order,
        orders::list_orders,
        orders::list_orders_with_details,
        orders::quantity_union,
        orders::sorted_orders,
        orders::high_value_orders,
        orders::user_stats,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        orders::orders_by_user,
        orders::orders_by_product
    ),
    components(
        schemas(
            User,
            Product,
            Order,
            OrderDetail,
            OrderQuantity,
            UserOrderStats,
            CreateUserRequest,
            UpdateUserRequest,
            CreateProductRequest,
            UpdateProductRequest,
            CreateOrderRequest,
            UpdateOrderRequest,
            params::ListQuery,
            Meta
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "User endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Orders", description = "Order and order report endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
