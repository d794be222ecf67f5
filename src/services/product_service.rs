use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    state::AppState,
};

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_valid_price(payload.price)?;
    ensure_title_free(state, &payload.title).await?;

    let product = ActiveModel {
        id: NotSet,
        title: Set(payload.title),
        price: Set(payload.price),
        description: Set(payload.description),
        category: Set(payload.category),
        image: Set(payload.image),
        rating_rate: Set(payload.rating_rate),
        rating_count: Set(payload.rating_count),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = product.id, "product created");

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn list_products(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let (skip, limit) = query.normalize()?;
    let finder = Products::find().order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .offset(skip)
        .limit(limit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::success("Products", items, Some(Meta::new(skip, limit, total))))
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<ApiResponse<Product>> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", result, Some(Meta::empty())))
}

pub async fn update_product(
    state: &AppState,
    id: i32,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    if let Some(title) = payload.title.as_ref().filter(|t| **t != existing.title) {
        ensure_title_free(state, title).await?;
    }

    let mut active: ActiveModel = existing.clone().into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(price) = payload.price {
        ensure_valid_price(price)?;
        active.price = Set(price);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(rating_rate) = payload.rating_rate {
        active.rating_rate = Set(rating_rate);
    }
    if let Some(rating_count) = payload.rating_count {
        active.rating_count = Set(rating_count);
    }

    let product = if active.is_changed() {
        let product = active.update(&state.orm).await?;
        tracing::info!(product_id = product.id, "product updated");
        product
    } else {
        existing
    };

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

/// Deletes the product; the store cascades the delete to its orders.
pub async fn delete_product(state: &AppState, id: i32) -> AppResult<()> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(product_id = id, "product deleted");
    Ok(())
}

fn ensure_valid_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest(
            "price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

async fn ensure_title_free(state: &AppState, title: &str) -> AppResult<()> {
    let taken = Products::find()
        .filter(Column::Title.eq(title))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        tracing::warn!(title = %title, "duplicate product title rejected");
        return Err(AppError::BadRequest("Product Title already registered".into()));
    }
    Ok(())
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        title: model.title,
        price: model.price,
        description: model.description,
        category: model.category,
        image: model.image,
        rating_rate: model.rating_rate,
        rating_count: model.rating_count,
    }
}
