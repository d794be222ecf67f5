use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    dto::users::{CreateUserRequest, UpdateUserRequest},
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    state::AppState,
};

pub async fn create_user(
    state: &AppState,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_email_free(state, &payload.email).await?;

    let user = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
        email: Set(payload.email),
        age: Set(payload.age),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "user created");

    Ok(ApiResponse::success(
        "User created",
        user_from_entity(user),
        Some(Meta::empty()),
    ))
}

pub async fn list_users(state: &AppState, query: ListQuery) -> AppResult<ApiResponse<Vec<User>>> {
    let (skip, limit) = query.normalize()?;
    let finder = Users::find().order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .offset(skip)
        .limit(limit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect();

    Ok(ApiResponse::success("Users", items, Some(Meta::new(skip, limit, total))))
}

pub async fn get_user(state: &AppState, id: i32) -> AppResult<ApiResponse<User>> {
    let result = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(user_from_entity);
    let result = match result {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("User", result, Some(Meta::empty())))
}

pub async fn update_user(
    state: &AppState,
    id: i32,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    let existing = Users::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    if let Some(email) = payload.email.as_ref().filter(|e| **e != existing.email) {
        ensure_email_free(state, email).await?;
    }

    let mut active: ActiveModel = existing.clone().into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(age) = payload.age {
        active.age = Set(age);
    }

    let user = if active.is_changed() {
        let user = active.update(&state.orm).await?;
        tracing::info!(user_id = user.id, "user updated");
        user
    } else {
        existing
    };

    Ok(ApiResponse::success(
        "Updated",
        user_from_entity(user),
        Some(Meta::empty()),
    ))
}

/// Deletes the user; the store cascades the delete to the user's orders.
pub async fn delete_user(state: &AppState, id: i32) -> AppResult<()> {
    let result = Users::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(user_id = id, "user deleted");
    Ok(())
}

async fn ensure_email_free(state: &AppState, email: &str) -> AppResult<()> {
    let taken = Users::find()
        .filter(Column::Email.eq(email))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        tracing::warn!(email = %email, "duplicate email rejected");
        return Err(AppError::BadRequest("Email already registered".into()));
    }
    Ok(())
}

pub(crate) fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        age: model.age,
    }
}
