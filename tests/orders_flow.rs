mod common;

use chrono::{Duration, Utc};
use shop_orders_api::{
    dto::orders::{CreateOrderRequest, UpdateOrderRequest},
    entity::{Orders, products, users},
    error::AppError,
    routes::params::ListQuery,
    services::{order_service, product_service, user_service},
};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use common::{at, create_order, create_product, create_user, setup_state};

#[tokio::test]
async fn created_order_reads_back_with_defaults() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "Alice", "alice@example.com").await?;
    let product = create_product(&state, "Mouse", 25.0).await?;

    let before = Utc::now() - Duration::seconds(1);
    let created = create_order(&state, user.id, product.id, 3, None).await?;
    let after = Utc::now() + Duration::seconds(1);

    assert_eq!(created.user_id, user.id);
    assert_eq!(created.product_id, product.id);
    assert_eq!(created.quantity, 3);
    assert!(created.order_date >= before && created.order_date <= after);
    assert_eq!(created.user, user);
    assert_eq!(created.product, product);

    let fetched = order_service::get_order(&state, created.id)
        .await?
        .data
        .expect("order data");
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn explicit_order_date_is_kept() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "Alice", "alice@example.com").await?;
    let product = create_product(&state, "Mouse", 25.0).await?;

    let date = at("2024-03-01T09:30:00Z");
    let created = create_order(&state, user.id, product.id, 1, Some(date)).await?;
    assert_eq!(created.order_date, date);
    Ok(())
}

#[tokio::test]
async fn missing_parent_is_a_constraint_violation() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "Alice", "alice@example.com").await?;
    let product = create_product(&state, "Mouse", 25.0).await?;

    let missing_user = order_service::create_order(
        &state,
        CreateOrderRequest {
            user_id: user.id + 100,
            product_id: product.id,
            quantity: 1,
            order_date: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(missing_user, AppError::ConstraintViolation(_)));

    let missing_product = order_service::create_order(
        &state,
        CreateOrderRequest {
            user_id: user.id,
            product_id: product.id + 100,
            quantity: 1,
            order_date: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(missing_product, AppError::ConstraintViolation(_)));

    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "Alice", "alice@example.com").await?;
    let product = create_product(&state, "Mouse", 25.0).await?;

    for quantity in [0, -2] {
        let err = order_service::create_order(
            &state,
            CreateOrderRequest {
                user_id: user.id,
                product_id: product.id,
                quantity,
                order_date: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn update_quantity_leaves_other_fields() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "Alice", "alice@example.com").await?;
    let product = create_product(&state, "Mouse", 25.0).await?;
    let original = create_order(&state, user.id, product.id, 2, Some(at("2024-01-05T12:00:00Z"))).await?;

    let updated = order_service::update_order(
        &state,
        original.id,
        UpdateOrderRequest {
            quantity: Some(5),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("order data");

    assert_eq!(updated.quantity, 5);
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.user_id, original.user_id);
    assert_eq!(updated.product_id, original.product_id);
    assert_eq!(updated.order_date, original.order_date);
    Ok(())
}

#[tokio::test]
async fn update_edge_cases() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "Alice", "alice@example.com").await?;
    let product = create_product(&state, "Mouse", 25.0).await?;
    let other = create_product(&state, "Keyboard", 80.0).await?;
    let order = create_order(&state, user.id, product.id, 2, None).await?;

    let unchanged = order_service::update_order(&state, order.id, UpdateOrderRequest::default())
        .await?
        .data
        .expect("order data");
    assert_eq!(unchanged, order);

    let moved = order_service::update_order(
        &state,
        order.id,
        UpdateOrderRequest {
            product_id: Some(other.id),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(moved.product, other);

    let err = order_service::update_order(
        &state,
        order.id,
        UpdateOrderRequest {
            user_id: Some(user.id + 50),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::ConstraintViolation(_)));

    let err = order_service::update_order(
        &state,
        order.id,
        UpdateOrderRequest {
            quantity: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = order_service::update_order(&state, order.id + 1, UpdateOrderRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn delete_removes_the_order() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "Alice", "alice@example.com").await?;
    let product = create_product(&state, "Mouse", 25.0).await?;
    let order = create_order(&state, user.id, product.id, 2, None).await?;

    order_service::delete_order(&state, order.id).await?;

    let err = order_service::get_order(&state, order.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    let err = order_service::delete_order(&state, order.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn deleting_a_user_cascades_to_orders() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "Alice", "alice@example.com").await?;
    let bob = create_user(&state, "Bob", "bob@example.com").await?;
    let product = create_product(&state, "Mouse", 25.0).await?;
    let first = create_order(&state, alice.id, product.id, 1, None).await?;
    let second = create_order(&state, alice.id, product.id, 4, None).await?;
    let kept = create_order(&state, bob.id, product.id, 2, None).await?;

    user_service::delete_user(&state, alice.id).await?;

    for id in [first.id, second.id] {
        let err = order_service::get_order(&state, id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
    assert!(order_service::get_order(&state, kept.id).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn deleting_a_product_cascades_to_orders() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "Alice", "alice@example.com").await?;
    let mouse = create_product(&state, "Mouse", 25.0).await?;
    let keyboard = create_product(&state, "Keyboard", 80.0).await?;
    let gone = create_order(&state, user.id, mouse.id, 1, None).await?;
    let kept = create_order(&state, user.id, keyboard.id, 1, None).await?;

    product_service::delete_product(&state, mouse.id).await?;

    let err = order_service::get_order(&state, gone.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert!(order_service::get_order(&state, kept.id).await.is_ok());
    Ok(())
}

#[tokio::test]
async fn lists_by_user_and_product() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "Alice", "alice@example.com").await?;
    let bob = create_user(&state, "Bob", "bob@example.com").await?;
    let mouse = create_product(&state, "Mouse", 25.0).await?;
    let keyboard = create_product(&state, "Keyboard", 80.0).await?;
    let a1 = create_order(&state, alice.id, mouse.id, 1, None).await?;
    let a2 = create_order(&state, alice.id, keyboard.id, 2, None).await?;
    create_order(&state, bob.id, mouse.id, 3, None).await?;

    let by_alice = order_service::list_orders_by_user(&state, alice.id)
        .await?
        .data
        .expect("orders");
    assert_eq!(
        by_alice.iter().map(|o| o.id).collect::<Vec<_>>(),
        vec![a1.id, a2.id]
    );

    let by_mouse = order_service::list_orders_by_product(&state, mouse.id)
        .await?
        .data
        .expect("orders");
    assert_eq!(by_mouse.len(), 2);
    assert!(by_mouse.iter().all(|o| o.product_id == mouse.id));

    let nobody = create_user(&state, "Carol", "carol@example.com").await?;
    let err = order_service::list_orders_by_user(&state, nobody.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let unsold = create_product(&state, "Webcam", 60.0).await?;
    let err = order_service::list_orders_by_product(&state, unsold.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn list_applies_skip_and_limit() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "Alice", "alice@example.com").await?;
    let product = create_product(&state, "Mouse", 25.0).await?;
    let mut ids = Vec::new();
    for quantity in 1..=5 {
        ids.push(create_order(&state, user.id, product.id, quantity, None).await?.id);
    }

    let resp = order_service::list_orders(&state, ListQuery::new(1, 2)).await?;
    let meta = resp.meta.expect("meta");
    assert_eq!(meta.total, Some(5));
    assert_eq!(meta.skip, Some(1));
    assert_eq!(meta.limit, Some(2));
    let page: Vec<i32> = resp.data.expect("orders").iter().map(|o| o.id).collect();
    assert_eq!(page, ids[1..3].to_vec());
    Ok(())
}

#[tokio::test]
async fn store_rejects_duplicate_email_and_title() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_user(&state, "Alice", "alice@example.com").await?;
    create_product(&state, "Mouse", 25.0).await?;

    let err = users::ActiveModel {
        name: Set("Other Alice".to_string()),
        email: Set("alice@example.com".to_string()),
        age: Set(None),
        ..Default::default()
    }
    .insert(&state.orm)
    .await
    .unwrap_err();
    assert!(matches!(AppError::from(err), AppError::BadRequest(_)));

    let err = products::ActiveModel {
        title: Set("Mouse".to_string()),
        price: Set(30.0),
        description: Set("another mouse".to_string()),
        category: Set("test".to_string()),
        image: Set("https://example.com/mouse.png".to_string()),
        rating_rate: Set(3.5),
        rating_count: Set(4),
        ..Default::default()
    }
    .insert(&state.orm)
    .await
    .unwrap_err();
    assert!(matches!(AppError::from(err), AppError::BadRequest(_)));

    assert_eq!(users::Entity::find().count(&state.orm).await?, 1);
    assert_eq!(products::Entity::find().count(&state.orm).await?, 1);
    Ok(())
}
