use chrono::{Duration, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use shop_orders_api::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::{
        orders::ActiveModel as OrderActive,
        products::{self, ActiveModel as ProductActive, Entity as Products},
        users::{self, ActiveModel as UserActive, Entity as Users},
        Orders,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url, 1).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let alice = ensure_user(&orm, "Alice", "alice@example.com", Some(29)).await?;
    let bob = ensure_user(&orm, "Bob", "bob@example.com", None).await?;

    let keyboard = ensure_product(&orm, "Mechanical Keyboard", 149.0, "peripherals").await?;
    let mouse = ensure_product(&orm, "Wireless Mouse", 39.5, "peripherals").await?;
    let monitor = ensure_product(&orm, "27in Monitor", 329.99, "displays").await?;

    if Orders::find().count(&orm).await? == 0 {
        let now = Utc::now();
        let samples = [
            (alice, keyboard, 1, now - Duration::days(9)),
            (alice, mouse, 6, now - Duration::days(4)),
            (bob, monitor, 2, now - Duration::days(2)),
            (bob, mouse, 1, now),
        ];
        for (user_id, product_id, quantity, order_date) in samples {
            OrderActive {
                id: NotSet,
                user_id: Set(user_id),
                product_id: Set(product_id),
                quantity: Set(quantity),
                order_date: Set(order_date.into()),
            }
            .insert(&orm)
            .await?;
        }
        println!("Seeded orders");
    }

    println!("Seed completed. Users: {alice}, {bob}");
    Ok(())
}

async fn ensure_user(
    orm: &OrmConn,
    name: &str,
    email: &str,
    age: Option<i32>,
) -> anyhow::Result<i32> {
    if let Some(existing) = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let user = UserActive {
        id: NotSet,
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        age: Set(age),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email}");
    Ok(user.id)
}

async fn ensure_product(
    orm: &OrmConn,
    title: &str,
    price: f64,
    category: &str,
) -> anyhow::Result<i32> {
    if let Some(existing) = Products::find()
        .filter(products::Column::Title.eq(title))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let product = ProductActive {
        id: NotSet,
        title: Set(title.to_string()),
        price: Set(price),
        description: Set(format!("{title} for the demo catalogue")),
        category: Set(category.to_string()),
        image: Set(String::new()),
        rating_rate: Set(4.5),
        rating_count: Set(0),
    }
    .insert(orm)
    .await?;

    println!("Ensured product {title}");
    Ok(product.id)
}
