//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env).

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use evently::models::event::{CreateEvent, EventTier, EventType};
use evently::models::user::CreateUser;
use evently::services::{auth, event, ticket};

const DEMO_PASSWORD: &str = "Evently123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = evently::db::create_pool(&db_url, 5).await?;
    evently::db::run_migrations(&pool).await?;

    println!("=== Evently Seed Script ===");

    let host = ensure_user(&pool, "host@evently.local", "Demo Host").await?;
    let buyer = ensure_user(&pool, "buyer@evently.local", "Demo Buyer").await?;
    seed_events(&pool, host, buyer).await?;

    println!("\n=== Seed complete! ===");
    println!("Host login: host@evently.local / {DEMO_PASSWORD}");
    println!("Buyer login: buyer@evently.local / {DEMO_PASSWORD}");

    Ok(())
}

async fn ensure_user(pool: &PgPool, email: &str, full_name: &str) -> anyhow::Result<Uuid> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if let Some(id) = existing {
        println!("[skip] User {email} already exists");
        return Ok(id);
    }

    let user = auth::signup(
        pool,
        &CreateUser {
            email: email.to_string(),
            password: DEMO_PASSWORD.to_string(),
            full_name: full_name.to_string(),
        },
    )
    .await?;
    println!("[done] Created user {email}");
    Ok(user.id)
}

async fn seed_events(pool: &PgPool, host: Uuid, buyer: Uuid) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE user_id = $1")
        .bind(host)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Host already has {count} events");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let samples = [
        ("Harbour Jazz Night", 3, "Lisbon", EventTier::Gold, 2500, 120, 2),
        ("Street Food Festival", 10, "Porto", EventTier::Silver, 800, 500, 4),
        ("Indie Game Showcase", 20, "Braga", EventTier::Silver, 1200, 200, 1),
        ("New Year Gala", 75, "Lisbon", EventTier::Platinum, 9900, 80, 3),
    ];

    for (title, days_out, location, tier, price_cents, capacity, tickets) in samples {
        let created = event::create(
            pool,
            host,
            &CreateEvent {
                title: title.to_string(),
                description: format!("{title} in {location}"),
                date: today + Duration::days(days_out),
                time: "19:00".to_string(),
                location: location.to_string(),
                event_type: EventType::Public,
                tier,
                price: Decimal::new(price_cents, 2),
                capacity,
                logistics_phone: None,
                image_urls: vec![format!("/uploads/{}.jpg", title.to_lowercase().replace(' ', "-"))],
            },
        )
        .await?;
        event::publish(pool, host, created.event.id).await?;
        ticket::purchase(pool, buyer, created.event.id, tickets).await?;
        println!("[done] Created event '{title}' with {tickets} tickets sold");
    }

    Ok(())
}
