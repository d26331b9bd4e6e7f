//! Ticket purchasing and buyer payment history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::event::Event;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::ticket::{generate_code, PurchaseSummary};

/// Tickets still available given capacity and current sales.
pub fn remaining_capacity(capacity: i32, sold: i64) -> i64 {
    (i64::from(capacity) - sold).max(0)
}

/// Buy `quantity` tickets for a published event. All rows share one purchase code
/// and are priced at the event's current price.
pub async fn purchase(
    pool: &PgPool,
    buyer_id: Uuid,
    event_id: Uuid,
    quantity: i32,
) -> Result<PurchaseSummary, AppError> {
    let mut tx = pool.begin().await?;

    // Row lock serializes concurrent purchases of the same event.
    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1 FOR UPDATE")
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?
        .filter(|e| e.is_published)
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let sold = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE event_id = $1")
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

    let remaining = remaining_capacity(event.capacity, sold);
    if i64::from(quantity) > remaining {
        return Err(AppError::Conflict(format!(
            "Only {remaining} tickets left for this event"
        )));
    }

    let code = generate_code();
    let purchase_date: DateTime<Utc> = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO tickets (code, event_id, user_id, price, purchase_date)
        SELECT $1, $2, $3, $4, $5 FROM generate_series(1, $6)
        "#,
    )
    .bind(&code)
    .bind(event_id)
    .bind(buyer_id)
    .bind(event.price)
    .bind(purchase_date)
    .bind(quantity)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        event_id = %event_id,
        buyer_id = %buyer_id,
        code = %code,
        quantity,
        "Tickets purchased"
    );

    Ok(PurchaseSummary {
        code,
        event_id,
        event_title: event.title,
        quantity: i64::from(quantity),
        total_price: event.price * Decimal::from(quantity),
        purchase_date,
    })
}

/// Caller's purchases grouped by code, most recent first.
pub async fn list_purchases(
    pool: &PgPool,
    buyer_id: Uuid,
    pagination: &Pagination,
) -> Result<PagedResult<PurchaseSummary>, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(DISTINCT code) FROM tickets WHERE user_id = $1",
    )
    .bind(buyer_id)
    .fetch_one(pool)
    .await?;

    let items = sqlx::query_as::<_, PurchaseSummary>(
        r#"
        SELECT
            t.code,
            t.event_id,
            MIN(e.title) AS event_title,
            COUNT(t.id) AS quantity,
            SUM(t.price) AS total_price,
            MAX(t.purchase_date) AS purchase_date
        FROM tickets t
        INNER JOIN events e ON e.id = t.event_id
        WHERE t.user_id = $1
        GROUP BY t.code, t.event_id
        ORDER BY MAX(t.purchase_date) DESC, t.code ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(buyer_id)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok(PagedResult::new(items, total, pagination))
}
