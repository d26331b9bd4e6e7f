//! Event service: creation, publishing, listings, and view/share counters.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::event::{
    CreateEvent, Event, EventDetail, EventFilters, EventImage, EventSummary, OwnedEvent,
    OwnedEventDetail,
};
use crate::models::pagination::{PagedResult, Pagination};

/// Engagement counters that visitors can bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Shares,
}

impl Counter {
    fn column(self) -> &'static str {
        match self {
            Counter::Views => "views",
            Counter::Shares => "shares",
        }
    }
}

/// Create an event and its image rows in one transaction. New events start unpublished.
pub async fn create(pool: &PgPool, owner_id: Uuid, input: &CreateEvent) -> Result<EventDetail, AppError> {
    let mut tx = pool.begin().await?;

    let event = sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (
            user_id, title, description, date, time, location, event_type, tier,
            price, capacity, logistics_phone
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(owner_id)
    .bind(input.title.trim())
    .bind(&input.description)
    .bind(input.date)
    .bind(input.time.trim())
    .bind(input.location.trim())
    .bind(input.event_type)
    .bind(input.tier)
    .bind(input.price)
    .bind(input.capacity)
    .bind(input.logistics_phone.as_deref().filter(|p| !p.trim().is_empty()))
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::Validation("Invalid user ID. Please log in again.".to_string())
        }
        _ => AppError::Database(e),
    })?;

    let mut images = Vec::with_capacity(input.image_urls.len());
    for url in &input.image_urls {
        let image = sqlx::query_as::<_, EventImage>(
            "INSERT INTO event_images (event_id, image_url) VALUES ($1, $2) RETURNING id, event_id, image_url",
        )
        .bind(event.id)
        .bind(url)
        .fetch_one(&mut *tx)
        .await?;
        images.push(image);
    }

    tx.commit().await?;

    tracing::info!(event_id = %event.id, owner_id = %owner_id, images = images.len(), "Event created");
    Ok(EventDetail { event, images })
}

/// Find an event row by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
}

/// Event with its images.
pub async fn get_detail(pool: &PgPool, id: Uuid) -> Result<EventDetail, AppError> {
    let event = find_by_id(pool, id).await?;
    let images = sqlx::query_as::<_, EventImage>(
        "SELECT id, event_id, image_url FROM event_images WHERE event_id = $1 ORDER BY created_at ASC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(EventDetail { event, images })
}

/// Caller's events, newest date first, with ticket counts and images.
pub async fn list_owned(pool: &PgPool, owner_id: Uuid) -> Result<Vec<OwnedEventDetail>, AppError> {
    let events = sqlx::query_as::<_, OwnedEvent>(
        r#"
        SELECT e.*, COUNT(t.id) AS tickets_sold
        FROM events e
        LEFT JOIN tickets t ON t.event_id = e.id
        WHERE e.user_id = $1
        GROUP BY e.id
        ORDER BY e.date DESC, e.id ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    if events.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = events.iter().map(|e| e.event.id).collect();
    let images = sqlx::query_as::<_, EventImage>(
        "SELECT id, event_id, image_url FROM event_images WHERE event_id = ANY($1) ORDER BY created_at ASC",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    tracing::debug!(owner_id = %owner_id, events = events.len(), "Owned events fetched");
    Ok(attach_images(events, images))
}

/// Pair each owned event with its images, preserving event order.
fn attach_images(events: Vec<OwnedEvent>, images: Vec<EventImage>) -> Vec<OwnedEventDetail> {
    let mut by_event: HashMap<Uuid, Vec<EventImage>> = HashMap::new();
    for image in images {
        by_event.entry(image.event_id).or_default().push(image);
    }
    events
        .into_iter()
        .map(|owned| {
            let images = by_event.remove(&owned.event.id).unwrap_or_default();
            OwnedEventDetail { owned, images }
        })
        .collect()
}

/// Escape `ILIKE` wildcards so a search term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Published events, soonest first.
pub async fn list_published(
    pool: &PgPool,
    filters: &EventFilters,
    pagination: &Pagination,
) -> Result<PagedResult<EventSummary>, AppError> {
    let mut conditions = vec!["is_published = true".to_string()];
    let mut param_index = 0u32;

    if filters.search.is_some() {
        param_index += 1;
        conditions.push(format!(
            "(title ILIKE ${param_index} ESCAPE '\\' OR location ILIKE ${param_index} ESCAPE '\\')"
        ));
    }
    if filters.upcoming == Some(true) {
        param_index += 1;
        conditions.push(format!("date >= ${param_index}"));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));
    let count_sql = format!("SELECT COUNT(*) FROM events {where_clause}");
    let data_sql = format!(
        "SELECT id, title, date, time, location, tier, price, capacity \
         FROM events {where_clause} ORDER BY date ASC, id ASC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, EventSummary>(&data_sql);

    if let Some(ref search) = filters.search {
        let pattern = format!("%{}%", escape_like(search.trim()));
        count_query = count_query.bind(pattern.clone());
        data_query = data_query.bind(pattern);
    }
    if filters.upcoming == Some(true) {
        let today = Utc::now().date_naive();
        count_query = count_query.bind(today);
        data_query = data_query.bind(today);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Publish an event. Only its owner may do so.
pub async fn publish(pool: &PgPool, owner_id: Uuid, id: Uuid) -> Result<Event, AppError> {
    let event = find_by_id(pool, id).await?;
    if event.user_id != owner_id {
        return Err(AppError::Forbidden(
            "Only the event owner can publish it".to_string(),
        ));
    }
    if event.is_published {
        return Ok(event);
    }

    let event = sqlx::query_as::<_, Event>(
        "UPDATE events SET is_published = true, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    tracing::info!(event_id = %id, "Event published");
    Ok(event)
}

/// Increment a counter and return its new value.
pub async fn bump_counter(pool: &PgPool, id: Uuid, counter: Counter) -> Result<i64, AppError> {
    let column = counter.column();
    let sql = format!("UPDATE events SET {column} = {column} + 1 WHERE id = $1 RETURNING {column}");
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
}
