//! Event model, its images, and request DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Maximum number of image URLs attached at creation.
pub const MAX_IMAGES_PER_EVENT: usize = 10;

/// Prices are stored as NUMERIC(10, 2).
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 100_000_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "event_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "event_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventTier {
    #[default]
    Silver,
    Gold,
    Platinum,
}

/// Full event row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub event_type: EventType,
    pub tier: EventTier,
    pub price: Decimal,
    pub capacity: i32,
    pub logistics_phone: Option<String>,
    pub views: i64,
    pub shares: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct EventImage {
    pub id: Uuid,
    pub event_id: Uuid,
    pub image_url: String,
}

/// Event detail response: the event row plus its images.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub images: Vec<EventImage>,
}

/// Owner's event row with its ticket count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OwnedEvent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub tickets_sold: i64,
}

/// Owner's event listing entry: event, ticket count, images.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedEventDetail {
    #[serde(flatten)]
    pub owned: OwnedEvent,
    pub images: Vec<EventImage>,
}

/// Lightweight event entry for public listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub tier: EventTier,
    pub price: Decimal,
    pub capacity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 32, message = "is required"))]
    pub time: String,
    #[validate(length(min = 1, max = 300, message = "is required"))]
    pub location: String,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub tier: EventTier,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(range(min = 1, message = "must be a positive number"))]
    pub capacity: i32,
    pub logistics_phone: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_image_urls"))]
    pub image_urls: Vec<String>,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let message = if price.is_sign_negative() && !price.is_zero() {
        "must be a non-negative number"
    } else if *price >= Decimal::from(PRICE_LIMIT) {
        "must be less than 100000000"
    } else if price.normalize().scale() > PRICE_SCALE {
        "must have at most 2 decimal places"
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("price");
    err.message = Some(message.into());
    Err(err)
}

fn validate_image_urls(urls: &Vec<String>) -> Result<(), ValidationError> {
    let valid = urls.len() <= MAX_IMAGES_PER_EVENT
        && urls
            .iter()
            .all(|u| u.starts_with('/') || u.starts_with("https://") || u.starts_with("http://"));
    if !valid {
        let mut err = ValidationError::new("image_urls");
        err.message = Some(
            format!("must be at most {MAX_IMAGES_PER_EVENT} absolute paths or http(s) URLs").into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Filters for the public event listing.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EventFilters {
    pub search: Option<String>,
    pub upcoming: Option<bool>,
}
