//! Ticket purchase DTOs and purchase codes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Maximum tickets bought in a single purchase.
pub const MAX_TICKETS_PER_PURCHASE: i32 = 10;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PurchaseTickets {
    #[validate(range(min = 1, max = MAX_TICKETS_PER_PURCHASE, message = "must be between 1 and 10"))]
    pub quantity: i32,
}

/// Summary of one purchase (all rows sharing a code).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseSummary {
    pub code: String,
    pub event_id: Uuid,
    pub event_title: String,
    pub quantity: i64,
    pub total_price: Decimal,
    pub purchase_date: DateTime<Utc>,
}

/// Generate a purchase code: `TKT-` followed by a random v4 UUID in upper-case hex.
/// Purchases are grouped by code, so the full 122 random bits are kept.
pub fn generate_code() -> String {
    format!("TKT-{}", Uuid::new_v4().simple().to_string().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn code_shape() {
        let code = generate_code();
        assert!(code.starts_with("TKT-"));
        assert_eq!(code.len(), 36);
        assert!(code[4..].chars().all(|c| matches!(c, '0'..='9' | 'A'..='F')));
    }

    #[test]
    fn codes_never_repeat() {
        let codes: HashSet<String> = (0..200_000).map(|_| generate_code()).collect();
        assert_eq!(codes.len(), 200_000);
    }

    #[test]
    fn quantity_bounds() {
        assert!(PurchaseTickets { quantity: 1 }.validate().is_ok());
        assert!(PurchaseTickets { quantity: MAX_TICKETS_PER_PURCHASE }.validate().is_ok());
        assert!(PurchaseTickets { quantity: 0 }.validate().is_err());
        assert!(PurchaseTickets { quantity: 11 }.validate().is_err());
    }
}
