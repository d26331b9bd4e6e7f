//! Creator dashboard: sales, views and shares rolled up over the caller's own events.
//!
//! Every query is filtered by `events.user_id`; tickets are only ever reached
//! through an owned event, so another creator's sales can never leak in.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

/// Number of purchases shown in the recent-purchases feed.
pub const RECENT_PURCHASES_LIMIT: usize = 5;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Full dashboard payload.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub events: Vec<EventSalesRow>,
    pub purchases: Vec<PurchaseRow>,
}

/// Headline numbers across all of the owner's events.
#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub revenue: Decimal,
    pub tickets_sold: i64,
    pub event_views: i64,
    pub event_shares: i64,
}

/// Per-event sales rollup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSalesRow {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub total_capacity: i32,
    pub tickets_sold: i64,
    pub revenue: Decimal,
    pub time_until: String,
}

/// One purchase (all tickets sharing a code) in the recent feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRow {
    pub code: String,
    pub buyer: String,
    pub event_title: String,
    pub tickets_sold: i64,
    pub total_price: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub date: String,
    pub time: String,
}

/// Owned event joined with its ticket totals.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRollup {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub total_capacity: i32,
    pub views: i64,
    pub shares: i64,
    pub tickets_sold: i64,
    pub revenue: Decimal,
}

/// Tickets grouped by purchase code.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PurchaseGroup {
    pub code: String,
    pub buyer: String,
    pub event_title: String,
    pub tickets_sold: i64,
    pub total_price: Decimal,
    pub purchase_date: DateTime<Utc>,
}

/// Fetch and assemble the dashboard for `owner_id`.
pub async fn get_dashboard(
    pool: &PgPool,
    owner_id: Uuid,
    now: DateTime<Utc>,
    display_offset: FixedOffset,
) -> Result<Dashboard, AppError> {
    let (events, purchases) = tokio::try_join!(
        fetch_event_rollups(pool, owner_id),
        fetch_recent_purchases(pool, owner_id),
    )?;

    tracing::debug!(
        owner_id = %owner_id,
        events = events.len(),
        purchases = purchases.len(),
        "Dashboard rollups fetched"
    );

    Ok(assemble(events, purchases, now, display_offset))
}

/// Build the payload from rollups. Stats are summed from the per-event rows so
/// the headline numbers always agree with the table.
pub fn assemble(
    mut events: Vec<EventRollup>,
    mut purchases: Vec<PurchaseGroup>,
    now: DateTime<Utc>,
    display_offset: FixedOffset,
) -> Dashboard {
    let stats = events
        .iter()
        .fold(DashboardStats::default(), |mut acc, e| {
            acc.revenue += e.revenue;
            acc.tickets_sold += e.tickets_sold;
            acc.event_views += e.views;
            acc.event_shares += e.shares;
            acc
        });

    events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    let events = events
        .into_iter()
        .map(|e| EventSalesRow {
            time_until: time_until(e.date, now),
            id: e.id,
            title: e.title,
            date: e.date,
            total_capacity: e.total_capacity,
            tickets_sold: e.tickets_sold,
            revenue: e.revenue,
        })
        .collect();

    purchases.sort_by(|a, b| {
        b.purchase_date
            .cmp(&a.purchase_date)
            .then_with(|| a.code.cmp(&b.code))
    });
    purchases.truncate(RECENT_PURCHASES_LIMIT);
    let purchases = purchases
        .into_iter()
        .map(|p| {
            let (date, time) = format_purchase_time(p.purchase_date, display_offset);
            PurchaseRow {
                code: p.code,
                buyer: p.buyer,
                event_title: p.event_title,
                tickets_sold: p.tickets_sold,
                total_price: p.total_price,
                purchase_date: p.purchase_date,
                date,
                time,
            }
        })
        .collect();

    Dashboard {
        stats,
        events,
        purchases,
    }
}

/// Whole days from `now` until the start (00:00 UTC) of `date`, rounded up.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let ms = (start - now).num_milliseconds();
    // Integer division truncates toward zero, which is already the ceiling for negatives.
    if ms > 0 && ms % MILLIS_PER_DAY != 0 {
        ms / MILLIS_PER_DAY + 1
    } else {
        ms / MILLIS_PER_DAY
    }
}

/// Coarse "time until" label for an event date. Past dates fall in the first
/// bucket with a negative count.
pub fn time_until(date: NaiveDate, now: DateTime<Utc>) -> String {
    match days_until(date, now) {
        d if d <= 7 => format!("in {d} days"),
        d if d <= 14 => "Next 2 weeks".to_string(),
        d if d <= 30 => "Next month".to_string(),
        _ => "Future event".to_string(),
    }
}

/// Render a purchase timestamp as `M/D/YYYY` and `h:MM:SS AM` in the display offset.
pub fn format_purchase_time(at: DateTime<Utc>, offset: FixedOffset) -> (String, String) {
    let local = at.with_timezone(&offset);
    (
        local.format("%-m/%-d/%Y").to_string(),
        local.format("%-I:%M:%S %p").to_string(),
    )
}

/// Per-event ticket count and revenue for the owner's events.
async fn fetch_event_rollups(pool: &PgPool, owner_id: Uuid) -> Result<Vec<EventRollup>, AppError> {
    let rows = sqlx::query_as::<_, EventRollup>(
        r#"
        SELECT
            e.id,
            e.title,
            e.date,
            e.capacity AS total_capacity,
            e.views,
            e.shares,
            COUNT(t.id) AS tickets_sold,
            COALESCE(SUM(t.price), 0) AS revenue
        FROM events e
        LEFT JOIN tickets t ON t.event_id = e.id
        WHERE e.user_id = $1
        GROUP BY e.id
        ORDER BY e.date ASC, e.id ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Most recent purchases on the owner's events, grouped by purchase code.
async fn fetch_recent_purchases(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<PurchaseGroup>, AppError> {
    let rows = sqlx::query_as::<_, PurchaseGroup>(
        r#"
        SELECT
            t.code,
            MIN(COALESCE(NULLIF(TRIM(u.full_name), ''), u.email)) AS buyer,
            MIN(e.title) AS event_title,
            COUNT(t.id) AS tickets_sold,
            SUM(t.price) AS total_price,
            MAX(t.purchase_date) AS purchase_date
        FROM tickets t
        INNER JOIN events e ON e.id = t.event_id
        INNER JOIN users u ON u.id = t.user_id
        WHERE e.user_id = $1
        GROUP BY t.code
        ORDER BY MAX(t.purchase_date) DESC, t.code ASC
        LIMIT $2
        "#,
    )
    .bind(owner_id)
    .bind(RECENT_PURCHASES_LIMIT as i64)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rollup(title: &str, date: NaiveDate, sold: i64, revenue: &str) -> EventRollup {
        EventRollup {
            id: Uuid::new_v4(),
            title: title.to_string(),
            date,
            total_capacity: 100,
            views: 10,
            shares: 2,
            tickets_sold: sold,
            revenue: dec(revenue),
        }
    }

    fn purchase(code: &str, minutes_ago: i64, count: i64, total: &str) -> PurchaseGroup {
        PurchaseGroup {
            code: code.to_string(),
            buyer: "Grace Hopper".to_string(),
            event_title: "Compiler Night".to_string(),
            tickets_sold: count,
            total_price: dec(total),
            purchase_date: now() - Duration::minutes(minutes_ago),
        }
    }

    fn days_out(days: i64) -> NaiveDate {
        (now() + Duration::days(days)).date_naive()
    }

    #[test]
    fn no_events_yields_zeroes_and_empty_lists() {
        let dashboard = assemble(vec![], vec![], now(), utc());
        assert_eq!(dashboard.stats, DashboardStats::default());
        assert_eq!(dashboard.stats.revenue, Decimal::ZERO);
        assert!(dashboard.events.is_empty());
        assert!(dashboard.purchases.is_empty());
    }

    #[test]
    fn stats_sum_over_owned_events() {
        let events = vec![
            rollup("A", days_out(3), 4, "100.00"),
            rollup("B", days_out(40), 0, "0"),
            rollup("C", days_out(10), 3, "37.50"),
        ];
        let dashboard = assemble(events, vec![], now(), utc());
        assert_eq!(dashboard.stats.revenue, dec("137.50"));
        assert_eq!(dashboard.stats.tickets_sold, 7);
        assert_eq!(dashboard.stats.event_views, 30);
        assert_eq!(dashboard.stats.event_shares, 6);
    }

    #[test]
    fn events_ordered_by_date_ascending() {
        let events = vec![
            rollup("late", days_out(90), 1, "5"),
            rollup("soon", days_out(2), 1, "5"),
            rollup("mid", days_out(20), 1, "5"),
        ];
        let dashboard = assemble(events, vec![], now(), utc());
        let titles: Vec<&str> = dashboard.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["soon", "mid", "late"]);
        assert_eq!(dashboard.events[0].time_until, "in 2 days");
        assert_eq!(dashboard.events[2].time_until, "Future event");
    }

    #[test]
    fn purchases_capped_and_most_recent_first() {
        let purchases = (0..8)
            .map(|i| purchase(&format!("TKT-{i}"), i * 7 % 8, 1, "10"))
            .collect();
        let dashboard = assemble(vec![], purchases, now(), utc());
        assert_eq!(dashboard.purchases.len(), RECENT_PURCHASES_LIMIT);
        assert!(dashboard
            .purchases
            .windows(2)
            .all(|w| w[0].purchase_date >= w[1].purchase_date));
        assert_eq!(dashboard.purchases[0].purchase_date, now());
    }

    #[test]
    fn purchase_rows_keep_group_totals() {
        let dashboard = assemble(vec![], vec![purchase("TKT-A", 0, 3, "75.00")], now(), utc());
        let row = &dashboard.purchases[0];
        assert_eq!(row.tickets_sold, 3);
        assert_eq!(row.total_price, dec("75.00"));
        assert_eq!(row.date, "10/19/2026");
        assert_eq!(row.time, "12:00:00 PM");
    }

    #[test]
    fn time_until_buckets() {
        assert_eq!(time_until(days_out(3), now()), "in 3 days");
        assert_eq!(time_until(days_out(10), now()), "Next 2 weeks");
        assert_eq!(time_until(days_out(20), now()), "Next month");
        assert_eq!(time_until(days_out(90), now()), "Future event");
    }

    #[test]
    fn time_until_boundaries() {
        assert_eq!(time_until(days_out(7), now()), "in 7 days");
        assert_eq!(time_until(days_out(8), now()), "Next 2 weeks");
        assert_eq!(time_until(days_out(14), now()), "Next 2 weeks");
        assert_eq!(time_until(days_out(15), now()), "Next month");
        assert_eq!(time_until(days_out(30), now()), "Next month");
        assert_eq!(time_until(days_out(31), now()), "Future event");
    }

    #[test]
    fn days_until_rounds_up_partial_days() {
        // Tomorrow's midnight is 12 hours away.
        assert_eq!(days_until(days_out(1), now()), 1);
        // Today's midnight already passed 12 hours ago.
        assert_eq!(days_until(days_out(0), now()), 0);
        assert_eq!(days_until(days_out(-1), now()), -1);
        let midnight = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        assert_eq!(days_until(days_out(2), midnight), 2);
    }

    #[test]
    fn past_events_count_negative_days() {
        assert_eq!(time_until(days_out(-3), now()), "in -3 days");
        assert_eq!(time_until(days_out(-1), now()), "in -1 days");
        assert_eq!(time_until(days_out(0), now()), "in 0 days");
    }

    #[test]
    fn purchase_time_uses_display_offset() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 2, 5, 9).unwrap();
        let (date, time) = format_purchase_time(at, FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(date, "2/28/2026");
        assert_eq!(time, "9:05:09 PM");
    }

    #[test]
    fn serializes_camel_case() {
        let dashboard = assemble(
            vec![rollup("A", days_out(3), 2, "20")],
            vec![purchase("TKT-A", 1, 2, "20")],
            now(),
            utc(),
        );
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["stats"]["ticketsSold"], 2);
        assert_eq!(json["stats"]["eventViews"], 10);
        assert_eq!(json["events"][0]["totalCapacity"], 100);
        assert_eq!(json["events"][0]["timeUntil"], "in 3 days");
        assert_eq!(json["purchases"][0]["eventTitle"], "Compiler Night");
        assert_eq!(json["purchases"][0]["totalPrice"], 20.0);
    }
}
