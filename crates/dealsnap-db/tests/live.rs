//! Live integration tests for dealsnap-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/dealsnap-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{Duration, NaiveDate, Utc};
use dealsnap_core::ExtractedDeal;
use dealsnap_db::{get_deal, insert_deal, list_deals, DealListFilters};
use rust_decimal::Decimal;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_deal(photo_id: &str, timestamp: &str, expires_at: Option<NaiveDate>) -> ExtractedDeal {
    ExtractedDeal {
        id: None,
        photo_id: photo_id.to_string(),
        business_name: "Corner Deli".to_string(),
        deal_text: "Corner Deli $6.50 subs".to_string(),
        price: 6.5,
        expires_at,
        latitude: 40.712_776,
        longitude: -74.005_974,
        timestamp: timestamp.to_string(),
    }
}

// ---------------------------------------------------------------------------
// insert_deal / get_deal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_then_get_round_trips_fields(pool: sqlx::PgPool) {
    let deal = make_deal(
        "photo-1",
        "2024-06-01T09:30:00Z",
        NaiveDate::from_ymd_opt(2024, 12, 31),
    );
    let id = insert_deal(&pool, &deal).await.expect("insert_deal failed");

    let row = get_deal(&pool, id)
        .await
        .expect("get_deal failed")
        .expect("row exists");

    assert_eq!(row.id, id);
    assert_eq!(row.photo_id, "photo-1");
    assert_eq!(row.business_name.as_deref(), Some("Corner Deli"));
    assert_eq!(row.deal_text, "Corner Deli $6.50 subs");
    assert_eq!(row.price, Some(Decimal::new(650, 2)));
    assert_eq!(row.latitude, Some(Decimal::new(4_071_277_600, 8)));
    assert_eq!(
        row.expires_at.map(|t| t.date_naive()),
        NaiveDate::from_ymd_opt(2024, 12, 31)
    );
    assert_eq!(row.created_at.to_rfc3339(), "2024-06-01T09:30:00+00:00");
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_stores_zero_defaults(pool: sqlx::PgPool) {
    let deal = ExtractedDeal {
        photo_id: "photo-empty".to_string(),
        timestamp: "2024-06-01T00:00:00Z".to_string(),
        ..ExtractedDeal::default()
    };
    let id = insert_deal(&pool, &deal).await.expect("insert_deal failed");
    let row = get_deal(&pool, id).await.expect("get").expect("row");

    assert_eq!(row.business_name.as_deref(), Some(""));
    assert_eq!(row.price, Some(Decimal::ZERO));
    assert!(row.expires_at.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_rejects_unreadable_timestamp(pool: sqlx::PgPool) {
    let deal = make_deal("photo-bad", "not-a-timestamp", None);
    assert!(insert_deal(&pool, &deal).await.is_err());
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_unknown_id_returns_none(pool: sqlx::PgPool) {
    let row = get_deal(&pool, Uuid::new_v4()).await.expect("get_deal failed");
    assert!(row.is_none());
}

// ---------------------------------------------------------------------------
// list_deals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_orders_newest_first_and_limits(pool: sqlx::PgPool) {
    for (photo, ts) in [
        ("old", "2024-01-01T00:00:00Z"),
        ("mid", "2024-02-01T00:00:00Z"),
        ("new", "2024-03-01T00:00:00Z"),
    ] {
        insert_deal(&pool, &make_deal(photo, ts, None))
            .await
            .expect("insert_deal failed");
    }

    let rows = list_deals(
        &pool,
        DealListFilters {
            active_only: false,
            limit: 2,
        },
    )
    .await
    .expect("list_deals failed");

    let photos: Vec<&str> = rows.iter().map(|r| r.photo_id.as_str()).collect();
    assert_eq!(photos, ["new", "mid"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_active_only_hides_expired(pool: sqlx::PgPool) {
    let today = Utc::now().date_naive();
    let expired = today - Duration::days(30);
    let upcoming = today + Duration::days(30);

    for (photo, expires) in [
        ("expired", Some(expired)),
        ("upcoming", Some(upcoming)),
        ("open-ended", None),
    ] {
        insert_deal(&pool, &make_deal(photo, "2024-01-01T00:00:00Z", expires))
            .await
            .expect("insert_deal failed");
    }

    let active = list_deals(
        &pool,
        DealListFilters {
            active_only: true,
            limit: 50,
        },
    )
    .await
    .expect("list_deals failed");
    let mut photos: Vec<&str> = active.iter().map(|r| r.photo_id.as_str()).collect();
    photos.sort_unstable();
    assert_eq!(photos, ["open-ended", "upcoming"]);

    let all = list_deals(&pool, DealListFilters::default())
        .await
        .expect("list_deals failed");
    assert_eq!(all.len(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn rerunning_migrations_applies_nothing(pool: sqlx::PgPool) {
    let applied = dealsnap_db::run_migrations(&pool)
        .await
        .expect("migrations rerun");
    assert_eq!(applied, 0);
    dealsnap_db::health_check(&pool)
        .await
        .expect("pool is healthy");
}
