//! Read-only deal query handlers.

use dealsnap_db::{DealListFilters, DealRow};
use uuid::Uuid;

use crate::DealsCommands;

/// Placeholder for empty cells.
const BLANK: &str = "-";

fn fmt_name(name: Option<&str>) -> &str {
    match name {
        Some(n) if !n.is_empty() => n,
        _ => BLANK,
    }
}

fn fmt_expiry(row: &DealRow) -> String {
    row.expires_at
        .map_or_else(|| BLANK.to_string(), |d| d.format("%Y-%m-%d").to_string())
}

pub(crate) async fn run_deals(
    pool: &sqlx::PgPool,
    command: DealsCommands,
) -> anyhow::Result<()> {
    match command {
        DealsCommands::List { active, limit } => run_deals_list(pool, active, limit).await,
        DealsCommands::Show { id } => run_deals_show(pool, id).await,
    }
}

/// Prints the newest deals.
///
/// # Errors
///
/// Returns an error if the database query fails.
async fn run_deals_list(
    pool: &sqlx::PgPool,
    active: bool,
    limit: u32,
) -> anyhow::Result<()> {
    let filters = DealListFilters {
        active_only: active,
        limit: i64::from(limit),
    };
    let rows = dealsnap_db::list_deals(pool, filters).await?;

    if rows.is_empty() {
        println!("no deals found; run `ingest` first");
        return Ok(());
    }

    println!(
        "{:<38}{:<25}{:<10}{:<12}CREATED",
        "ID", "BUSINESS", "PRICE", "EXPIRES"
    );
    for row in &rows {
        let price = row.price.map(|p| p.to_string()).unwrap_or_default();
        println!(
            "{:<38}{:<25}{:<10}{:<12}{}",
            row.id,
            fmt_name(row.business_name.as_deref()),
            price,
            fmt_expiry(row),
            row.created_at.format("%Y-%m-%d %H:%M"),
        );
    }

    Ok(())
}

/// Prints one deal in full.
///
/// # Errors
///
/// Returns an error if the deal does not exist or the query fails.
async fn run_deals_show(pool: &sqlx::PgPool, id: Uuid) -> anyhow::Result<()> {
    let row = dealsnap_db::get_deal(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("deal {id} not found"))?;

    println!("id:        {}", row.id);
    println!("photo:     {}", row.photo_id);
    println!("business:  {}", fmt_name(row.business_name.as_deref()));
    println!(
        "price:     {}",
        row.price.map(|p| p.to_string()).unwrap_or_default()
    );
    println!("expires:   {}", fmt_expiry(&row));
    if let (Some(lat), Some(lng)) = (row.latitude, row.longitude) {
        println!("location:  {lat}, {lng}");
    }
    println!("created:   {}", row.created_at.to_rfc3339());
    println!("text:\n{}", row.deal_text);

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn blank_business_name_renders_dash() {
        assert_eq!(fmt_name(None), "-");
        assert_eq!(fmt_name(Some("")), "-");
        assert_eq!(fmt_name(Some("Taco Town")), "Taco Town");
    }

    #[test]
    fn missing_expiry_renders_dash() {
        let row = DealRow {
            id: Uuid::nil(),
            photo_id: "p-1".to_string(),
            business_name: None,
            deal_text: String::new(),
            price: None,
            expires_at: None,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
        };
        assert_eq!(fmt_expiry(&row), "-");
        assert!(fmt_expiry(&row).is_ascii());
    }
}
