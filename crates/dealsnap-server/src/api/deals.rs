use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DealItem {
    id: Uuid,
    photo_id: String,
    business_name: String,
    deal_text: String,
    price: f64,
    expires_at: Option<DateTime<Utc>>,
    latitude: f64,
    longitude: f64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DealQuery {
    pub limit: Option<i64>,
    /// Only the literal `true` enables the filter; any other value is false.
    pub active: Option<String>,
}

impl DealQuery {
    fn active_only(&self) -> bool {
        self.active.as_deref() == Some("true")
    }
}

fn decimal_or_zero(value: Option<Decimal>) -> f64 {
    value.and_then(|d| d.to_f64()).unwrap_or(0.0)
}

impl From<dealsnap_db::DealRow> for DealItem {
    fn from(row: dealsnap_db::DealRow) -> Self {
        Self {
            id: row.id,
            photo_id: row.photo_id,
            business_name: row.business_name.unwrap_or_default(),
            deal_text: row.deal_text,
            price: decimal_or_zero(row.price),
            expires_at: row.expires_at,
            latitude: decimal_or_zero(row.latitude),
            longitude: decimal_or_zero(row.longitude),
            created_at: row.created_at,
        }
    }
}

pub(super) async fn list_deals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<DealQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<DealItem>>>, ApiError> {
    let Query(query) =
        query.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;

    let rows = dealsnap_db::list_deals(
        &state.pool,
        dealsnap_db::DealListFilters {
            active_only: query.active_only(),
            limit: normalize_limit(query.limit),
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(DealItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_deal(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DealItem>>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("'{id}' is not a valid deal id"),
        )
    })?;

    let row = dealsnap_db::get_deal(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("deal {id} not found"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: DealItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> dealsnap_db::DealRow {
        dealsnap_db::DealRow {
            id: Uuid::nil(),
            photo_id: "p-1".to_string(),
            business_name: None,
            deal_text: "text".to_string(),
            price: None,
            expires_at: None,
            latitude: Some(Decimal::new(302_672, 4)),
            longitude: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn only_literal_true_enables_active_filter() {
        let query = |active: Option<&str>| DealQuery {
            limit: None,
            active: active.map(str::to_string),
        };
        assert!(query(Some("true")).active_only());
        assert!(!query(Some("1")).active_only());
        assert!(!query(Some("TRUE")).active_only());
        assert!(!query(Some("false")).active_only());
        assert!(!query(None).active_only());
    }

    #[test]
    fn null_columns_report_as_zero() {
        let item = DealItem::from(row());
        assert_eq!(item.price, 0.0);
        assert_eq!(item.longitude, 0.0);
        assert_eq!(item.latitude, 30.2672);
        assert_eq!(item.business_name, "");
    }

    #[test]
    fn deal_item_serializes_camel_case() {
        let json = serde_json::to_value(DealItem::from(row())).expect("serialize");
        assert_eq!(json["photoId"], "p-1");
        assert_eq!(json["dealText"], "text");
        assert!(json["expiresAt"].is_null());
        assert!(json.get("photo_id").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
