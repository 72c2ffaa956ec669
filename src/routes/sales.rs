// SPDX-License-Identifier: MIT

//! Sales ledger screen (staff): point-of-sale CRUD plus dashboard
//! totals.

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Sale, SaleInput, SaleStatus};
use crate::routes::clients::DeleteResponse;
use crate::supabase::SaleFilter;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/sales", get(list_sales).post(create_sale))
        .route("/api/admin/sales/summary", get(sales_summary))
        .route("/api/admin/sales/{id}", put(update_sale).delete(delete_sale))
}

#[derive(Deserialize)]
pub struct SaleListQuery {
    #[serde(default)]
    pub status: Option<String>,
    /// Free-text filter on the buyer name.
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl SaleListQuery {
    fn into_filter(self) -> Result<SaleFilter> {
        let status = match self.status.as_deref() {
            None | Some("all") => None,
            Some(raw) => Some(
                SaleStatus::parse(raw)
                    .ok_or_else(|| AppError::BadRequest(format!("unknown status '{}'", raw)))?,
            ),
        };
        if let Some(client) = &self.client {
            if client.len() > 100 {
                return Err(AppError::BadRequest("client filter too long".into()));
            }
        }
        Ok(SaleFilter {
            status,
            client: self.client,
            from: self.from,
            to: self.to,
        })
    }
}

async fn list_sales(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SaleListQuery>,
) -> Result<Json<Vec<Sale>>> {
    let filter = query.into_filter()?;
    let sales = state.db.list_sales(&filter).await?;
    Ok(Json(sales))
}

async fn create_sale(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SaleInput>,
) -> Result<Json<Sale>> {
    input.validate().map_err(AppError::BadRequest)?;
    let sale = state.db.insert_sale(&input).await?;
    tracing::info!(sale_id = %sale.id, amount = %sale.amount, "Sale recorded");
    Ok(Json(sale))
}

async fn update_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<SaleInput>,
) -> Result<Json<Sale>> {
    input.validate().map_err(AppError::BadRequest)?;
    let sale = state
        .db
        .update_sale(id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sale {}", id)))?;
    Ok(Json(sale))
}

async fn delete_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    state.db.delete_sale(id).await?;
    tracing::info!(sale_id = %id, "Sale deleted");
    Ok(Json(DeleteResponse { success: true }))
}

// ─── Dashboard totals ────────────────────────────────────────────

#[derive(Serialize)]
pub struct SalesSummary {
    pub total_count: usize,
    pub pending_count: usize,
    pub paid_count: usize,
    pub cancelled_count: usize,
    /// Revenue counts paid sales only.
    pub revenue: Decimal,
}

impl SalesSummary {
    pub fn compute(sales: &[Sale]) -> Self {
        let mut summary = Self {
            total_count: sales.len(),
            pending_count: 0,
            paid_count: 0,
            cancelled_count: 0,
            revenue: Decimal::ZERO,
        };
        for sale in sales {
            match sale.status {
                SaleStatus::Pending => summary.pending_count += 1,
                SaleStatus::Paid => {
                    summary.paid_count += 1;
                    summary.revenue += sale.amount;
                }
                SaleStatus::Cancelled => summary.cancelled_count += 1,
            }
        }
        summary
    }
}

async fn sales_summary(State(state): State<Arc<AppState>>) -> Result<Json<SalesSummary>> {
    let sales = state.db.list_sales(&SaleFilter::default()).await?;
    Ok(Json(SalesSummary::compute(&sales)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(status: SaleStatus, amount: i64) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            client_name: "Cliente".into(),
            client_email: None,
            client_phone: None,
            product_service: "Passeio".into(),
            amount: Decimal::new(amount, 2),
            status,
            sale_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn revenue_counts_paid_sales_only() {
        let sales = vec![
            sale(SaleStatus::Paid, 10000),
            sale(SaleStatus::Paid, 2500),
            sale(SaleStatus::Pending, 99900),
            sale(SaleStatus::Cancelled, 5000),
        ];
        let summary = SalesSummary::compute(&sales);
        assert_eq!(summary.total_count, 4);
        assert_eq!(summary.paid_count, 2);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.cancelled_count, 1);
        assert_eq!(summary.revenue, Decimal::new(12500, 2));
    }

    #[test]
    fn status_filter_parses_or_rejects() {
        let query = SaleListQuery {
            status: Some("paid".into()),
            client: None,
            from: None,
            to: None,
        };
        assert_eq!(query.into_filter().unwrap().status, Some(SaleStatus::Paid));

        let query = SaleListQuery {
            status: Some("bogus".into()),
            client: None,
            from: None,
            to: None,
        };
        assert!(query.into_filter().is_err());
    }
}
