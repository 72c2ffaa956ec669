// SPDX-License-Identifier: MIT

//! Sales ledger models (point-of-sale screen).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sale lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Paid,
    Cancelled,
}

impl SaleStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SaleStatus::Pending),
            "paid" => Some(SaleStatus::Paid),
            "cancelled" => Some(SaleStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Paid => "paid",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

/// Row in the `sales` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub product_service: String,
    pub amount: Decimal,
    pub status: SaleStatus,
    pub sale_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update payload for a sale. Validated locally before any
/// network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleInput {
    pub client_name: String,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    pub product_service: String,
    pub amount: Decimal,
    pub status: SaleStatus,
    pub sale_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SaleInput {
    /// Field-level validation mirroring the admin form rules.
    pub fn validate(&self) -> Result<(), String> {
        if self.client_name.trim().len() < 2 {
            return Err("client_name must be at least 2 characters".into());
        }
        if self.client_name.len() > 100 {
            return Err("client_name must be at most 100 characters".into());
        }
        if let Some(email) = non_empty(&self.client_email) {
            if !looks_like_email(email) {
                return Err("client_email is not a valid email address".into());
            }
        }
        if let Some(phone) = non_empty(&self.client_phone) {
            if phone.len() > 20 {
                return Err("client_phone must be at most 20 characters".into());
            }
        }
        if self.product_service.trim().len() < 2 {
            return Err("product_service must be at least 2 characters".into());
        }
        if self.product_service.len() > 200 {
            return Err("product_service must be at most 200 characters".into());
        }
        if self.amount <= Decimal::ZERO {
            return Err("amount must be positive".into());
        }
        if let Some(notes) = non_empty(&self.notes) {
            if notes.len() > 500 {
                return Err("notes must be at most 500 characters".into());
            }
        }
        Ok(())
    }
}

/// Treat empty strings like absent optional fields.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Minimal syntactic email check: one `@` with text on both sides and a
/// dot in the domain. Real validation belongs to the identity provider.
pub(crate) fn looks_like_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    match parts.next() {
        Some(domain) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> SaleInput {
        SaleInput {
            client_name: "Maria Souza".into(),
            client_email: Some("maria@example.com".into()),
            client_phone: None,
            product_service: "Boat tour".into(),
            amount: Decimal::new(45000, 2),
            status: SaleStatus::Pending,
            sale_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn accepts_valid_input() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_amount() {
        let mut input = valid_input();
        input.amount = Decimal::ZERO;
        assert!(input.validate().is_err());
        input.amount = Decimal::new(-100, 2);
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_short_client_name() {
        let mut input = valid_input();
        input.client_name = "a".into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn empty_optional_email_is_fine() {
        let mut input = valid_input();
        input.client_email = Some(String::new());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn rejects_bad_email() {
        let mut input = valid_input();
        input.client_email = Some("not-an-email".into());
        assert!(input.validate().is_err());
    }

    #[test]
    fn status_strings() {
        assert_eq!(SaleStatus::parse("paid"), Some(SaleStatus::Paid));
        assert_eq!(SaleStatus::parse("refunded"), None);
        assert_eq!(SaleStatus::Cancelled.as_str(), "cancelled");
    }
}
