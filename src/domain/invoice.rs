use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::DomainError;
use super::order_view::OrderLine;

/// Placeholder reported when an invoice has no payment method recorded.
pub const MISSING_PAYMENT_METHOD: &str = "null";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentMethod {
    #[serde(rename = "CARD")]
    Card,
    #[serde(rename = "CASH")]
    Cash,
    /// Explicitly recorded as empty, as opposed to never recorded.
    #[serde(rename = "")]
    Unspecified,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "CARD",
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Unspecified => "",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CARD" => Ok(PaymentMethod::Card),
            "CASH" => Ok(PaymentMethod::Cash),
            "" => Ok(PaymentMethod::Unspecified),
            other => Err(DomainError::InvalidInput(format!(
                "payment_method must be CARD, CASH or empty; got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "PAID")]
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "PAID" => Ok(PaymentStatus::Paid),
            other => Err(DomainError::InvalidInput(format!(
                "payment_status must be PENDING or PAID; got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub order_id: String,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    /// Creation time plus one day.
    pub payment_due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub order_id: String,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct InvoicePatch {
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
}

/// Read model joining an invoice with its order's line view. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceView {
    pub invoice_id: String,
    pub payment_method: String,
    pub order_id: String,
    pub payment_status: Option<PaymentStatus>,
    pub payment_due: Option<f64>,
    pub table_number: Option<i32>,
    pub payment_due_date: DateTime<Utc>,
    pub order_details: Option<Vec<OrderLine>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_accepts_empty() {
        assert_eq!("".parse::<PaymentMethod>().unwrap(), PaymentMethod::Unspecified);
        assert_eq!("CASH".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn payment_status_defaults_to_pending() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
        assert!("LATE".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn view_serializes_missing_fields_as_null() {
        let view = InvoiceView {
            invoice_id: "i1".to_string(),
            payment_method: MISSING_PAYMENT_METHOD.to_string(),
            order_id: "o1".to_string(),
            payment_status: None,
            payment_due: None,
            table_number: None,
            payment_due_date: Utc::now(),
            order_details: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["payment_method"], "null");
        assert!(json["payment_due"].is_null());
        assert!(json["order_details"].is_null());
    }
}
