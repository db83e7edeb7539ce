use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiningTable {
    pub table_id: String,
    pub number_of_guests: i32,
    pub table_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDiningTable {
    pub number_of_guests: i32,
    pub table_number: i32,
}

#[derive(Debug, Clone, Default)]
pub struct DiningTablePatch {
    pub number_of_guests: Option<i32>,
    pub table_number: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: String,
    pub order_date: DateTime<Utc>,
    pub table_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    /// Defaults to the creation time.
    pub order_date: Option<DateTime<Utc>>,
    pub table_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub order_date: Option<DateTime<Utc>>,
    pub table_id: Option<String>,
}

/// Predicate shared by the windowed order listing and its count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub table_id: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match &self.table_id {
            Some(id) => order.table_id.as_deref() == Some(id.as_str()),
            None => true,
        }
    }
}

/// Portion size of an ordered dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PortionSize {
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
}

impl PortionSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortionSize::Small => "S",
            PortionSize::Medium => "M",
            PortionSize::Large => "L",
        }
    }
}

impl fmt::Display for PortionSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortionSize {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(PortionSize::Small),
            "M" => Ok(PortionSize::Medium),
            "L" => Ok(PortionSize::Large),
            other => Err(DomainError::InvalidInput(format!(
                "quantity must be one of S, M, L; got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub order_item_id: String,
    pub quantity: PortionSize,
    /// Fixed at insertion; never recomputed from the food's current price.
    pub unit_price: f64,
    pub food_id: String,
    pub order_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub quantity: PortionSize,
    pub unit_price: f64,
    pub food_id: String,
}

/// A batch of items to record, either against a new order (optionally
/// seated at `table_id`) or appended to the existing `order_id`.
#[derive(Debug, Clone, Default)]
pub struct OrderItemPack {
    pub order_id: Option<String>,
    pub table_id: Option<String>,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderItemPatch {
    pub quantity: Option<PortionSize>,
    pub unit_price: Option<f64>,
    pub food_id: Option<String>,
}
