use serde::Serialize;

use super::order::PortionSize;

/// One order item enriched with its food and table context. Fields that
/// come from an unmatched join are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    /// The item's recorded unit price; this is what `payment_due` sums.
    pub amount: f64,
    pub food_name: Option<String>,
    pub food_image: Option<String>,
    pub table_number: Option<i32>,
    pub table_id: Option<String>,
    pub order_id: Option<String>,
    /// The food's current catalogue price, for display.
    pub price: Option<f64>,
    pub quantity: PortionSize,
}

/// Lines sharing one (order, table) identity, with their total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLineGroup {
    pub payment_due: f64,
    pub total_count: i64,
    pub table_number: Option<i32>,
    pub order_items: Vec<OrderLine>,
}
