use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::catalog::{Food, FoodPatch, Menu, MenuPatch};
use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoicePatch, PaymentMethod, PaymentStatus};
use crate::domain::order::{
    DiningTable, DiningTablePatch, Order, OrderItem, OrderItemPatch, OrderPatch, PortionSize,
};
use crate::domain::user::User;
use crate::schema::{dining_tables, foods, invoices, menus, order_items, orders, users};

fn decode_failed(table: &str, id: &str, err: DomainError) -> DomainError {
    DomainError::DecodeFailed(format!("{table} row '{id}': {err}"))
}

// ── Menus ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = menus)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuRow {
    pub menu_id: String,
    pub name: String,
    pub category: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Menu> for MenuRow {
    fn from(m: Menu) -> Self {
        Self {
            menu_id: m.menu_id,
            name: m.name,
            category: m.category,
            start_date: m.start_date,
            end_date: m.end_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<MenuRow> for Menu {
    fn from(r: MenuRow) -> Self {
        Self {
            menu_id: r.menu_id,
            name: r.name,
            category: r.category,
            start_date: r.start_date,
            end_date: r.end_date,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = menus)]
pub struct MenuChangeset {
    pub name: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl MenuChangeset {
    pub fn new(patch: &MenuPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: patch.name.clone(),
            category: patch.category.clone(),
            start_date: patch.start_date,
            end_date: patch.end_date,
            updated_at,
        }
    }
}

// ── Foods ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = foods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FoodRow {
    pub food_id: String,
    pub name: String,
    pub price: f64,
    pub food_image: String,
    pub menu_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Food> for FoodRow {
    fn from(f: Food) -> Self {
        Self {
            food_id: f.food_id,
            name: f.name,
            price: f.price,
            food_image: f.food_image,
            menu_id: f.menu_id,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

impl From<FoodRow> for Food {
    fn from(r: FoodRow) -> Self {
        Self {
            food_id: r.food_id,
            name: r.name,
            price: r.price,
            food_image: r.food_image,
            menu_id: r.menu_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = foods)]
pub struct FoodChangeset {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub food_image: Option<String>,
    pub menu_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl FoodChangeset {
    pub fn new(patch: &FoodPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: patch.name.clone(),
            price: patch.price,
            food_image: patch.food_image.clone(),
            menu_id: patch.menu_id.clone(),
            updated_at,
        }
    }
}

// ── Dining tables ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = dining_tables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DiningTableRow {
    pub table_id: String,
    pub number_of_guests: i32,
    pub table_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DiningTable> for DiningTableRow {
    fn from(t: DiningTable) -> Self {
        Self {
            table_id: t.table_id,
            number_of_guests: t.number_of_guests,
            table_number: t.table_number,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

impl From<DiningTableRow> for DiningTable {
    fn from(r: DiningTableRow) -> Self {
        Self {
            table_id: r.table_id,
            number_of_guests: r.number_of_guests,
            table_number: r.table_number,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = dining_tables)]
pub struct DiningTableChangeset {
    pub number_of_guests: Option<i32>,
    pub table_number: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl DiningTableChangeset {
    pub fn new(patch: &DiningTablePatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            number_of_guests: patch.number_of_guests,
            table_number: patch.table_number,
            updated_at,
        }
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub order_id: String,
    pub order_date: DateTime<Utc>,
    pub table_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderRow {
    fn from(o: Order) -> Self {
        Self {
            order_id: o.order_id,
            order_date: o.order_date,
            table_id: o.table_id,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

impl From<OrderRow> for Order {
    fn from(r: OrderRow) -> Self {
        Self {
            order_id: r.order_id,
            order_date: r.order_date,
            table_id: r.table_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChangeset {
    pub order_date: Option<DateTime<Utc>>,
    pub table_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl OrderChangeset {
    pub fn new(patch: &OrderPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            order_date: patch.order_date,
            table_id: patch.table_id.clone(),
            updated_at,
        }
    }
}

// ── Order items ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub order_item_id: String,
    pub quantity: String,
    pub unit_price: f64,
    pub food_id: String,
    pub order_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderItem> for OrderItemRow {
    fn from(i: OrderItem) -> Self {
        Self {
            order_item_id: i.order_item_id,
            quantity: i.quantity.as_str().to_string(),
            unit_price: i.unit_price,
            food_id: i.food_id,
            order_id: i.order_id,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = DomainError;

    fn try_from(r: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity: PortionSize = r
            .quantity
            .parse()
            .map_err(|e| decode_failed("order_items", &r.order_item_id, e))?;
        Ok(Self {
            order_item_id: r.order_item_id,
            quantity,
            unit_price: r.unit_price,
            food_id: r.food_id,
            order_id: r.order_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = order_items)]
pub struct OrderItemChangeset {
    pub quantity: Option<String>,
    pub unit_price: Option<f64>,
    pub food_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl OrderItemChangeset {
    pub fn new(patch: &OrderItemPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            quantity: patch.quantity.map(|q| q.as_str().to_string()),
            unit_price: patch.unit_price,
            food_id: patch.food_id.clone(),
            updated_at,
        }
    }
}

// ── Invoices ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvoiceRow {
    pub invoice_id: String,
    pub order_id: String,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub payment_due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceRow {
    fn from(i: Invoice) -> Self {
        Self {
            invoice_id: i.invoice_id,
            order_id: i.order_id,
            payment_method: i.payment_method.map(|m| m.as_str().to_string()),
            payment_status: i.payment_status.map(|s| s.as_str().to_string()),
            payment_due_date: i.payment_due_date,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(r: InvoiceRow) -> Result<Self, Self::Error> {
        let payment_method = r
            .payment_method
            .as_deref()
            .map(str::parse::<PaymentMethod>)
            .transpose()
            .map_err(|e| decode_failed("invoices", &r.invoice_id, e))?;
        let payment_status = r
            .payment_status
            .as_deref()
            .map(str::parse::<PaymentStatus>)
            .transpose()
            .map_err(|e| decode_failed("invoices", &r.invoice_id, e))?;
        Ok(Self {
            invoice_id: r.invoice_id,
            order_id: r.order_id,
            payment_method,
            payment_status,
            payment_due_date: r.payment_due_date,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = invoices)]
pub struct InvoiceChangeset {
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceChangeset {
    pub fn new(patch: &InvoicePatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            payment_method: patch.payment_method.map(|m| m.as_str().to_string()),
            payment_status: patch.payment_status.map(|s| s.as_str().to_string()),
            updated_at,
        }
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserRow {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            phone: u.phone,
            avatar: u.avatar,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            user_id: r.user_id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone: r.phone,
            avatar: r.avatar,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_row(quantity: &str) -> OrderItemRow {
        let now = Utc::now();
        OrderItemRow {
            order_item_id: "oi-1".to_string(),
            quantity: quantity.to_string(),
            unit_price: 4.5,
            food_id: "f1".to_string(),
            order_id: "o1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn order_item_row_decodes_known_quantity() {
        let item = OrderItem::try_from(item_row("M")).expect("decode");
        assert_eq!(item.quantity, PortionSize::Medium);
    }

    #[test]
    fn order_item_row_with_unknown_quantity_is_decode_failure() {
        let err = OrderItem::try_from(item_row("XXL")).unwrap_err();
        assert!(matches!(err, DomainError::DecodeFailed(msg) if msg.contains("oi-1")));
    }

    #[test]
    fn invoice_row_keeps_empty_payment_method_distinct_from_missing() {
        let now = Utc::now();
        let row = InvoiceRow {
            invoice_id: "i1".to_string(),
            order_id: "o1".to_string(),
            payment_method: Some(String::new()),
            payment_status: None,
            payment_due_date: now,
            created_at: now,
            updated_at: now,
        };
        let invoice = Invoice::try_from(row).expect("decode");
        assert_eq!(invoice.payment_method, Some(PaymentMethod::Unspecified));
        assert_eq!(invoice.payment_status, None);
    }

    #[test]
    fn invoice_row_with_unknown_status_is_decode_failure() {
        let now = Utc::now();
        let row = InvoiceRow {
            invoice_id: "i2".to_string(),
            order_id: "o1".to_string(),
            payment_method: None,
            payment_status: Some("REFUNDED".to_string()),
            payment_due_date: now,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            Invoice::try_from(row),
            Err(DomainError::DecodeFailed(_))
        ));
    }
}
