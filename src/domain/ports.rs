use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::catalog::{Food, FoodFilter, FoodPatch, Menu, MenuPatch};
use super::errors::DomainError;
use super::invoice::{Invoice, InvoicePatch};
use super::order::{DiningTable, DiningTablePatch, Order, OrderFilter, OrderItem, OrderItemPatch, OrderPatch};
use super::pagination::Window;
use super::user::User;

/// Persistence primitives over the restaurant collections.
///
/// Listings are ordered by `created_at` ascending, then identifier. `count_*`
/// methods take the same filter as their listing so a page and its total
/// always describe the same record set. `update_*` methods return whether a
/// record matched; they never create one.
pub trait EntityStore: Send + Sync + 'static {
    fn find_menu(&self, menu_id: &str) -> Result<Option<Menu>, DomainError>;
    fn list_menus(&self) -> Result<Vec<Menu>, DomainError>;
    fn insert_menu(&self, menu: Menu) -> Result<(), DomainError>;
    fn update_menu(
        &self,
        menu_id: &str,
        patch: &MenuPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    fn find_food(&self, food_id: &str) -> Result<Option<Food>, DomainError>;
    fn find_foods(&self, food_ids: &[String]) -> Result<Vec<Food>, DomainError>;
    fn list_foods(&self, filter: &FoodFilter, window: Window) -> Result<Vec<Food>, DomainError>;
    fn count_foods(&self, filter: &FoodFilter) -> Result<i64, DomainError>;
    fn insert_food(&self, food: Food) -> Result<(), DomainError>;
    fn update_food(
        &self,
        food_id: &str,
        patch: &FoodPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    fn find_table(&self, table_id: &str) -> Result<Option<DiningTable>, DomainError>;
    fn find_tables(&self, table_ids: &[String]) -> Result<Vec<DiningTable>, DomainError>;
    fn list_tables(&self) -> Result<Vec<DiningTable>, DomainError>;
    fn insert_table(&self, table: DiningTable) -> Result<(), DomainError>;
    fn update_table(
        &self,
        table_id: &str,
        patch: &DiningTablePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    fn find_order(&self, order_id: &str) -> Result<Option<Order>, DomainError>;
    fn find_orders(&self, order_ids: &[String]) -> Result<Vec<Order>, DomainError>;
    fn list_orders(&self, filter: &OrderFilter, window: Window) -> Result<Vec<Order>, DomainError>;
    fn count_orders(&self, filter: &OrderFilter) -> Result<i64, DomainError>;
    fn insert_order(&self, order: Order) -> Result<(), DomainError>;
    /// Insert a new order and its first items atomically.
    fn insert_order_with_items(&self, order: Order, items: Vec<OrderItem>) -> Result<(), DomainError>;
    fn update_order(
        &self,
        order_id: &str,
        patch: &OrderPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    fn find_order_item(&self, order_item_id: &str) -> Result<Option<OrderItem>, DomainError>;
    fn order_items_for_order(&self, order_id: &str) -> Result<Vec<OrderItem>, DomainError>;
    fn list_order_items(&self) -> Result<Vec<OrderItem>, DomainError>;
    fn insert_order_items(&self, items: Vec<OrderItem>) -> Result<(), DomainError>;
    fn update_order_item(
        &self,
        order_item_id: &str,
        patch: &OrderItemPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    fn find_invoice(&self, invoice_id: &str) -> Result<Option<Invoice>, DomainError>;
    fn list_invoices(&self, window: Window) -> Result<Vec<Invoice>, DomainError>;
    fn count_invoices(&self) -> Result<i64, DomainError>;
    fn insert_invoice(&self, invoice: Invoice) -> Result<(), DomainError>;
    fn update_invoice(
        &self,
        invoice_id: &str,
        patch: &InvoicePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    fn find_user(&self, user_id: &str) -> Result<Option<User>, DomainError>;
    fn list_users(&self, window: Window) -> Result<Vec<User>, DomainError>;
    fn count_users(&self) -> Result<i64, DomainError>;
    fn insert_user(&self, user: User) -> Result<(), DomainError>;
}

/// Store handle shared by every service of one running app.
pub type SharedStore = Arc<dyn EntityStore>;
