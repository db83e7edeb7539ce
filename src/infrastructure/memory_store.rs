use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::catalog::{Food, FoodFilter, FoodPatch, Menu, MenuPatch};
use crate::domain::deadline;
use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoicePatch};
use crate::domain::order::{
    DiningTable, DiningTablePatch, Order, OrderFilter, OrderItem, OrderItemPatch, OrderPatch,
};
use crate::domain::pagination::Window;
use crate::domain::ports::EntityStore;
use crate::domain::user::User;

#[derive(Default)]
struct Collections {
    menus: Vec<Menu>,
    foods: Vec<Food>,
    tables: Vec<DiningTable>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    invoices: Vec<Invoice>,
    users: Vec<User>,
}

/// Process-local store used by tests and by `STORE=memory` runs.
///
/// `set_latency` and `fail_with` simulate a slow or broken backend; both
/// apply to every subsequent call.
#[derive(Default)]
pub struct InMemoryStore {
    data: RwLock<Collections>,
    latency: Mutex<Option<Duration>>,
    failure: Mutex<Option<DomainError>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut guard) = self.latency.lock() {
            *guard = latency;
        }
    }

    pub fn fail_with(&self, failure: Option<DomainError>) {
        if let Ok(mut guard) = self.failure.lock() {
            *guard = failure;
        }
    }

    fn gate(&self) -> Result<(), DomainError> {
        let latency = *self.latency.lock().map_err(poisoned)?;
        if let Some(latency) = latency {
            thread::sleep(latency);
        }
        match self.failure.lock().map_err(poisoned)?.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, DomainError> {
        self.gate()?;
        deadline::check()?;
        self.data.read().map_err(poisoned)
    }

    /// The deadline is checked with the lock held, so a write either lands
    /// before the deadline or not at all.
    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, DomainError> {
        self.gate()?;
        let guard = self.data.write().map_err(poisoned)?;
        deadline::check()?;
        Ok(guard)
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::Internal("in-memory store lock poisoned".to_string())
}

fn duplicate(collection: &str, id: &str) -> DomainError {
    DomainError::Internal(format!("duplicate key '{id}' in {collection}"))
}

/// Sort by creation time then identifier, the order every listing uses.
fn sort_by_creation<T>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, &str)) {
    rows.sort_by(|a, b| key(a).cmp(&key(b)));
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl EntityStore for InMemoryStore {
    fn find_menu(&self, menu_id: &str) -> Result<Option<Menu>, DomainError> {
        Ok(self.read()?.menus.iter().find(|m| m.menu_id == menu_id).cloned())
    }

    fn list_menus(&self) -> Result<Vec<Menu>, DomainError> {
        let mut menus = self.read()?.menus.clone();
        sort_by_creation(&mut menus, |m| (m.created_at, m.menu_id.as_str()));
        Ok(menus)
    }

    fn insert_menu(&self, menu: Menu) -> Result<(), DomainError> {
        let mut data = self.write()?;
        if data.menus.iter().any(|m| m.menu_id == menu.menu_id) {
            return Err(duplicate("menus", &menu.menu_id));
        }
        data.menus.push(menu);
        Ok(())
    }

    fn update_menu(
        &self,
        menu_id: &str,
        patch: &MenuPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut data = self.write()?;
        let Some(menu) = data.menus.iter_mut().find(|m| m.menu_id == menu_id) else {
            return Ok(false);
        };
        if let Some(name) = &patch.name {
            menu.name = name.clone();
        }
        if let Some(category) = &patch.category {
            menu.category = category.clone();
        }
        if patch.start_date.is_some() {
            menu.start_date = patch.start_date;
        }
        if patch.end_date.is_some() {
            menu.end_date = patch.end_date;
        }
        menu.updated_at = updated_at;
        Ok(true)
    }

    fn find_food(&self, food_id: &str) -> Result<Option<Food>, DomainError> {
        Ok(self.read()?.foods.iter().find(|f| f.food_id == food_id).cloned())
    }

    fn find_foods(&self, food_ids: &[String]) -> Result<Vec<Food>, DomainError> {
        Ok(self
            .read()?
            .foods
            .iter()
            .filter(|f| food_ids.contains(&f.food_id))
            .cloned()
            .collect())
    }

    fn list_foods(&self, filter: &FoodFilter, window: Window) -> Result<Vec<Food>, DomainError> {
        let mut foods: Vec<Food> = self
            .read()?
            .foods
            .iter()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        sort_by_creation(&mut foods, |f| (f.created_at, f.food_id.as_str()));
        Ok(window.slice(&foods))
    }

    fn count_foods(&self, filter: &FoodFilter) -> Result<i64, DomainError> {
        Ok(count(self.read()?.foods.iter().filter(|f| filter.matches(f)).count()))
    }

    fn insert_food(&self, food: Food) -> Result<(), DomainError> {
        let mut data = self.write()?;
        if data.foods.iter().any(|f| f.food_id == food.food_id) {
            return Err(duplicate("foods", &food.food_id));
        }
        data.foods.push(food);
        Ok(())
    }

    fn update_food(
        &self,
        food_id: &str,
        patch: &FoodPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut data = self.write()?;
        let Some(food) = data.foods.iter_mut().find(|f| f.food_id == food_id) else {
            return Ok(false);
        };
        if let Some(name) = &patch.name {
            food.name = name.clone();
        }
        if let Some(price) = patch.price {
            food.price = price;
        }
        if let Some(image) = &patch.food_image {
            food.food_image = image.clone();
        }
        if let Some(menu_id) = &patch.menu_id {
            food.menu_id = menu_id.clone();
        }
        food.updated_at = updated_at;
        Ok(true)
    }

    fn find_table(&self, table_id: &str) -> Result<Option<DiningTable>, DomainError> {
        Ok(self.read()?.tables.iter().find(|t| t.table_id == table_id).cloned())
    }

    fn find_tables(&self, table_ids: &[String]) -> Result<Vec<DiningTable>, DomainError> {
        Ok(self
            .read()?
            .tables
            .iter()
            .filter(|t| table_ids.contains(&t.table_id))
            .cloned()
            .collect())
    }

    fn list_tables(&self) -> Result<Vec<DiningTable>, DomainError> {
        let mut tables = self.read()?.tables.clone();
        sort_by_creation(&mut tables, |t| (t.created_at, t.table_id.as_str()));
        Ok(tables)
    }

    fn insert_table(&self, table: DiningTable) -> Result<(), DomainError> {
        let mut data = self.write()?;
        if data.tables.iter().any(|t| t.table_id == table.table_id) {
            return Err(duplicate("dining_tables", &table.table_id));
        }
        data.tables.push(table);
        Ok(())
    }

    fn update_table(
        &self,
        table_id: &str,
        patch: &DiningTablePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut data = self.write()?;
        let Some(table) = data.tables.iter_mut().find(|t| t.table_id == table_id) else {
            return Ok(false);
        };
        if let Some(guests) = patch.number_of_guests {
            table.number_of_guests = guests;
        }
        if let Some(number) = patch.table_number {
            table.table_number = number;
        }
        table.updated_at = updated_at;
        Ok(true)
    }

    fn find_order(&self, order_id: &str) -> Result<Option<Order>, DomainError> {
        Ok(self.read()?.orders.iter().find(|o| o.order_id == order_id).cloned())
    }

    fn find_orders(&self, order_ids: &[String]) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .read()?
            .orders
            .iter()
            .filter(|o| order_ids.contains(&o.order_id))
            .cloned()
            .collect())
    }

    fn list_orders(&self, filter: &OrderFilter, window: Window) -> Result<Vec<Order>, DomainError> {
        let mut orders: Vec<Order> = self
            .read()?
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        sort_by_creation(&mut orders, |o| (o.created_at, o.order_id.as_str()));
        Ok(window.slice(&orders))
    }

    fn count_orders(&self, filter: &OrderFilter) -> Result<i64, DomainError> {
        Ok(count(self.read()?.orders.iter().filter(|o| filter.matches(o)).count()))
    }

    fn insert_order(&self, order: Order) -> Result<(), DomainError> {
        let mut data = self.write()?;
        if data.orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(duplicate("orders", &order.order_id));
        }
        data.orders.push(order);
        Ok(())
    }

    fn insert_order_with_items(&self, order: Order, items: Vec<OrderItem>) -> Result<(), DomainError> {
        let mut data = self.write()?;
        if data.orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(duplicate("orders", &order.order_id));
        }
        if let Some(item) = items
            .iter()
            .find(|i| data.order_items.iter().any(|e| e.order_item_id == i.order_item_id))
        {
            return Err(duplicate("order_items", &item.order_item_id));
        }
        data.orders.push(order);
        data.order_items.extend(items);
        Ok(())
    }

    fn update_order(
        &self,
        order_id: &str,
        patch: &OrderPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut data = self.write()?;
        let Some(order) = data.orders.iter_mut().find(|o| o.order_id == order_id) else {
            return Ok(false);
        };
        if let Some(date) = patch.order_date {
            order.order_date = date;
        }
        if patch.table_id.is_some() {
            order.table_id = patch.table_id.clone();
        }
        order.updated_at = updated_at;
        Ok(true)
    }

    fn find_order_item(&self, order_item_id: &str) -> Result<Option<OrderItem>, DomainError> {
        Ok(self
            .read()?
            .order_items
            .iter()
            .find(|i| i.order_item_id == order_item_id)
            .cloned())
    }

    fn order_items_for_order(&self, order_id: &str) -> Result<Vec<OrderItem>, DomainError> {
        let mut items: Vec<OrderItem> = self
            .read()?
            .order_items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect();
        sort_by_creation(&mut items, |i| (i.created_at, i.order_item_id.as_str()));
        Ok(items)
    }

    fn list_order_items(&self) -> Result<Vec<OrderItem>, DomainError> {
        let mut items = self.read()?.order_items.clone();
        sort_by_creation(&mut items, |i| (i.created_at, i.order_item_id.as_str()));
        Ok(items)
    }

    fn insert_order_items(&self, items: Vec<OrderItem>) -> Result<(), DomainError> {
        let mut data = self.write()?;
        if let Some(item) = items
            .iter()
            .find(|i| data.order_items.iter().any(|e| e.order_item_id == i.order_item_id))
        {
            return Err(duplicate("order_items", &item.order_item_id));
        }
        data.order_items.extend(items);
        Ok(())
    }

    fn update_order_item(
        &self,
        order_item_id: &str,
        patch: &OrderItemPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut data = self.write()?;
        let Some(item) = data
            .order_items
            .iter_mut()
            .find(|i| i.order_item_id == order_item_id)
        else {
            return Ok(false);
        };
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(price) = patch.unit_price {
            item.unit_price = price;
        }
        if let Some(food_id) = &patch.food_id {
            item.food_id = food_id.clone();
        }
        item.updated_at = updated_at;
        Ok(true)
    }

    fn find_invoice(&self, invoice_id: &str) -> Result<Option<Invoice>, DomainError> {
        Ok(self
            .read()?
            .invoices
            .iter()
            .find(|i| i.invoice_id == invoice_id)
            .cloned())
    }

    fn list_invoices(&self, window: Window) -> Result<Vec<Invoice>, DomainError> {
        let mut invoices = self.read()?.invoices.clone();
        sort_by_creation(&mut invoices, |i| (i.created_at, i.invoice_id.as_str()));
        Ok(window.slice(&invoices))
    }

    fn count_invoices(&self) -> Result<i64, DomainError> {
        Ok(count(self.read()?.invoices.len()))
    }

    fn insert_invoice(&self, invoice: Invoice) -> Result<(), DomainError> {
        let mut data = self.write()?;
        if data.invoices.iter().any(|i| i.invoice_id == invoice.invoice_id) {
            return Err(duplicate("invoices", &invoice.invoice_id));
        }
        data.invoices.push(invoice);
        Ok(())
    }

    fn update_invoice(
        &self,
        invoice_id: &str,
        patch: &InvoicePatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut data = self.write()?;
        let Some(invoice) = data.invoices.iter_mut().find(|i| i.invoice_id == invoice_id) else {
            return Ok(false);
        };
        if patch.payment_method.is_some() {
            invoice.payment_method = patch.payment_method;
        }
        if patch.payment_status.is_some() {
            invoice.payment_status = patch.payment_status;
        }
        invoice.updated_at = updated_at;
        Ok(true)
    }

    fn find_user(&self, user_id: &str) -> Result<Option<User>, DomainError> {
        Ok(self.read()?.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    fn list_users(&self, window: Window) -> Result<Vec<User>, DomainError> {
        let mut users = self.read()?.users.clone();
        sort_by_creation(&mut users, |u| (u.created_at, u.user_id.as_str()));
        Ok(window.slice(&users))
    }

    fn count_users(&self) -> Result<i64, DomainError> {
        Ok(count(self.read()?.users.len()))
    }

    fn insert_user(&self, user: User) -> Result<(), DomainError> {
        let mut data = self.write()?;
        if data.users.iter().any(|u| u.user_id == user.user_id) {
            return Err(duplicate("users", &user.user_id));
        }
        data.users.push(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deadline::Deadline;
    use chrono::Duration as ChronoDuration;

    fn food(id: &str, menu_id: &str, created_at: DateTime<Utc>) -> Food {
        Food {
            food_id: id.to_string(),
            name: format!("dish {id}"),
            price: 1.0,
            food_image: "img.png".to_string(),
            menu_id: menu_id.to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn listing_orders_by_creation_then_id() {
        let store = InMemoryStore::new();
        let t0 = Utc::now();
        store.insert_food(food("b", "m1", t0)).unwrap();
        store.insert_food(food("c", "m1", t0 - ChronoDuration::seconds(5))).unwrap();
        store.insert_food(food("a", "m1", t0)).unwrap();

        let ids: Vec<String> = store
            .list_foods(&FoodFilter::default(), Window { skip: 0, limit: 10 })
            .unwrap()
            .into_iter()
            .map(|f| f.food_id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn count_uses_the_listing_filter() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.insert_food(food("a", "m1", now)).unwrap();
        store.insert_food(food("b", "m2", now)).unwrap();
        let filter = FoodFilter {
            menu_id: Some("m2".to_string()),
        };
        assert_eq!(store.count_foods(&filter).unwrap(), 1);
        assert_eq!(store.count_foods(&FoodFilter::default()).unwrap(), 2);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.insert_food(food("a", "m1", now)).unwrap();
        assert!(store.insert_food(food("a", "m1", now)).is_err());
    }

    #[test]
    fn update_of_missing_record_matches_nothing() {
        let store = InMemoryStore::new();
        let matched = store
            .update_food("ghost", &FoodPatch::default(), Utc::now())
            .unwrap();
        assert!(!matched);
    }

    #[test]
    fn injected_failure_applies_to_every_call() {
        let store = InMemoryStore::new();
        store.fail_with(Some(DomainError::Internal("connection reset".to_string())));
        assert!(matches!(store.list_menus(), Err(DomainError::Internal(_))));
        store.fail_with(None);
        assert!(store.list_menus().unwrap().is_empty());
    }

    #[test]
    fn write_past_the_deadline_is_dropped() {
        let store = InMemoryStore::new();
        store.set_latency(Some(Duration::from_millis(40)));
        {
            let _armed = Deadline::after(Duration::from_millis(10)).enter();
            let err = store.insert_food(food("late", "m1", Utc::now())).unwrap_err();
            assert!(matches!(err, DomainError::Timeout(_)));
        }
        store.set_latency(None);
        assert_eq!(store.count_foods(&FoodFilter::default()).unwrap(), 0);
    }
}
