use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::errors::DomainError;
use crate::domain::order::{
    DiningTable, DiningTablePatch, NewDiningTable, NewOrder, Order, OrderFilter, OrderItem,
    OrderItemPack, OrderItemPatch, OrderPatch,
};
use crate::domain::order_view::OrderLineGroup;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::EntityStore;
use crate::domain::price::normalize_price;

use super::listing::paginate;
use super::new_id;
use super::order_view::OrderViewEngine;

/// Tables, orders and the items placed on them.
pub struct OrderService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: EntityStore + ?Sized> OrderService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    // ── Tables ───────────────────────────────────────────────────────────────

    pub fn create_table(&self, input: NewDiningTable) -> Result<DiningTable, DomainError> {
        let now = Utc::now();
        let table = DiningTable {
            table_id: new_id(),
            number_of_guests: input.number_of_guests,
            table_number: input.table_number,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_table(table.clone())?;
        log::info!("created table {} (number {})", table.table_id, table.table_number);
        Ok(table)
    }

    pub fn update_table(
        &self,
        table_id: &str,
        patch: DiningTablePatch,
    ) -> Result<DiningTable, DomainError> {
        if !self.store.update_table(table_id, &patch, Utc::now())? {
            return Err(DomainError::NotFound("table"));
        }
        log::info!("updated table {}", table_id);
        self.store
            .find_table(table_id)?
            .ok_or(DomainError::NotFound("table"))
    }

    pub fn get_table(&self, table_id: &str) -> Result<Option<DiningTable>, DomainError> {
        self.store.find_table(table_id)
    }

    pub fn list_tables(&self) -> Result<Vec<DiningTable>, DomainError> {
        self.store.list_tables()
    }

    // ── Orders ───────────────────────────────────────────────────────────────

    pub fn create_order(&self, input: NewOrder) -> Result<Order, DomainError> {
        if let Some(table_id) = &input.table_id {
            self.require_table(table_id)?;
        }
        let order = self.new_order(input);
        self.store.insert_order(order.clone())?;
        log::info!("created order {}", order.order_id);
        Ok(order)
    }

    pub fn update_order(&self, order_id: &str, patch: OrderPatch) -> Result<Order, DomainError> {
        if let Some(table_id) = &patch.table_id {
            self.require_table(table_id)?;
        }
        if !self.store.update_order(order_id, &patch, Utc::now())? {
            return Err(DomainError::NotFound("order"));
        }
        log::info!("updated order {}", order_id);
        self.store
            .find_order(order_id)?
            .ok_or(DomainError::NotFound("order"))
    }

    pub fn get_order(&self, order_id: &str) -> Result<Option<Order>, DomainError> {
        self.store.find_order(order_id)
    }

    pub fn list_orders(
        &self,
        request: PageRequest,
        filter: OrderFilter,
    ) -> Result<Page<Order>, DomainError> {
        log::debug!("listing orders {:?} with {:?}", request, filter);
        paginate(
            request,
            &filter,
            |f, window| self.store.list_orders(f, window),
            |f| self.store.count_orders(f),
        )
    }

    /// Line items of one order joined with food and table data.
    pub fn order_view(&self, order_id: &str) -> Result<Vec<OrderLineGroup>, DomainError> {
        OrderViewEngine::new(Arc::clone(&self.store)).compute(order_id)
    }

    // ── Order items ──────────────────────────────────────────────────────────

    /// Insert a pack of items, either onto an existing order (`order_id`) or
    /// onto a fresh order created for `table_id`.
    ///
    /// Every item is checked before anything is written. A fresh order and
    /// its items are stored in one transaction.
    pub fn create_order_items(
        &self,
        pack: OrderItemPack,
    ) -> Result<(String, Vec<OrderItem>), DomainError> {
        if pack.items.is_empty() {
            return Err(DomainError::InvalidInput(
                "order_items must contain at least one item".to_string(),
            ));
        }
        if pack.order_id.is_some() && pack.table_id.is_some() {
            return Err(DomainError::InvalidInput(
                "give either order_id or table_id, not both".to_string(),
            ));
        }

        let food_ids: Vec<String> = pack
            .items
            .iter()
            .map(|i| i.food_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let known: HashSet<String> = self
            .store
            .find_foods(&food_ids)?
            .into_iter()
            .map(|f| f.food_id)
            .collect();
        if let Some(missing) = pack.items.iter().find(|i| !known.contains(&i.food_id)) {
            log::warn!("rejected order items: food {} was not found", missing.food_id);
            return Err(DomainError::NotFound("food"));
        }

        let existing = match &pack.order_id {
            Some(order_id) => Some(
                self.store
                    .find_order(order_id)?
                    .ok_or(DomainError::NotFound("order"))?,
            ),
            None => {
                if let Some(table_id) = &pack.table_id {
                    self.require_table(table_id)?;
                }
                None
            }
        };
        let order = existing.clone().unwrap_or_else(|| {
            self.new_order(NewOrder {
                order_date: None,
                table_id: pack.table_id.clone(),
            })
        });

        let now = Utc::now();
        let mut items = Vec::with_capacity(pack.items.len());
        for (i, input) in pack.items.into_iter().enumerate() {
            // one microsecond apart so the (created_at, id) sort keeps pack order
            let stamp = now + Duration::microseconds(i as i64);
            items.push(OrderItem {
                order_item_id: new_id(),
                quantity: input.quantity,
                unit_price: normalize_price(input.unit_price)?,
                food_id: input.food_id,
                order_id: order.order_id.clone(),
                created_at: stamp,
                updated_at: stamp,
            });
        }

        if existing.is_some() {
            self.store.insert_order_items(items.clone())?;
        } else {
            self.store
                .insert_order_with_items(order.clone(), items.clone())?;
        }
        log::info!("added {} items to order {}", items.len(), order.order_id);
        Ok((order.order_id, items))
    }

    pub fn update_order_item(
        &self,
        order_item_id: &str,
        mut patch: OrderItemPatch,
    ) -> Result<OrderItem, DomainError> {
        if let Some(food_id) = &patch.food_id {
            if self.store.find_food(food_id)?.is_none() {
                log::warn!("rejected update of order item {}: food {} not found", order_item_id, food_id);
                return Err(DomainError::NotFound("food"));
            }
        }
        if let Some(price) = patch.unit_price {
            patch.unit_price = Some(normalize_price(price)?);
        }

        if !self.store.update_order_item(order_item_id, &patch, Utc::now())? {
            return Err(DomainError::NotFound("order item"));
        }
        log::info!("updated order item {}", order_item_id);
        self.store
            .find_order_item(order_item_id)?
            .ok_or(DomainError::NotFound("order item"))
    }

    pub fn get_order_item(&self, order_item_id: &str) -> Result<Option<OrderItem>, DomainError> {
        self.store.find_order_item(order_item_id)
    }

    pub fn list_order_items(&self) -> Result<Vec<OrderItem>, DomainError> {
        self.store.list_order_items()
    }

    fn new_order(&self, input: NewOrder) -> Order {
        let now = Utc::now();
        Order {
            order_id: new_id(),
            order_date: input.order_date.unwrap_or(now),
            table_id: input.table_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn require_table(&self, table_id: &str) -> Result<(), DomainError> {
        match self.store.find_table(table_id)? {
            Some(_) => Ok(()),
            None => {
                log::warn!("table {} was not found", table_id);
                Err(DomainError::NotFound("table"))
            }
        }
    }
}
