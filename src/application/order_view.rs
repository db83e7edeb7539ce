use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::catalog::Food;
use crate::domain::errors::DomainError;
use crate::domain::order::{DiningTable, Order, OrderItem};
use crate::domain::order_view::{OrderLine, OrderLineGroup};
use crate::domain::ports::EntityStore;

/// Rebuilds the per-order line view from the item, food, order and table
/// collections.
pub struct OrderViewEngine<S: ?Sized> {
    store: Arc<S>,
}

impl<S: EntityStore + ?Sized> OrderViewEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Group the items of `order_id` with their food and table context.
    ///
    /// An unknown order, or one with no items, yields an empty list.
    pub fn compute(&self, order_id: &str) -> Result<Vec<OrderLineGroup>, DomainError> {
        log::debug!("computing order view for order {}", order_id);

        let items = self
            .store
            .order_items_for_order(order_id)
            .map_err(aggregation_failed)?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let foods = self
            .store
            .find_foods(&distinct(items.iter().map(|i| &i.food_id)))
            .map_err(aggregation_failed)?;
        let orders = self
            .store
            .find_orders(&distinct(items.iter().map(|i| &i.order_id)))
            .map_err(aggregation_failed)?;
        let table_ids = distinct(orders.iter().filter_map(|o| o.table_id.as_ref()));
        let tables = if table_ids.is_empty() {
            Vec::new()
        } else {
            self.store
                .find_tables(&table_ids)
                .map_err(aggregation_failed)?
        };

        Ok(join_order_lines(&items, &foods, &orders, &tables))
    }
}

/// Store failures become `AggregationFailed`; decode failures and timeouts
/// keep their kind.
fn aggregation_failed(err: DomainError) -> DomainError {
    match err {
        DomainError::DecodeFailed(_) | DomainError::Timeout(_) => err,
        other => DomainError::AggregationFailed(other.to_string()),
    }
}

fn distinct<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: HashSet<&'a str> = HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        if seen.insert(id.as_str()) {
            out.push(id.clone());
        }
    }
    out
}

type GroupKey = (Option<String>, Option<String>, Option<i32>);

/// Left-join every item to its food, order and the order's table, then group
/// by (order id, table id, table number). Items whose food, order or table
/// is missing are kept with those fields empty. Groups come out in the order
/// their first item appears.
pub fn join_order_lines(
    items: &[OrderItem],
    foods: &[Food],
    orders: &[Order],
    tables: &[DiningTable],
) -> Vec<OrderLineGroup> {
    let foods: HashMap<&str, &Food> = foods.iter().map(|f| (f.food_id.as_str(), f)).collect();
    let orders: HashMap<&str, &Order> = orders.iter().map(|o| (o.order_id.as_str(), o)).collect();
    let tables: HashMap<&str, &DiningTable> =
        tables.iter().map(|t| (t.table_id.as_str(), t)).collect();

    let mut groups: Vec<OrderLineGroup> = Vec::new();
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();

    for item in items {
        let food = foods.get(item.food_id.as_str()).copied();
        let order = orders.get(item.order_id.as_str()).copied();
        let table = order
            .and_then(|o| o.table_id.as_deref())
            .and_then(|id| tables.get(id))
            .copied();

        let line = OrderLine {
            amount: item.unit_price,
            food_name: food.map(|f| f.name.clone()),
            food_image: food.map(|f| f.food_image.clone()),
            table_number: table.map(|t| t.table_number),
            table_id: table.map(|t| t.table_id.clone()),
            order_id: order.map(|o| o.order_id.clone()),
            price: food.map(|f| f.price),
            quantity: item.quantity,
        };

        let key = (line.order_id.clone(), line.table_id.clone(), line.table_number);
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push(OrderLineGroup {
                payment_due: 0.0,
                total_count: 0,
                table_number: line.table_number,
                order_items: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.payment_due += line.amount;
        group.total_count += 1;
        group.order_items.push(line);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::FoodPatch;
    use crate::domain::order::PortionSize;
    use crate::infrastructure::memory_store::InMemoryStore;
    use chrono::{Duration, Utc};

    fn seed_food(store: &InMemoryStore, id: &str, name: &str, price: f64) {
        let now = Utc::now();
        store
            .insert_food(Food {
                food_id: id.to_string(),
                name: name.to_string(),
                price,
                food_image: format!("{id}.png"),
                menu_id: "m1".to_string(),
                created_at: now,
                updated_at: now,
            })
            .unwrap();
    }

    fn seed_table(store: &InMemoryStore, id: &str, number: i32) {
        let now = Utc::now();
        store
            .insert_table(DiningTable {
                table_id: id.to_string(),
                number_of_guests: 4,
                table_number: number,
                created_at: now,
                updated_at: now,
            })
            .unwrap();
    }

    fn seed_order(store: &InMemoryStore, id: &str, table_id: Option<&str>) {
        let now = Utc::now();
        store
            .insert_order(Order {
                order_id: id.to_string(),
                order_date: now,
                table_id: table_id.map(str::to_string),
                created_at: now,
                updated_at: now,
            })
            .unwrap();
    }

    fn seed_item(store: &InMemoryStore, id: &str, order_id: &str, food_id: &str, price: f64, n: i64) {
        let at = Utc::now() + Duration::milliseconds(n);
        store
            .insert_order_items(vec![OrderItem {
                order_item_id: id.to_string(),
                quantity: PortionSize::Medium,
                unit_price: price,
                food_id: food_id.to_string(),
                order_id: order_id.to_string(),
                created_at: at,
                updated_at: at,
            }])
            .unwrap();
    }

    fn engine(store: &Arc<InMemoryStore>) -> OrderViewEngine<InMemoryStore> {
        OrderViewEngine::new(Arc::clone(store))
    }

    #[test]
    fn two_item_order_sums_recorded_prices() {
        let store = Arc::new(InMemoryStore::new());
        seed_table(&store, "t7", 7);
        seed_order(&store, "O1", Some("t7"));
        seed_food(&store, "fa", "Burger", 10.0);
        seed_food(&store, "fb", "Fries", 4.5);
        seed_item(&store, "A", "O1", "fa", 10.0, 0);
        seed_item(&store, "B", "O1", "fb", 4.5, 1);

        let groups = engine(&store).compute("O1").unwrap();
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert!((group.payment_due - 14.50).abs() < 1e-9);
        assert_eq!(group.total_count, 2);
        assert_eq!(group.table_number, Some(7));
        let names: Vec<_> = group
            .order_items
            .iter()
            .map(|l| l.food_name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("Burger"), Some("Fries")]);
        assert_eq!(group.order_items[0].table_id.as_deref(), Some("t7"));
        assert_eq!(group.order_items[0].order_id.as_deref(), Some("O1"));
    }

    #[test]
    fn many_items_total_matches_sum_within_tolerance() {
        let store = Arc::new(InMemoryStore::new());
        seed_order(&store, "o", None);
        seed_food(&store, "f", "Tea", 0.1);
        let prices: Vec<f64> = (0..250).map(|i| ((i % 37) as f64) * 0.01 + 0.1).collect();
        for (i, price) in prices.iter().enumerate() {
            seed_item(&store, &format!("i{i}"), "o", "f", *price, i as i64);
        }

        let groups = engine(&store).compute("o").unwrap();
        let expected: f64 = prices.iter().sum();
        assert_eq!(groups[0].total_count, 250);
        assert!((groups[0].payment_due - expected).abs() < 1e-9);
    }

    #[test]
    fn order_without_items_yields_empty_view() {
        let store = Arc::new(InMemoryStore::new());
        seed_order(&store, "empty", None);
        assert!(engine(&store).compute("empty").unwrap().is_empty());
        assert!(engine(&store).compute("no-such-order").unwrap().is_empty());
    }

    #[test]
    fn unmatched_joins_keep_the_row() {
        let store = Arc::new(InMemoryStore::new());
        seed_order(&store, "o1", Some("ghost-table"));
        seed_item(&store, "i1", "o1", "ghost-food", 3.25, 0);

        let groups = engine(&store).compute("o1").unwrap();
        let line = &groups[0].order_items[0];
        assert_eq!(line.amount, 3.25);
        assert_eq!(line.food_name, None);
        assert_eq!(line.price, None);
        assert_eq!(line.table_number, None);
        assert_eq!(line.order_id.as_deref(), Some("o1"));
        assert_eq!(groups[0].table_number, None);
    }

    #[test]
    fn items_of_a_missing_order_still_group() {
        let store = Arc::new(InMemoryStore::new());
        seed_food(&store, "f", "Soup", 6.0);
        seed_item(&store, "i1", "orphan", "f", 6.0, 0);
        seed_item(&store, "i2", "orphan", "f", 6.0, 1);

        let groups = engine(&store).compute("orphan").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_count, 2);
        assert_eq!(groups[0].order_items[0].order_id, None);
        assert!((groups[0].payment_due - 12.0).abs() < 1e-9);
    }

    #[test]
    fn later_food_price_changes_do_not_move_the_total() {
        let store = Arc::new(InMemoryStore::new());
        seed_order(&store, "o1", None);
        seed_food(&store, "f", "Steak", 20.0);
        seed_item(&store, "i1", "o1", "f", 20.0, 0);

        let patch = FoodPatch {
            price: Some(35.0),
            ..FoodPatch::default()
        };
        store.update_food("f", &patch, Utc::now()).unwrap();

        let groups = engine(&store).compute("o1").unwrap();
        assert!((groups[0].payment_due - 20.0).abs() < 1e-9);
        assert_eq!(groups[0].order_items[0].price, Some(35.0));
    }

    #[test]
    fn store_failure_is_aggregation_failure() {
        let store = Arc::new(InMemoryStore::new());
        store.fail_with(Some(DomainError::Internal("connection refused".to_string())));
        assert!(matches!(
            engine(&store).compute("o1"),
            Err(DomainError::AggregationFailed(_))
        ));
    }

    #[test]
    fn decode_failure_keeps_its_kind() {
        let store = Arc::new(InMemoryStore::new());
        store.fail_with(Some(DomainError::DecodeFailed("bad quantity".to_string())));
        assert!(matches!(
            engine(&store).compute("o1"),
            Err(DomainError::DecodeFailed(_))
        ));
    }

    #[test]
    fn join_groups_by_table_identity() {
        let now = Utc::now();
        let order = |id: &str, table: &str| Order {
            order_id: id.to_string(),
            order_date: now,
            table_id: Some(table.to_string()),
            created_at: now,
            updated_at: now,
        };
        let item = |id: &str, order_id: &str| OrderItem {
            order_item_id: id.to_string(),
            quantity: PortionSize::Small,
            unit_price: 1.0,
            food_id: "f".to_string(),
            order_id: order_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        let table = |id: &str, n: i32| DiningTable {
            table_id: id.to_string(),
            number_of_guests: 2,
            table_number: n,
            created_at: now,
            updated_at: now,
        };

        let groups = join_order_lines(
            &[item("a", "o1"), item("b", "o2"), item("c", "o1")],
            &[],
            &[order("o1", "t1"), order("o2", "t2")],
            &[table("t1", 1), table("t2", 2)],
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].table_number, Some(1));
        assert_eq!(groups[0].total_count, 2);
        assert_eq!(groups[1].table_number, Some(2));
        assert_eq!(groups[1].total_count, 1);
    }
}
