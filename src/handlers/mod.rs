pub mod foods;
pub mod invoices;
pub mod menus;
pub mod order_items;
pub mod orders;
pub mod tables;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::application::bounded::run_bounded;
use crate::domain::errors::DomainError;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::SharedStore;
use crate::errors::AppError;

/// Per-worker handler state: the injected store and the bound applied to
/// every operation.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub timeout: Duration,
}

impl AppState {
    pub fn new(store: SharedStore, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Run `op` against the store off the async workers, bounded by the
    /// configured timeout.
    pub async fn run<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(SharedStore) -> Result<T, DomainError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        Ok(run_bounded(self.timeout, move || op(store)).await?)
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

/// Raw paging parameters. Values that are missing, non-numeric or below 1
/// fall back to page 1 with 10 records.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    pub page: Option<String>,
    #[serde(rename = "recordPerPage")]
    pub record_per_page: Option<String>,
}

impl PageParams {
    pub fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.record_per_page.as_deref())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageResponse<T> {
    pub page: i64,
    pub record_per_page: i64,
    pub total_count: i64,
    pub has_next: bool,
    pub items: Vec<T>,
}

impl<T> PageResponse<T> {
    pub fn from_page<D>(page: Page<D>) -> Self
    where
        T: From<D>,
    {
        Self {
            page: page.page,
            record_per_page: page.record_per_page,
            total_count: page.total_count,
            has_next: page.has_next(),
            items: page.items.into_iter().map(T::from).collect(),
        }
    }
}

pub(crate) fn parse_field<T>(raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(AppError::from)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        foods::list_foods,
        foods::get_food,
        foods::create_food,
        foods::update_food,
        menus::list_menus,
        menus::get_menu,
        menus::create_menu,
        menus::update_menu,
        tables::list_tables,
        tables::get_table,
        tables::create_table,
        tables::update_table,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::order_view,
        order_items::list_order_items,
        order_items::get_order_item,
        order_items::create_order_items,
        order_items::update_order_item,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::create_invoice,
        invoices::update_invoice,
        users::list_users,
        users::get_user,
    ),
    tags(
        (name = "foods"),
        (name = "menus"),
        (name = "tables"),
        (name = "orders"),
        (name = "order-items"),
        (name = "invoices"),
        (name = "users"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_fall_back_on_garbage() {
        let params = PageParams {
            page: Some("abc".to_string()),
            record_per_page: Some("0".to_string()),
        };
        assert_eq!(params.request(), PageRequest::default());
    }

    #[test]
    fn page_params_use_record_per_page_key() {
        let params: PageParams = serde_json::from_str(r#"{"page":"2","recordPerPage":"5"}"#).unwrap();
        let request = params.request();
        assert_eq!(request.page, 2);
        assert_eq!(request.record_per_page, 5);
    }

    #[test]
    fn openapi_lists_the_invoice_view() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/invoices/{invoice_id}"));
        assert!(doc.paths.paths.contains_key("/orders/{order_id}/items"));
    }
}
