pub mod bounded;
pub mod catalog_service;
pub mod invoice_service;
pub mod listing;
pub mod order_service;
pub mod order_view;
pub mod user_service;

use uuid::Uuid;

/// Public identifier for a newly created record.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
