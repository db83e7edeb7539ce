pub mod catalog;
pub mod deadline;
pub mod errors;
pub mod invoice;
pub mod order;
pub mod order_view;
pub mod pagination;
pub mod ports;
pub mod price;
pub mod user;
