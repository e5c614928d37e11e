//! Database Models

pub mod menu_item;
pub mod order;
pub mod serde_helpers;

pub use menu_item::{MenuItem, MenuItemCreate};
pub use order::{CreateOrderRequest, Order, OrderLine, OrderLineRequest, OrderStatus, SetStatusRequest};
