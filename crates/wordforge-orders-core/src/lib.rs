//! Wordforge Orders Core - Order lifecycle logic
//!
//! The order aggregate: creation with globally unique order/item numbers,
//! the status machine, delivery and customer-upload bookkeeping.
//!
//! # Example
//!
//! ```rust,ignore
//! use wordforge_orders_core::{OrderService, OrdersConfig, OrderItemSpec};
//!
//! let orders = OrderService::new(OrdersConfig::default(), order_repo, seq_repo, user_repo);
//!
//! let order = orders
//!     .create_order(user_id, items, declared_delivery_date)
//!     .await?;
//! orders.cancel_order(order.id).await?;
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use config::OrdersConfig;
pub use error::OrderError;
pub use service::{order_total_cents, validate_order_input, NewAttachment, OrderItemSpec, OrderService};
