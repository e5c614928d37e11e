//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health probe
//! - [`menu`] - public read-only catalog listing
//! - [`orders`] - order creation, listings, status transitions

pub mod health;
pub mod menu;
pub mod orders;
