//! Domain layer for the bookstore storefront.
//!
//! Builds the customer-facing flows on top of [`bookstore_api`]:
//! cart management with post-mutation re-sync, the checkout state machine
//! with local payment validation, and read-only order history.

pub mod models;
pub mod storefront;

#[cfg(test)]
pub(crate) mod mock_store;

/// Version advertised in the user agent of outgoing requests.
pub static BOOKSTORE_VERSION: &str = env!("CARGO_PKG_VERSION");
