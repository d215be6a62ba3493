//! Read-only projection of the customer's past orders.

use bookstore_api::{Order, StoreApi, StoreApiError};

/// How many orders the "recent" view shows.
pub const RECENT_ORDER_COUNT: usize = 3;

/// The customer's order history, newest first as returned by the server.
///
/// Orders are immutable once created, so this is only ever fetched, never
/// mutated.
#[derive(Debug, Clone, Default)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    pub async fn fetch<C: StoreApi>(client: &C) -> Result<Self, StoreApiError> {
        let orders = client.orders().await?;
        Ok(OrderHistory { orders })
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The newest few orders, for dashboard-style summaries.
    pub fn recent(&self) -> &[Order] {
        &self.orders[..self.orders.len().min(RECENT_ORDER_COUNT)]
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
