//! Cart management with post-mutation re-sync.
//!
//! The cart is a view onto server state, never a locally authoritative
//! copy: every mutation is followed by a fresh read so displayed totals
//! always come from the server's pricing, which may have changed since the
//! catalog was rendered.

use std::collections::HashSet;
use std::sync::Mutex;

use bookstore_api::{CartItem, CartSummary, StoreApi, StoreApiError};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

/// The locally held snapshot of the server-side cart.
///
/// Item order is the server-returned order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
}

impl CartState {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of copies across all lines.
    pub fn copies(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl From<CartSummary> for CartState {
    fn from(summary: CartSummary) -> Self {
        CartState {
            items: summary.items,
            subtotal: summary.total,
        }
    }
}

#[derive(Debug, Error)]
pub enum CartError {
    /// Another mutation for the same line is still in flight.
    #[error("'{0}' already has an update in progress")]
    ItemBusy(String),
    #[error("a book ISBN is required")]
    MissingIsbn,
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error(transparent)]
    Api(#[from] StoreApiError),
}

/// Owns the cart snapshot and serializes mutations per line.
///
/// Operations on *different* ISBNs may overlap freely; a second mutation on
/// the *same* ISBN while one is in flight fails fast with
/// [`CartError::ItemBusy`] instead of racing. UI layers can additionally
/// poll [`CartManager::is_item_busy`] to disable controls up front.
pub struct CartManager<C> {
    client: C,
    state: Mutex<CartState>,
    in_flight: Mutex<HashSet<String>>,
}

impl<C: StoreApi> CartManager<C> {
    pub fn new(client: C) -> Self {
        CartManager {
            client,
            state: Mutex::new(CartState::default()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// The last synced snapshot, without touching the network.
    pub fn snapshot(&self) -> CartState {
        self.state.lock().unwrap().clone()
    }

    /// Whether a mutation for this line is currently in flight.
    pub fn is_item_busy(&self, isbn: &str) -> bool {
        self.in_flight.lock().unwrap().contains(isbn)
    }

    /// Fetch authoritative cart state, replacing the local snapshot.
    pub async fn load(&self) -> Result<CartState, CartError> {
        let summary = self.client.cart().await?;
        let state = CartState::from(summary);
        debug!(
            lines = state.items.len(),
            subtotal = %state.subtotal,
            "cart synced"
        );
        *self.state.lock().unwrap() = state.clone();
        Ok(state)
    }

    /// Add `quantity` copies of a book to the cart.
    ///
    /// On success the returned state comes from a full re-load, not from a
    /// local mutation: server-side pricing may differ from the catalog
    /// snapshot the caller added from.
    #[instrument(skip(self))]
    pub async fn add_item(&self, isbn: &str, quantity: u32) -> Result<CartState, CartError> {
        if isbn.trim().is_empty() {
            return Err(CartError::MissingIsbn);
        }
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let _guard = self.lock_item(isbn)?;
        self.client.add_cart_item(isbn, quantity).await?;
        self.load().await
    }

    /// Set the quantity of a line to an absolute value.
    ///
    /// Quantities below 1 are ignored without a request: decrementing past
    /// the floor is "ignore", not "remove" (removal is a separate, explicit
    /// operation). After the request resolves the full cart is re-synced
    /// regardless of the outcome, to recover from partial failure.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, isbn: &str, quantity: u32) -> Result<CartState, CartError> {
        if quantity < 1 {
            debug!(isbn, "ignoring quantity update below 1");
            return Ok(self.snapshot());
        }

        let _guard = self.lock_item(isbn)?;
        let outcome = self.client.update_cart_item(isbn, quantity).await;
        let resynced = self.load().await;

        // A failed mutation takes precedence over a failed re-sync.
        outcome?;
        resynced
    }

    /// Remove a line from the cart and re-sync.
    ///
    /// Callers are expected to have confirmed the removal with the user
    /// before invoking this.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, isbn: &str) -> Result<CartState, CartError> {
        let _guard = self.lock_item(isbn)?;
        self.client.remove_cart_item(isbn).await?;
        self.load().await
    }

    /// Empty the cart.
    ///
    /// The empty state is unambiguous, so on success the local snapshot is
    /// reset without a re-fetch. On failure the snapshot is left untouched.
    pub async fn clear(&self) -> Result<CartState, CartError> {
        self.client.clear_cart().await?;
        let cleared = CartState::default();
        *self.state.lock().unwrap() = cleared.clone();
        debug!("cart cleared");
        Ok(cleared)
    }

    fn lock_item(&self, isbn: &str) -> Result<ItemGuard<'_>, CartError> {
        let mut in_flight = self.in_flight.lock().unwrap();
        if !in_flight.insert(isbn.to_string()) {
            return Err(CartError::ItemBusy(isbn.to_string()));
        }
        Ok(ItemGuard {
            set: &self.in_flight,
            isbn: isbn.to_string(),
        })
    }
}

/// Marks one ISBN as having a mutation in flight; releases on drop, also
/// when the mutation errors or is cancelled.
struct ItemGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    isbn: String,
}

impl Drop for ItemGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.isbn);
        }
    }
}
