//! Wire types for the storefront API.
//!
//! Field names follow the server's JSON verbatim (`selling_price`,
//! `total_price`, `publisher_name`, ...). Monetary values are decoded into
//! [`Decimal`] so totals survive comparison without float drift; the server
//! remains the only party that ever computes them.

use std::fmt;
use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A catalog entry as returned by `GET /books/search` and `GET /books/<isbn>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    /// Display string of all authors; absent when the catalog has none on
    /// record.
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub publisher_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub selling_price: Decimal,
    /// Remaining inventory; gates whether "add to cart" is permitted.
    pub stock: u32,
}

impl Book {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// The catalog categories the storefront recognizes.
///
/// Used for the search filter; [`Book::category`] stays a raw string so an
/// unknown server-side category cannot fail a whole search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Science,
    Art,
    Religion,
    History,
    Geography,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Science,
        Category::Art,
        Category::Religion,
        Category::History,
        Category::Geography,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Science => "Science",
            Category::Art => "Art",
            Category::Religion => "Religion",
            Category::History => "History",
            Category::Geography => "Geography",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}', expected one of Science, Art, Religion, History, Geography")]
pub struct UnknownCategory(pub String);

/// Filter criteria for `GET /books/search`.
///
/// Empty criteria are omitted from the query string; an entirely empty set
/// of parameters lists the whole catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookSearchParams {
    pub query: Option<String>,
    pub category: Option<Category>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
}

impl BookSearchParams {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref term) = self.query {
            query.push(("query", term.clone()));
        }
        if let Some(category) = self.category {
            query.push(("category", category.to_string()));
        }
        if let Some(ref author) = self.author {
            query.push(("author", author.clone()));
        }
        if let Some(ref publisher) = self.publisher {
            query.push(("publisher", publisher.clone()));
        }
        if let Some(ref isbn) = self.isbn {
            query.push(("isbn", isbn.clone()));
        }
        query
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) books: Vec<Book>,
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

/// One line of the shopping cart.
///
/// `total_price` is always server-computed; the client never trusts a
/// locally derived line total past the next re-sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub isbn: String,
    pub title: String,
    #[serde(default)]
    pub authors: Option<String>,
    pub selling_price: Decimal,
    pub quantity: u32,
    pub total_price: Decimal,
}

/// Authoritative cart state as returned by `GET /customer/cart`.
///
/// Item order is the server-returned order and is preserved as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub(crate) struct CartItemRequest<'a> {
    pub(crate) isbn: &'a str,
    pub(crate) quantity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct CartRemoveRequest<'a> {
    pub(crate) isbn: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartCountResponse {
    pub(crate) count: u64,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// An immutable, already-placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    pub order_date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    pub total_price: Decimal,
    /// Last four digits of the card used; everything else is the server's
    /// responsibility to truncate and store.
    #[serde(default)]
    pub payment_last4: Option<String>,
}

/// One line item within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub isbn: String,
    pub title: String,
    pub quantity: u32,
    /// Unit price at the time the order was placed.
    pub price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersResponse {
    #[serde(default)]
    pub(crate) orders: Vec<Order>,
}

/// Payment fields submitted with `POST /customer/orders`.
///
/// The card number must already be whitespace-stripped; the expiry is sent
/// raw. Holds no CVV: the storefront order route never receives one.
#[derive(Clone, Serialize)]
pub struct OrderRequest {
    pub credit_card_no: String,
    pub expiry_date: String,
}

/// Card numbers never reach logs, not even through `{:?}`.
impl fmt::Debug for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4 = self
            .credit_card_no
            .len()
            .checked_sub(4)
            .and_then(|start| self.credit_card_no.get(start..))
            .unwrap_or("");
        f.debug_struct("OrderRequest")
            .field("credit_card_no", &format!("****{last4}"))
            .field("expiry_date", &self.expiry_date)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The authenticated customer's account record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: u64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponse {
    pub(crate) user: UserProfile,
}

/// Partial profile update; absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.shipping_address.is_none()
    }
}

#[derive(Serialize)]
pub(crate) struct PasswordChangeRequest<'a> {
    pub(crate) current_password: &'a str,
    pub(crate) new_password: &'a str,
}

impl fmt::Debug for PasswordChangeRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChangeRequest").finish_non_exhaustive()
    }
}
