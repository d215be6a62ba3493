//! A canned-response storefront client for SDK tests.
//!
//! Responses are consumed front-to-back; every call is also recorded so
//! tests can assert that an operation issued no request at all, which is
//! part of several contracts (quantity floor, empty-cart guard).

use std::collections::VecDeque;
use std::sync::Mutex;

use bookstore_api::{
    Book,
    BookSearchParams,
    CartItem,
    CartSummary,
    Order,
    OrderRequest,
    ProfileUpdate,
    StatusCode,
    StoreApi,
    StoreApiError,
    UserProfile,
};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MockRequest {
    SearchBooks,
    BookDetails(String),
    Cart,
    AddCartItem { isbn: String, quantity: u32 },
    UpdateCartItem { isbn: String, quantity: u32 },
    RemoveCartItem(String),
    ClearCart,
    CartCount,
    PlaceOrder { credit_card_no: String, expiry_date: String },
    Orders,
    OrderDetails(u64),
    Profile,
    UpdateProfile,
    ChangePassword,
}

#[derive(Debug)]
pub(crate) enum MockResponse {
    Books(Vec<Book>),
    Book(Book),
    Cart(CartSummary),
    /// Unit success for mutations.
    Done,
    Count(u64),
    Order(Order),
    Orders(Vec<Order>),
    Profile(UserProfile),
    Error(StoreApiError),
}

impl MockResponse {
    /// A `Server` error with the given status and message.
    pub(crate) fn server_error(status: u16, message: &str) -> Self {
        MockResponse::Error(StoreApiError::Server {
            status: StatusCode::from_u16(status).unwrap(),
            message: message.to_string(),
        })
    }
}

pub(crate) struct MockStore {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<MockRequest>>,
}

impl MockStore {
    pub(crate) fn new(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        MockStore {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// All requests issued so far, in order.
    pub(crate) fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Drop the request log, e.g. after test setup calls.
    pub(crate) fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    pub(crate) fn push_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    fn record(&self, request: MockRequest) -> MockResponse {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock store ran out of canned responses")
    }
}

impl StoreApi for &MockStore {
    async fn search_books(&self, _params: &BookSearchParams) -> Result<Vec<Book>, StoreApiError> {
        match self.record(MockRequest::SearchBooks) {
            MockResponse::Books(books) => Ok(books),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for search_books: {other:?}"),
        }
    }

    async fn book_details(&self, isbn: &str) -> Result<Book, StoreApiError> {
        match self.record(MockRequest::BookDetails(isbn.to_string())) {
            MockResponse::Book(book) => Ok(book),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for book_details: {other:?}"),
        }
    }

    async fn cart(&self) -> Result<CartSummary, StoreApiError> {
        match self.record(MockRequest::Cart) {
            MockResponse::Cart(summary) => Ok(summary),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for cart: {other:?}"),
        }
    }

    async fn add_cart_item(&self, isbn: &str, quantity: u32) -> Result<(), StoreApiError> {
        match self.record(MockRequest::AddCartItem {
            isbn: isbn.to_string(),
            quantity,
        }) {
            MockResponse::Done => Ok(()),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for add_cart_item: {other:?}"),
        }
    }

    async fn update_cart_item(&self, isbn: &str, quantity: u32) -> Result<(), StoreApiError> {
        match self.record(MockRequest::UpdateCartItem {
            isbn: isbn.to_string(),
            quantity,
        }) {
            MockResponse::Done => Ok(()),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for update_cart_item: {other:?}"),
        }
    }

    async fn remove_cart_item(&self, isbn: &str) -> Result<(), StoreApiError> {
        match self.record(MockRequest::RemoveCartItem(isbn.to_string())) {
            MockResponse::Done => Ok(()),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for remove_cart_item: {other:?}"),
        }
    }

    async fn clear_cart(&self) -> Result<(), StoreApiError> {
        match self.record(MockRequest::ClearCart) {
            MockResponse::Done => Ok(()),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for clear_cart: {other:?}"),
        }
    }

    async fn cart_count(&self) -> Result<u64, StoreApiError> {
        match self.record(MockRequest::CartCount) {
            MockResponse::Count(count) => Ok(count),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for cart_count: {other:?}"),
        }
    }

    async fn place_order(&self, payment: &OrderRequest) -> Result<Order, StoreApiError> {
        match self.record(MockRequest::PlaceOrder {
            credit_card_no: payment.credit_card_no.clone(),
            expiry_date: payment.expiry_date.clone(),
        }) {
            MockResponse::Order(order) => Ok(order),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for place_order: {other:?}"),
        }
    }

    async fn orders(&self) -> Result<Vec<Order>, StoreApiError> {
        match self.record(MockRequest::Orders) {
            MockResponse::Orders(orders) => Ok(orders),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for orders: {other:?}"),
        }
    }

    async fn order_details(&self, order_id: u64) -> Result<Order, StoreApiError> {
        match self.record(MockRequest::OrderDetails(order_id)) {
            MockResponse::Order(order) => Ok(order),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for order_details: {other:?}"),
        }
    }

    async fn profile(&self) -> Result<UserProfile, StoreApiError> {
        match self.record(MockRequest::Profile) {
            MockResponse::Profile(profile) => Ok(profile),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for profile: {other:?}"),
        }
    }

    async fn update_profile(&self, _update: &ProfileUpdate) -> Result<(), StoreApiError> {
        match self.record(MockRequest::UpdateProfile) {
            MockResponse::Done => Ok(()),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for update_profile: {other:?}"),
        }
    }

    async fn change_password(&self, _current: &str, _new: &str) -> Result<(), StoreApiError> {
        match self.record(MockRequest::ChangePassword) {
            MockResponse::Done => Ok(()),
            MockResponse::Error(err) => Err(err),
            other => panic!("unexpected canned response for change_password: {other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// A cart line with a server-computed total.
pub(crate) fn line(isbn: &str, quantity: u32, unit_price: &str) -> CartItem {
    let selling_price: Decimal = unit_price.parse().unwrap();
    CartItem {
        isbn: isbn.to_string(),
        title: format!("Book {isbn}"),
        authors: None,
        selling_price,
        quantity,
        total_price: selling_price * Decimal::from(quantity),
    }
}

/// A cart summary whose total is the sum of its line totals, the way the
/// server computes it.
pub(crate) fn cart_summary(items: Vec<CartItem>) -> CartSummary {
    let total = items.iter().map(|item| item.total_price).sum();
    let count = items.iter().map(|item| u64::from(item.quantity)).sum();
    CartSummary {
        items,
        count: Some(count),
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Responses are consumed in order and every call lands in the log.
    #[tokio::test]
    async fn canned_responses_consumed_in_order() {
        let store = MockStore::new([
            MockResponse::Count(3),
            MockResponse::Book(Book {
                isbn: "978-1".to_string(),
                title: "Book 978-1".to_string(),
                authors: None,
                publisher_name: None,
                category: None,
                selling_price: Decimal::from(10),
                stock: 2,
            }),
        ]);
        store.push_response(MockResponse::Profile(UserProfile {
            user_id: 1,
            username: "reader".to_string(),
            first_name: "Avid".to_string(),
            last_name: "Reader".to_string(),
            email: "reader@example.com".to_string(),
            phone_number: None,
            shipping_address: None,
        }));

        let client = &store;
        assert_eq!(client.cart_count().await.unwrap(), 3);
        assert_eq!(client.book_details("978-1").await.unwrap().stock, 2);
        assert_eq!(client.profile().await.unwrap().username, "reader");

        assert_eq!(store.requests(), vec![
            MockRequest::CartCount,
            MockRequest::BookDetails("978-1".to_string()),
            MockRequest::Profile,
        ]);
    }
}
