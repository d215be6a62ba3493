//! Storefront client wrapper around a configured `reqwest` client.

use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{self, HeaderMap};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::StoreClientConfig;
use crate::error::{ResponseExt, StoreApiError};
use crate::types::*;

/// A client for the storefront service.
///
/// This is a thin wrapper around a preconfigured [`reqwest::Client`] that
/// handles:
/// - HTTP client configuration with timeouts
/// - Bearer token authentication for customer routes
/// - Error normalization into [`StoreApiError`]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
    config: StoreClientConfig,
}

impl Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("store_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StoreClient {
    /// Create a new storefront client from configuration.
    pub fn new(config: StoreClientConfig) -> Result<Self, StoreApiError> {
        let http = build_http_client(&config)?;
        let base_url = config.store_url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// Get the configured store URL.
    pub fn store_url(&self) -> &str {
        &self.base_url
    }

    /// Update the client configuration and recreate the client.
    pub fn update_config(
        &mut self,
        update: impl FnOnce(&mut StoreClientConfig),
    ) -> Result<(), StoreApiError> {
        let mut modified_config = self.config.clone();
        update(&mut modified_config);
        *self = Self::new(modified_config)?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Customer routes need a credential before any request goes out.
    fn require_session(&self) -> Result<(), StoreApiError> {
        if self.config.token.is_none() {
            return Err(StoreApiError::Unauthenticated);
        }
        Ok(())
    }

    async fn post_mutation<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), StoreApiError> {
        self.require_session()?;
        let mut request = self.http.post(self.endpoint(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(StoreApiError::Network)?;
        response.expect_success().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StoreApi trait
// ---------------------------------------------------------------------------

/// The complete storefront API interface.
///
/// This trait enables alternate implementations:
/// - **HTTP** (current): REST calls to the storefront via [`StoreClient`]
/// - **Mock** (SDK tests): canned responses without HTTP
#[allow(async_fn_in_trait)]
pub trait StoreApi {
    /// Search the catalog for books matching the given criteria.
    async fn search_books(&self, params: &BookSearchParams) -> Result<Vec<Book>, StoreApiError>;

    /// Fetch a single catalog entry by ISBN.
    async fn book_details(&self, isbn: &str) -> Result<Book, StoreApiError>;

    /// Fetch the authoritative cart state.
    async fn cart(&self) -> Result<CartSummary, StoreApiError>;

    /// Add `quantity` copies of a book to the cart.
    async fn add_cart_item(&self, isbn: &str, quantity: u32) -> Result<(), StoreApiError>;

    /// Set the quantity of a cart line to an absolute value.
    async fn update_cart_item(&self, isbn: &str, quantity: u32) -> Result<(), StoreApiError>;

    /// Remove a line from the cart.
    async fn remove_cart_item(&self, isbn: &str) -> Result<(), StoreApiError>;

    /// Empty the cart.
    async fn clear_cart(&self) -> Result<(), StoreApiError>;

    /// Total number of copies in the cart, without a full cart load.
    async fn cart_count(&self) -> Result<u64, StoreApiError>;

    /// Convert the current cart into an order.
    async fn place_order(&self, payment: &OrderRequest) -> Result<Order, StoreApiError>;

    /// List the customer's past orders, newest first.
    async fn orders(&self) -> Result<Vec<Order>, StoreApiError>;

    /// Fetch one past order including its line items.
    async fn order_details(&self, order_id: u64) -> Result<Order, StoreApiError>;

    /// Fetch the customer's account record.
    async fn profile(&self) -> Result<UserProfile, StoreApiError>;

    /// Apply a partial profile update.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), StoreApiError>;

    /// Change the account password.
    async fn change_password(&self, current: &str, new: &str) -> Result<(), StoreApiError>;
}

// ---------------------------------------------------------------------------
// StoreApi implementation for StoreClient
// ---------------------------------------------------------------------------

impl StoreApi for StoreClient {
    async fn search_books(&self, params: &BookSearchParams) -> Result<Vec<Book>, StoreApiError> {
        debug!(?params, "sending catalog search request");
        let response = self
            .http
            .get(self.endpoint("books/search"))
            .query(&params.to_query())
            .send()
            .await
            .map_err(StoreApiError::Network)?;

        let results: SearchResponse = response.expect_success().await?.decode_json().await?;
        debug!(n_books = results.books.len(), "received search results");
        Ok(results.books)
    }

    async fn book_details(&self, isbn: &str) -> Result<Book, StoreApiError> {
        let response = self
            .http
            .get(self.endpoint(&format!("books/{isbn}")))
            .send()
            .await
            .map_err(StoreApiError::Network)?;
        response.expect_success().await?.decode_json().await
    }

    async fn cart(&self) -> Result<CartSummary, StoreApiError> {
        self.require_session()?;
        let response = self
            .http
            .get(self.endpoint("customer/cart"))
            .send()
            .await
            .map_err(StoreApiError::Network)?;
        response.expect_success().await?.decode_json().await
    }

    async fn add_cart_item(&self, isbn: &str, quantity: u32) -> Result<(), StoreApiError> {
        debug!(isbn, quantity, "adding item to cart");
        self.post_mutation("customer/cart/add", Some(&CartItemRequest { isbn, quantity }))
            .await
    }

    async fn update_cart_item(&self, isbn: &str, quantity: u32) -> Result<(), StoreApiError> {
        debug!(isbn, quantity, "updating cart quantity");
        self.post_mutation(
            "customer/cart/update",
            Some(&CartItemRequest { isbn, quantity }),
        )
        .await
    }

    async fn remove_cart_item(&self, isbn: &str) -> Result<(), StoreApiError> {
        debug!(isbn, "removing item from cart");
        self.post_mutation("customer/cart/remove", Some(&CartRemoveRequest { isbn }))
            .await
    }

    async fn clear_cart(&self) -> Result<(), StoreApiError> {
        debug!("clearing cart");
        self.post_mutation::<()>("customer/cart/clear", None).await
    }

    async fn cart_count(&self) -> Result<u64, StoreApiError> {
        self.require_session()?;
        let response = self
            .http
            .get(self.endpoint("customer/cart/count"))
            .send()
            .await
            .map_err(StoreApiError::Network)?;
        let body: CartCountResponse = response.expect_success().await?.decode_json().await?;
        Ok(body.count)
    }

    #[instrument(skip_all)]
    async fn place_order(&self, payment: &OrderRequest) -> Result<Order, StoreApiError> {
        self.require_session()?;
        let response = self
            .http
            .post(self.endpoint("customer/orders"))
            .json(payment)
            .send()
            .await
            .map_err(StoreApiError::Network)?;

        let order: Order = response.expect_success().await?.decode_json().await?;
        debug!(order_id = order.order_id, "order placed");
        Ok(order)
    }

    async fn orders(&self) -> Result<Vec<Order>, StoreApiError> {
        self.require_session()?;
        let response = self
            .http
            .get(self.endpoint("customer/orders"))
            .send()
            .await
            .map_err(StoreApiError::Network)?;
        let body: OrdersResponse = response.expect_success().await?.decode_json().await?;
        Ok(body.orders)
    }

    async fn order_details(&self, order_id: u64) -> Result<Order, StoreApiError> {
        self.require_session()?;
        let response = self
            .http
            .get(self.endpoint(&format!("customer/orders/{order_id}")))
            .send()
            .await
            .map_err(StoreApiError::Network)?;

        #[derive(Debug, Deserialize)]
        struct OrderDetailsResponse {
            order: Order,
            #[serde(default)]
            items: Vec<OrderLine>,
        }

        let body: OrderDetailsResponse = response.expect_success().await?.decode_json().await?;
        let mut order = body.order;
        order.items = body.items;
        Ok(order)
    }

    async fn profile(&self) -> Result<UserProfile, StoreApiError> {
        self.require_session()?;
        let response = self
            .http
            .get(self.endpoint("customer/profile"))
            .send()
            .await
            .map_err(StoreApiError::Network)?;
        let body: ProfileResponse = response.expect_success().await?.decode_json().await?;
        Ok(body.user)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), StoreApiError> {
        self.require_session()?;
        let response = self
            .http
            .put(self.endpoint("customer/profile"))
            .json(update)
            .send()
            .await
            .map_err(StoreApiError::Network)?;
        response.expect_success().await?;
        Ok(())
    }

    async fn change_password(&self, current: &str, new: &str) -> Result<(), StoreApiError> {
        self.require_session()?;
        let response = self
            .http
            .put(self.endpoint("customer/profile/password"))
            .json(&PasswordChangeRequest {
                current_password: current,
                new_password: new,
            })
            .send()
            .await
            .map_err(StoreApiError::Network)?;
        response.expect_success().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

/// Build an HTTP client with bearer token auth for the storefront API.
fn build_http_client(config: &StoreClientConfig) -> Result<reqwest::Client, StoreApiError> {
    let mut headers = HeaderMap::new();

    // Bearer token for customer routes
    if let Some(token) = &config.token {
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| StoreApiError::Other(e.to_string()))?,
        );
    }

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key)
                .map_err(|e: header::InvalidHeaderName| StoreApiError::Other(e.to_string()))?,
            header::HeaderValue::from_str(value)
                .map_err(|e: header::InvalidHeaderValue| StoreApiError::Other(e.to_string()))?,
        );
    }

    debug!(
        store_url = %config.store_url,
        has_token = config.token.is_some(),
        extra_headers = config.extra_headers.len(),
        "building storefront HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(60));

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder
        .build()
        .map_err(|e| StoreApiError::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn client_config(url: &str) -> StoreClientConfig {
        StoreClientConfig {
            store_url: url.to_string(),
            token: Some("t-123".to_string()),
            extra_headers: Default::default(),
            user_agent: None,
        }
    }

    fn sample_cart_body() -> serde_json::Value {
        json!({
            "items": [
                {
                    "isbn": "978-1",
                    "title": "The Pragmatic Programmer",
                    "authors": "Hunt, Thomas",
                    "selling_price": 10.0,
                    "quantity": 2,
                    "total_price": 20.0
                }
            ],
            "count": 2,
            "total": 20.0
        })
    }

    #[tokio::test]
    async fn bearer_token_set_on_customer_requests() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/customer/cart")
                .header("authorization", "Bearer t-123");
            then.status(200).json_body(sample_cart_body());
        });

        let client = StoreClient::new(client_config(&server.base_url())).unwrap();
        let cart = client.cart().await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, Decimal::from(20));
        mock.assert();
    }

    #[tokio::test]
    async fn missing_token_fails_without_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/customer/cart");
            then.status(200).json_body(sample_cart_body());
        });

        let config = StoreClientConfig {
            token: None,
            ..client_config(&server.base_url())
        };
        let client = StoreClient::new(config).unwrap();
        let result = client.cart().await;

        assert!(
            matches!(result, Err(StoreApiError::Unauthenticated)),
            "expected Unauthenticated, found: {result:?}"
        );
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn unauthorized_response_maps_to_unauthenticated() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/customer/cart");
            then.status(401)
                .header("content-type", "application/json")
                .json_body(json!({"error": "Token is invalid"}));
        });

        let client = StoreClient::new(client_config(&server.base_url())).unwrap();
        let result = client.cart().await;

        assert!(
            matches!(result, Err(StoreApiError::Unauthenticated)),
            "expected Unauthenticated, found: {result:?}"
        );
        mock.assert();
    }

    /// The server's own error wording is surfaced verbatim.
    #[tokio::test]
    async fn server_error_message_surfaced_verbatim() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/customer/cart/add");
            then.status(400)
                .header("content-type", "application/json")
                .json_body(json!({"error": "Insufficient stock"}));
        });

        let client = StoreClient::new(client_config(&server.base_url())).unwrap();
        let result = client.add_cart_item("978-2", 1).await;

        match result {
            Err(StoreApiError::Server { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Insufficient stock");
            },
            other => panic!("expected Server error, found: {other:?}"),
        }
        mock.assert();
    }

    /// Error responses without the expected `{error}` shape fall back to a
    /// generic status-derived message.
    #[tokio::test]
    async fn unexpected_error_body_falls_back_to_generic_message() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/customer/cart");
            then.status(502)
                .header("content-type", "text/html")
                .body("<html>Bad Gateway</html>");
        });

        let client = StoreClient::new(client_config(&server.base_url())).unwrap();
        let result = client.cart().await;

        match result {
            Err(StoreApiError::Server { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "server error: Bad Gateway");
            },
            other => panic!("expected Server error, found: {other:?}"),
        }
        mock.assert();
    }

    /// A 2xx body that doesn't match the schema is a server fault, not a
    /// panic.
    #[tokio::test]
    async fn schema_mismatch_maps_to_server_error() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/customer/cart");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"items": "not-a-list"}));
        });

        let client = StoreClient::new(client_config(&server.base_url())).unwrap();
        let result = client.cart().await;

        assert!(
            matches!(result, Err(StoreApiError::Server { .. })),
            "expected Server error, found: {result:?}"
        );
        mock.assert();
    }

    #[tokio::test]
    async fn search_encodes_present_filters_only() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/books/search")
                .query_param("query", "rust")
                .query_param("category", "Science");
            then.status(200).json_body(json!({
                "books": [
                    {
                        "isbn": "978-3",
                        "title": "Programming Rust",
                        "authors": "Blandy, Orendorff",
                        "publisher_name": "O'Reilly",
                        "category": "Science",
                        "selling_price": 39.99,
                        "stock": 5
                    }
                ]
            }));
        });

        let client = StoreClient::new(client_config(&server.base_url())).unwrap();
        let params = BookSearchParams {
            query: Some("rust".to_string()),
            category: Some(Category::Science),
            ..Default::default()
        };
        let books = client.search_books(&params).await.unwrap();

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].isbn, "978-3");
        assert!(books[0].in_stock());
        mock.assert();
    }

    #[tokio::test]
    async fn place_order_sends_payment_fields_and_decodes_order() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/customer/orders")
                .json_body(json!({
                    "credit_card_no": "4111111111111111",
                    "expiry_date": "12/99"
                }));
            then.status(201).json_body(json!({
                "order_id": 41,
                "order_date": "2026-08-05",
                "status": "Pending",
                "total_price": 20.0,
                "payment_last4": "1111"
            }));
        });

        let client = StoreClient::new(client_config(&server.base_url())).unwrap();
        let order = client
            .place_order(&OrderRequest {
                credit_card_no: "4111111111111111".to_string(),
                expiry_date: "12/99".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(order.order_id, 41);
        assert_eq!(order.total_price, Decimal::from(20));
        assert_eq!(order.payment_last4.as_deref(), Some("1111"));
        mock.assert();
    }

    #[tokio::test]
    async fn cart_count_reads_badge_count() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/customer/cart/count");
            then.status(200).json_body(json!({"count": 7}));
        });

        let client = StoreClient::new(client_config(&server.base_url())).unwrap();
        assert_eq!(client.cart_count().await.unwrap(), 7);
        mock.assert();
    }

    #[tokio::test]
    async fn book_details_fetched_by_isbn() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/books/978-3");
            then.status(200).json_body(json!({
                "isbn": "978-3",
                "title": "Programming Rust",
                "selling_price": 39.99,
                "stock": 0
            }));
        });

        let client = StoreClient::new(client_config(&server.base_url())).unwrap();
        let book = client.book_details("978-3").await.unwrap();

        assert_eq!(book.title, "Programming Rust");
        assert!(!book.in_stock());
        mock.assert();
    }

    /// Updating the config rebuilds the underlying HTTP client, e.g. when a
    /// user logs in mid-session.
    #[tokio::test]
    async fn update_config_applies_new_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/customer/cart")
                .header("authorization", "Bearer fresh-token");
            then.status(200).json_body(sample_cart_body());
        });

        let config = StoreClientConfig {
            token: None,
            ..client_config(&server.base_url())
        };
        let mut client = StoreClient::new(config).unwrap();
        assert!(matches!(
            client.cart().await,
            Err(StoreApiError::Unauthenticated)
        ));

        client
            .update_config(|config| config.token = Some("fresh-token".to_string()))
            .unwrap();
        client.cart().await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn order_details_merges_line_items() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/customer/orders/41");
            then.status(200).json_body(json!({
                "order": {
                    "order_id": 41,
                    "order_date": "2026-08-05",
                    "total_price": 20.0
                },
                "items": [
                    {
                        "isbn": "978-1",
                        "title": "The Pragmatic Programmer",
                        "quantity": 2,
                        "price": 10.0,
                        "total": 20.0
                    }
                ]
            }));
        });

        let client = StoreClient::new(client_config(&server.base_url())).unwrap();
        let order = client.order_details(41).await.unwrap();

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].total, Decimal::from(20));
        mock.assert();
    }
}
