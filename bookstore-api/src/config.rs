//! Configuration types for storefront client construction.

use std::collections::BTreeMap;

/// Configuration for storefront client construction.
#[derive(Debug, Clone, Default)]
pub struct StoreClientConfig {
    /// Base URL for the storefront API.
    pub store_url: String,
    /// Optional bearer token for an authenticated customer session.
    ///
    /// Routes under `/customer` fail with
    /// [`StoreApiError::Unauthenticated`](crate::StoreApiError::Unauthenticated)
    /// before any request is made when this is `None`.
    pub token: Option<String>,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// User agent advertised on every request.
    pub user_agent: Option<String>,
}
