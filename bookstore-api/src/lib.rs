//! Shared HTTP client infrastructure for the bookstore storefront API.
//!
//! This crate provides:
//! - HTTP client construction with bearer token authentication
//! - Wire types for every storefront route, with explicit serde schemas
//! - Common error normalization for storefront API operations
//!
//! ## Usage
//!
//! ```ignore
//! use bookstore_api::{StoreClient, StoreClientConfig};
//!
//! let config = StoreClientConfig {
//!     store_url: "http://localhost:5000".to_string(),
//!     token: Some(token),
//!     extra_headers: BTreeMap::new(),
//!     user_agent: None,
//! };
//!
//! let client = StoreClient::new(config)?;
//! let cart = client.cart().await?;
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::{StoreApi, StoreClient};
pub use config::StoreClientConfig;
pub use error::StoreApiError;
// Re-exported so consumers can match on response statuses without
// depending on reqwest directly.
pub use reqwest::StatusCode;
pub use types::*;
