//! Error normalization for storefront API operations.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Error body the storefront returns on non-2xx responses.
///
/// Responses that do not match this shape fall back to a generic,
/// status-derived message rather than failing to decode.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) error: String,
}

/// Common error type for storefront API operations.
///
/// SDK-specific operation errors (CartError, CheckoutError, ...) wrap this
/// type.
#[derive(Debug, Error)]
pub enum StoreApiError {
    /// No token configured, or the server rejected the credential.
    #[error("you are not logged in")]
    Unauthenticated,
    /// Transport failure: no response was received at all.
    #[error("network error, please try again")]
    Network(#[source] reqwest::Error),
    /// Non-2xx response; `message` is the server's own wording when the
    /// body carried one.
    #[error("{message}")]
    Server { status: StatusCode, message: String },
    #[error("{0}")]
    Other(String),
}

impl StoreApiError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            StoreApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extension trait normalizing raw responses into [`StoreApiError`].
pub(crate) trait ResponseExt: Sized {
    /// Resolve the response into `Ok(self)` for 2xx statuses, mapping
    /// 401s to `Unauthenticated` and anything else to `Server` with the
    /// server-provided message when present.
    fn expect_success(self) -> impl std::future::Future<Output = Result<Self, StoreApiError>> + Send;

    /// Decode the body, mapping schema mismatches to `Server` rather than
    /// letting them escape as decode panics or opaque errors.
    fn decode_json<T: DeserializeOwned + Send>(
        self,
    ) -> impl std::future::Future<Output = Result<T, StoreApiError>> + Send;
}

impl ResponseExt for reqwest::Response {
    async fn expect_success(self) -> Result<Self, StoreApiError> {
        let status = self.status();
        if status.is_success() {
            return Ok(self);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(StoreApiError::Unauthenticated);
        }

        // Expected error responses carry `{ "error": <string> }`. Anything
        // else (HTML error pages, proxies) gets a generic message; the body
        // is not worth echoing back at the user.
        let message = match self.json::<ApiErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => generic_message(status),
        };

        Err(StoreApiError::Server { status, message })
    }

    async fn decode_json<T: DeserializeOwned + Send>(self) -> Result<T, StoreApiError> {
        let status = self.status();
        self.json().await.map_err(|err| StoreApiError::Server {
            status,
            message: format!("unexpected response from server: {err}"),
        })
    }
}

pub(crate) fn generic_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("server error: {reason}"),
        None => format!("server error: status {status}"),
    }
}
