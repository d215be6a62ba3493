//! The session context threaded through every customer flow.

use std::fmt;
use std::fmt::Debug;

use bookstore_api::{StoreApiError, StoreClient, StoreClientConfig};

use crate::BOOKSTORE_VERSION;

/// Store URL assumed when the configuration names none.
pub static DEFAULT_STORE_URL: &str = "http://localhost:5000";

/// The main context struct for storefront operations.
///
/// A [Storefront] instance serves as the context for API calls within one
/// invocation: which store to talk to and which customer session, if any,
/// to talk as. It is constructed once from configuration and passed into
/// each flow explicitly, so flows stay testable with fake credentials.
pub struct Storefront {
    /// Base URL of the storefront API.
    pub store_url: String,

    /// Token authenticating the customer session.
    ///
    /// Checking for [None] can be used to check if the user is logged in.
    pub session: Option<SessionToken>,
}

impl Storefront {
    pub fn new(store_url: impl Into<String>, token: Option<String>) -> Self {
        Storefront {
            store_url: store_url.into(),
            session: token.filter(|t| !t.is_empty()).map(SessionToken),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Build an API client for this session.
    pub fn client(&self) -> Result<StoreClient, StoreApiError> {
        StoreClient::new(StoreClientConfig {
            store_url: self.store_url.clone(),
            token: self.session.as_ref().map(|t| t.secret().to_string()),
            extra_headers: Default::default(),
            user_agent: Some(format!("bookstore-cli/{BOOKSTORE_VERSION}")),
        })
    }
}

impl Debug for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storefront")
            .field("store_url", &self.store_url)
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

/// An opaque customer credential.
///
/// The wrapped value only leaves this type through [`SessionToken::secret`];
/// `Debug` output stays redacted so the token cannot end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        SessionToken(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(****)")
    }
}
