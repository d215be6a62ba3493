//! Checkout: local payment validation and one-shot order submission.
//!
//! Validation is pure and runs entirely before any network traffic; the
//! server stays the sole authority for pricing, so no totals are recomputed
//! or re-checked client-side before submitting.

use std::fmt;
use std::sync::LazyLock;

use bookstore_api::{Order, OrderRequest, StoreApi, StoreApiError};
use regex::Regex;
use thiserror::Error;
use time::Date;
use tracing::{debug, instrument};

use crate::models::cart::CartState;

static EXPIRY_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})$").unwrap());

/// Payment input collected for one checkout attempt.
///
/// Exists only for the duration of the submission; nothing here is ever
/// persisted, and `Debug` output is fully redacted so the card number and
/// CVV cannot reach logs.
#[derive(Clone)]
pub struct PaymentInstrument {
    pub card_number: String,
    /// Expiry in `MM/YY` form, sent to the server as entered.
    pub expiry: String,
    pub cvv: String,
}

impl PaymentInstrument {
    /// Card number with all whitespace stripped, the form both validation
    /// and the order request use.
    fn card_digits(&self) -> String {
        self.card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }
}

impl fmt::Debug for PaymentInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentInstrument").finish_non_exhaustive()
    }
}

/// Local validation failures; these never reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Invalid credit card number")]
    InvalidCardNumber,
    #[error("Invalid expiry date (MM/YY)")]
    InvalidExpiry,
    #[error("Invalid CVV")]
    InvalidCvv,
    #[error("Credit card has expired")]
    CardExpired,
}

/// Check a payment instrument, returning the first violated rule.
///
/// Rules are checked in a fixed order and the first violation wins:
/// card number length (13–19 digits after whitespace stripping), expiry
/// format, CVV length (3–4), then expiry in the future. A card expiring in
/// the current month is already expired.
///
/// `today` is injected rather than read from the clock so boundary cases
/// stay testable.
pub fn validate_payment(instrument: &PaymentInstrument, today: Date) -> Result<(), PaymentError> {
    let digits = instrument.card_digits();
    if digits.len() < 13 || digits.len() > 19 {
        return Err(PaymentError::InvalidCardNumber);
    }

    let Some(captures) = EXPIRY_FORMAT.captures(&instrument.expiry) else {
        return Err(PaymentError::InvalidExpiry);
    };

    if instrument.cvv.len() < 3 || instrument.cvv.len() > 4 {
        return Err(PaymentError::InvalidCvv);
    }

    // Compare linear month indices. Out-of-range months roll over the year
    // boundary, matching how date arithmetic treats "13/25" as Jan 2026.
    let month: i32 = captures[1].parse().unwrap_or(0);
    let year: i32 = 2000 + captures[2].parse::<i32>().unwrap_or(0);
    let expiry_index = year * 12 + (month - 1);
    let today_index = today.year() * 12 + (i32::from(u8::from(today.month())) - 1);
    if expiry_index <= today_index {
        return Err(PaymentError::CardExpired);
    }

    Ok(())
}

/// Where a checkout attempt currently stands.
///
/// `Failed` always transitions back to `Idle` before control returns to the
/// caller, so the form stays editable; `Succeeded` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] PaymentError),
    /// Business-rule guard: nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,
    /// A previous submission has not resolved yet.
    #[error("an order submission is already in progress")]
    SubmissionInFlight,
    /// The flow already succeeded; a new flow is needed for a new order.
    #[error("this order has already been placed")]
    AlreadyPlaced,
    #[error(transparent)]
    Api(#[from] StoreApiError),
}

/// One checkout attempt over a cart snapshot fetched at construction.
///
/// The snapshot is what gets guarded against emptiness; the server decides
/// final pricing when the order is placed.
pub struct CheckoutFlow<C> {
    client: C,
    cart: CartState,
    state: CheckoutState,
}

impl<C: StoreApi> CheckoutFlow<C> {
    /// Fetch the current cart and start an idle checkout flow over it.
    pub async fn load(client: C) -> Result<Self, CheckoutError> {
        let cart = CartState::from(client.cart().await?);
        Ok(CheckoutFlow {
            client,
            cart,
            state: CheckoutState::Idle,
        })
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Validate the instrument and submit the order.
    ///
    /// On any failure the flow returns to `Idle` with the error surfaced;
    /// the caller keeps the entered payment data for correction. On success
    /// the flow is terminal and the cart is cleared server-side as part of
    /// order creation, so no separate clear request is issued.
    #[instrument(skip_all)]
    pub async fn submit(
        &mut self,
        instrument: &PaymentInstrument,
        today: Date,
    ) -> Result<Order, CheckoutError> {
        match self.state {
            CheckoutState::Submitting => return Err(CheckoutError::SubmissionInFlight),
            CheckoutState::Succeeded => return Err(CheckoutError::AlreadyPlaced),
            _ => {},
        }

        self.state = CheckoutState::Validating;
        if let Err(violation) = validate_payment(instrument, today) {
            self.state = CheckoutState::Idle;
            return Err(violation.into());
        }

        if self.cart.is_empty() {
            self.state = CheckoutState::Idle;
            return Err(CheckoutError::EmptyCart);
        }

        self.state = CheckoutState::Submitting;
        let request = OrderRequest {
            credit_card_no: instrument.card_digits(),
            expiry_date: instrument.expiry.clone(),
        };

        match self.client.place_order(&request).await {
            Ok(order) => {
                debug!(order_id = order.order_id, "checkout succeeded");
                self.state = CheckoutState::Succeeded;
                self.cart = CartState::default();
                Ok(order)
            },
            Err(err) => {
                self.state = CheckoutState::Idle;
                Err(err.into())
            },
        }
    }
}
