use anyhow::{bail, Result};
use bookstore_sdk::models::checkout::{CheckoutFlow, PaymentInstrument};
use bookstore_sdk::storefront::Storefront;
use bpaf::Bpaf;
use inquire::{Password, PasswordDisplayMode, Text};
use time::OffsetDateTime;
use tracing::instrument;

use crate::config::Config;
use crate::utils::display::{DisplayCart, DisplayOrder};
use crate::utils::message;

// Turn the cart into an order
#[derive(Debug, Bpaf, Clone)]
pub struct Checkout {}

impl Checkout {
    #[instrument(name = "checkout", skip_all)]
    pub async fn handle(self, _config: Config, storefront: Storefront) -> Result<()> {
        let mut flow = CheckoutFlow::load(storefront.client()?).await?;

        if flow.cart().is_empty() {
            bail!("Your cart is empty");
        }

        message::plain("Order summary:\n");
        println!("{}\n", DisplayCart(flow.cart()));

        // Payment data stays off argv and out of the shell history; it is
        // collected interactively and lives only for this submission.
        let card_number = Text::new("Credit card number:").prompt()?;
        let expiry = Text::new("Expiry date (MM/YY):").prompt()?;
        let cvv = Password::new("CVV:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?;

        let instrument = PaymentInstrument {
            card_number,
            expiry,
            cvv,
        };

        let today = OffsetDateTime::now_utc().date();
        let order = flow.submit(&instrument, today).await?;

        message::updated("Order placed successfully!");
        println!("{}", DisplayOrder(&order));
        Ok(())
    }
}
