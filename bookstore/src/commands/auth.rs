use anyhow::Result;
use bookstore_sdk::storefront::Storefront;
use bpaf::Bpaf;
use inquire::{Password, PasswordDisplayMode};
use tracing::instrument;

use crate::config::Config;
use crate::utils::message;

// Store a session token for the storefront
//
// Obtaining a token (username/password exchange) happens against the
// storefront's auth routes and is out of scope here; this only persists a
// token for subsequent commands.
#[derive(Debug, Bpaf, Clone)]
pub struct Login {
    /// The session token; omit to be prompted
    #[bpaf(positional("token"))]
    token: Option<String>,
}

impl Login {
    #[instrument(name = "login", skip_all)]
    pub async fn handle(self, _config: Config, _storefront: Storefront) -> Result<()> {
        let token = match self.token {
            Some(token) => token,
            None => Password::new("Session token:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .prompt()?,
        };

        Config::write_token(Some(token))?;
        message::updated("Logged in");
        Ok(())
    }
}

// Forget the stored session token
#[derive(Debug, Bpaf, Clone)]
pub struct Logout {}

impl Logout {
    #[instrument(name = "logout", skip_all)]
    pub async fn handle(self, _config: Config, storefront: Storefront) -> Result<()> {
        if !storefront.is_logged_in() {
            message::warning("You are not logged in");
            return Ok(());
        }

        Config::write_token(None)?;
        message::updated("Logged out");
        Ok(())
    }
}
