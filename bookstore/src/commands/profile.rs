use anyhow::Result;
use bookstore_api::{ProfileUpdate, StoreApi};
use bookstore_sdk::storefront::Storefront;
use bpaf::Bpaf;
use inquire::{Password, PasswordDisplayMode};
use tracing::instrument;

use crate::config::Config;
use crate::utils::message;

#[derive(Debug, Bpaf, Clone)]
pub enum ProfileCommands {
    /// Show account details
    #[bpaf(command)]
    Show(#[bpaf(external(show))] Show),

    /// Update account details
    #[bpaf(command)]
    Update(#[bpaf(external(update))] Update),

    /// Change the account password
    #[bpaf(command)]
    Password(#[bpaf(external(password_change))] PasswordChange),
}

impl ProfileCommands {
    pub async fn handle(self, _config: Config, storefront: Storefront) -> Result<()> {
        match self {
            ProfileCommands::Show(args) => args.handle(storefront).await,
            ProfileCommands::Update(args) => args.handle(storefront).await,
            ProfileCommands::Password(args) => args.handle(storefront).await,
        }
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct Show {
    /// Display the profile as JSON
    #[bpaf(long)]
    json: bool,
}

impl Show {
    #[instrument(name = "profile::show", skip_all)]
    pub async fn handle(self, storefront: Storefront) -> Result<()> {
        let profile = storefront.client()?.profile().await?;

        if self.json {
            println!("{}", serde_json::to_string(&profile)?);
            return Ok(());
        }

        println!("{} ({})", profile.username, profile.email);
        println!("{} {}", profile.first_name, profile.last_name);
        if let Some(ref phone) = profile.phone_number {
            println!("Phone: {phone}");
        }
        if let Some(ref address) = profile.shipping_address {
            println!("Ships to: {address}");
        }
        Ok(())
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct Update {
    /// New first name
    #[bpaf(long, argument("NAME"))]
    first_name: Option<String>,

    /// New last name
    #[bpaf(long, argument("NAME"))]
    last_name: Option<String>,

    /// New email address
    #[bpaf(long, argument("EMAIL"))]
    email: Option<String>,

    /// New phone number
    #[bpaf(long, argument("PHONE"))]
    phone_number: Option<String>,

    /// New shipping address
    #[bpaf(long, argument("ADDRESS"))]
    shipping_address: Option<String>,
}

impl Update {
    #[instrument(name = "profile::update", skip_all)]
    pub async fn handle(self, storefront: Storefront) -> Result<()> {
        let update = ProfileUpdate {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            shipping_address: self.shipping_address,
        };

        if update.is_empty() {
            message::warning("Nothing to update. Pass at least one field, e.g. --email.");
            return Ok(());
        }

        storefront.client()?.update_profile(&update).await?;
        message::updated("Profile updated successfully");
        Ok(())
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct PasswordChange {}

impl PasswordChange {
    #[instrument(name = "profile::password", skip_all)]
    pub async fn handle(self, storefront: Storefront) -> Result<()> {
        let current = Password::new("Current password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?;
        let new = Password::new("New password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()?;

        storefront.client()?.change_password(&current, &new).await?;
        message::updated("Password updated successfully");
        Ok(())
    }
}
