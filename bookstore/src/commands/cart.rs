use anyhow::Result;
use bookstore_sdk::models::cart::{CartManager, CartState};
use bookstore_sdk::storefront::Storefront;
use bpaf::Bpaf;
use inquire::Confirm;
use tracing::instrument;

use crate::config::Config;
use crate::utils::display::DisplayCart;
use crate::utils::message;

#[derive(Debug, Bpaf, Clone)]
pub enum CartCommands {
    /// Show the cart contents
    #[bpaf(command)]
    Show(#[bpaf(external(show))] Show),

    /// Add a book to the cart
    #[bpaf(command)]
    Add(#[bpaf(external(add))] Add),

    /// Set the quantity of a cart line
    #[bpaf(command)]
    Update(#[bpaf(external(update))] Update),

    /// Remove a line from the cart
    #[bpaf(command)]
    Remove(#[bpaf(external(remove))] Remove),

    /// Empty the cart
    #[bpaf(command)]
    Clear(#[bpaf(external(clear))] Clear),
}

impl CartCommands {
    pub async fn handle(self, _config: Config, storefront: Storefront) -> Result<()> {
        let manager = CartManager::new(storefront.client()?);
        match self {
            CartCommands::Show(args) => args.handle(manager).await,
            CartCommands::Add(args) => args.handle(manager).await,
            CartCommands::Update(args) => args.handle(manager).await,
            CartCommands::Remove(args) => args.handle(manager).await,
            CartCommands::Clear(args) => args.handle(manager).await,
        }
    }
}

fn print_cart(state: &CartState) {
    if state.is_empty() {
        message::plain("Your cart is empty. Add some books to get started!");
    } else {
        println!("{}", DisplayCart(state));
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct Show {
    /// Display the cart as JSON
    #[bpaf(long)]
    json: bool,
}

impl Show {
    #[instrument(name = "cart::show", skip_all)]
    pub async fn handle<C: bookstore_api::StoreApi>(self, manager: CartManager<C>) -> Result<()> {
        let state = manager.load().await?;
        if self.json {
            println!("{}", serde_json::to_string(&state)?);
        } else {
            print_cart(&state);
        }
        Ok(())
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct Add {
    /// Number of copies to add
    #[bpaf(long, short, argument("N"), fallback(1))]
    quantity: u32,

    /// ISBN of the book to add
    #[bpaf(positional("isbn"))]
    isbn: String,
}

impl Add {
    #[instrument(name = "cart::add", skip_all)]
    pub async fn handle<C: bookstore_api::StoreApi>(self, manager: CartManager<C>) -> Result<()> {
        let state = manager.add_item(&self.isbn, self.quantity).await?;
        message::updated(format!(
            "Added '{}' to your cart ({} copies total, subtotal ${:.2})",
            self.isbn,
            state.copies(),
            state.subtotal
        ));
        Ok(())
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct Update {
    /// ISBN of the cart line to change
    #[bpaf(positional("isbn"))]
    isbn: String,

    /// New quantity for the line
    #[bpaf(positional("quantity"))]
    quantity: u32,
}

impl Update {
    #[instrument(name = "cart::update", skip_all)]
    pub async fn handle<C: bookstore_api::StoreApi>(self, manager: CartManager<C>) -> Result<()> {
        if self.quantity < 1 {
            // quantities below 1 are ignored, removal is its own command
            message::warning("Quantities below 1 are ignored. Use 'bookstore cart remove' instead.");
            return Ok(());
        }
        let state = manager.update_quantity(&self.isbn, self.quantity).await?;
        print_cart(&state);
        Ok(())
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct Remove {
    /// Skip the confirmation prompt
    #[bpaf(long, short)]
    yes: bool,

    /// ISBN of the cart line to remove
    #[bpaf(positional("isbn"))]
    isbn: String,
}

impl Remove {
    #[instrument(name = "cart::remove", skip_all)]
    pub async fn handle<C: bookstore_api::StoreApi>(self, manager: CartManager<C>) -> Result<()> {
        if !self.yes {
            let confirmed = Confirm::new(&format!("Remove '{}' from your cart?", self.isbn))
                .with_default(false)
                .prompt()?;
            if !confirmed {
                return Ok(());
            }
        }

        let state = manager.remove_item(&self.isbn).await?;
        message::deleted(format!("Removed '{}' from your cart", self.isbn));
        print_cart(&state);
        Ok(())
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct Clear {
    /// Skip the confirmation prompt
    #[bpaf(long, short)]
    yes: bool,
}

impl Clear {
    #[instrument(name = "cart::clear", skip_all)]
    pub async fn handle<C: bookstore_api::StoreApi>(self, manager: CartManager<C>) -> Result<()> {
        if !self.yes {
            let confirmed = Confirm::new("Are you sure you want to clear your entire cart?")
                .with_default(false)
                .prompt()?;
            if !confirmed {
                return Ok(());
            }
        }

        manager.clear().await?;
        message::deleted("Cart cleared");
        Ok(())
    }
}
