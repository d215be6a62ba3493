mod auth;
mod cart;
mod checkout;
mod orders;
mod profile;
mod search;

use std::fmt;
use std::num::NonZeroU8;

use anyhow::Result;
use bookstore_sdk::models::search::SearchLimit;
use bookstore_sdk::storefront::{Storefront, DEFAULT_STORE_URL};
use bookstore_sdk::BOOKSTORE_VERSION;
use bpaf::Bpaf;
use indoc::formatdoc;

use crate::config::Config;
use crate::utils::message;

pub(crate) const DEFAULT_SEARCH_LIMIT: SearchLimit = NonZeroU8::new(10);

static BOOKSTORE_DESCRIPTION: &'_ str =
    "Search the bookstore catalog, manage your cart and place orders from the command line.";

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(
    options,
    descr(BOOKSTORE_DESCRIPTION),
    footer("Run 'bookstore <command> --help' for more details.")
)]
pub struct BookstoreCli(#[bpaf(external(bookstore_args))] pub BookstoreArgs);

/// Main bookstore args parser
///
/// This struct is used to parse the command line arguments
/// and allows to be composed with other parsers.
///
/// To parse the bookstore CLI, use [`BookstoreCli`] via [`bookstore_cli()`].
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)] // we don't want this struct to be interpreted as a group
pub struct BookstoreArgs {
    /// Verbose mode
    ///
    /// Invoke multiple times for increasing detail.
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    /// Print the version of the program
    #[bpaf(long, short('V'))]
    version: bool,

    #[bpaf(external(commands), optional)]
    command: Option<Commands>,
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command")
    }
}

impl BookstoreArgs {
    pub async fn handle(self, config: Config) -> Result<()> {
        if self.version {
            println!("bookstore {}", BOOKSTORE_VERSION);
            return Ok(());
        }

        let storefront = Storefront::new(
            config
                .store
                .store_url
                .clone()
                .unwrap_or_else(|| DEFAULT_STORE_URL.to_string()),
            config.store.token.clone(),
        );

        // Given no command, print a short welcome message
        let Some(command) = self.command else {
            print_welcome_message(&storefront);
            return Ok(());
        };

        match command {
            Commands::Search(args) => args.handle(config, storefront).await,
            Commands::Cart(args) => args.handle(config, storefront).await,
            Commands::Checkout(args) => args.handle(config, storefront).await,
            Commands::Orders(args) => args.handle(config, storefront).await,
            Commands::Profile(args) => args.handle(config, storefront).await,
            Commands::Login(args) => args.handle(config, storefront).await,
            Commands::Logout(args) => args.handle(config, storefront).await,
        }
    }
}

/// Print general welcome message with short usage instructions.
fn print_welcome_message(storefront: &Storefront) {
    let welcome_message = {
        let version = BOOKSTORE_VERSION;
        let store_url = &storefront.store_url;
        formatdoc! {"
            bookstore {version}, talking to {store_url}

            Usage: bookstore OPTIONS (search|cart|checkout|orders|...) [--help]

            Use 'bookstore --help' for the full list of commands
        "}
    };

    message::plain(welcome_message);

    if !storefront.is_logged_in() {
        message::plain("Not logged in. Use 'bookstore login' to store a session token.\n");
    }
}

#[derive(Bpaf, Clone)]
enum Commands {
    /// Search the catalog for books
    #[bpaf(command)]
    Search(#[bpaf(external(search::search))] search::Search),

    /// Show and modify the shopping cart
    #[bpaf(command)]
    Cart(#[bpaf(external(cart::cart_commands))] cart::CartCommands),

    /// Turn the cart into an order
    #[bpaf(command)]
    Checkout(#[bpaf(external(checkout::checkout))] checkout::Checkout),

    /// Show past orders
    #[bpaf(command)]
    Orders(#[bpaf(external(orders::orders))] orders::Orders),

    /// Show and update account details
    #[bpaf(command)]
    Profile(#[bpaf(external(profile::profile_commands))] profile::ProfileCommands),

    /// Store a session token for the storefront
    #[bpaf(command)]
    Login(#[bpaf(external(auth::login))] auth::Login),

    /// Forget the stored session token
    #[bpaf(command)]
    Logout(#[bpaf(external(auth::logout))] auth::Logout),
}
