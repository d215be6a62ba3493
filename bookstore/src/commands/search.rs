use anyhow::{bail, Result};
use bookstore_api::{BookSearchParams, Category};
use bookstore_sdk::models::search::search_books;
use bookstore_sdk::storefront::Storefront;
use bpaf::Bpaf;
use tracing::{debug, instrument};

use crate::commands::DEFAULT_SEARCH_LIMIT;
use crate::config::Config;
use crate::utils::display::DisplayBooks;
use crate::utils::message;

// Search the catalog for books
#[derive(Debug, Bpaf, Clone)]
pub struct Search {
    /// Display search results as a JSON array
    #[bpaf(long)]
    pub json: bool,

    /// Print all search results
    #[bpaf(short, long)]
    pub all: bool,

    /// Only show books in this category
    ///
    /// One of Science, Art, Religion, History, Geography.
    #[bpaf(long, argument("category"))]
    pub category: Option<Category>,

    /// Only show books by this author
    #[bpaf(long, argument("author"))]
    pub author: Option<String>,

    /// Only show books from this publisher
    #[bpaf(long, argument("publisher"))]
    pub publisher: Option<String>,

    /// Only show books with a matching ISBN
    #[bpaf(long, argument("isbn"))]
    pub isbn: Option<String>,

    /// Term to match against book titles; omit to list the catalog
    #[bpaf(positional("term"))]
    pub term: Option<String>,
}

impl Search {
    #[instrument(name = "search", skip_all)]
    pub async fn handle(self, config: Config, storefront: Storefront) -> Result<()> {
        debug!(term = ?self.term, "performing catalog search");

        let client = storefront.client()?;
        let limit = if self.all {
            None
        } else {
            config.store.search_limit.or(DEFAULT_SEARCH_LIMIT)
        };

        let params = BookSearchParams {
            query: self.term.clone(),
            category: self.category,
            author: self.author,
            publisher: self.publisher,
            isbn: self.isbn,
        };

        let results = search_books(&client, &params, limit).await?;

        if self.json {
            println!("{}", serde_json::to_string(&results)?);
            return Ok(());
        }

        if results.is_empty() {
            bail!("No books matched this search");
        }

        println!("{}", DisplayBooks(&results));

        if let Some(limit) = limit {
            if results.len() == usize::from(limit.get()) {
                message::plain(format!(
                    "\nShowing the first {limit} results. Use 'bookstore search --all' to see the full list."
                ));
            }
        }

        Ok(())
    }
}
