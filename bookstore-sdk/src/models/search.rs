//! Catalog search.

use std::num::NonZeroU8;

use bookstore_api::{Book, BookSearchParams, StoreApi, StoreApiError};
use tracing::debug;

/// `None` means "show everything".
pub type SearchLimit = Option<NonZeroU8>;

/// Search the catalog, truncating the result list client-side.
///
/// The storefront search route is unpaged, so the limit only trims what is
/// displayed.
pub async fn search_books<C: StoreApi>(
    client: &C,
    params: &BookSearchParams,
    limit: SearchLimit,
) -> Result<Vec<Book>, StoreApiError> {
    let mut books = client.search_books(params).await?;
    if let Some(limit) = limit {
        books.truncate(limit.get() as usize);
    }
    debug!(n_books = books.len(), "search results ready");
    Ok(books)
}
