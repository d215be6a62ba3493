//! Table-ish rendering of catalog, cart and order data for the terminal.

use std::fmt;
use std::fmt::Display;

use bookstore_api::{Book, Order};
use bookstore_sdk::models::cart::CartState;

pub(crate) const UNKNOWN_AUTHORS: &str = "Unknown";

fn column_width<'a>(cells: impl Iterator<Item = &'a str>, header: &str) -> usize {
    cells
        .map(|cell| cell.len())
        .chain([header.len()])
        .max()
        .unwrap_or_default()
}

/// Catalog search results, one book per row.
pub(crate) struct DisplayBooks<'a>(pub(crate) &'a [Book]);

impl Display for DisplayBooks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let isbn_width = column_width(self.0.iter().map(|b| b.isbn.as_str()), "ISBN");
        let title_width = column_width(self.0.iter().map(|b| b.title.as_str()), "TITLE");
        let authors_width = column_width(
            self.0
                .iter()
                .map(|b| b.authors.as_deref().unwrap_or(UNKNOWN_AUTHORS)),
            "AUTHORS",
        );

        writeln!(
            f,
            "{:<isbn_width$}  {:<title_width$}  {:<authors_width$}  {:>9}  {:>5}",
            "ISBN", "TITLE", "AUTHORS", "PRICE", "STOCK"
        )?;

        let mut books = self.0.iter().peekable();
        while let Some(book) = books.next() {
            let authors = book.authors.as_deref().unwrap_or(UNKNOWN_AUTHORS);
            let price = format!("${:.2}", book.selling_price);
            write!(
                f,
                "{:<isbn_width$}  {:<title_width$}  {:<authors_width$}  {:>9}  {:>5}",
                book.isbn, book.title, authors, price, book.stock
            )?;
            if books.peek().is_some() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// The cart with per-line totals and the server-computed subtotal.
pub(crate) struct DisplayCart<'a>(pub(crate) &'a CartState);

impl Display for DisplayCart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = &self.0.items;
        let isbn_width = column_width(items.iter().map(|i| i.isbn.as_str()), "ISBN");
        let title_width = column_width(items.iter().map(|i| i.title.as_str()), "TITLE");

        writeln!(
            f,
            "{:<isbn_width$}  {:<title_width$}  {:>9}  {:>3}  {:>9}",
            "ISBN", "TITLE", "PRICE", "QTY", "TOTAL"
        )?;

        for item in items {
            let price = format!("${:.2}", item.selling_price);
            let total = format!("${:.2}", item.total_price);
            writeln!(
                f,
                "{:<isbn_width$}  {:<title_width$}  {:>9}  {:>3}  {:>9}",
                item.isbn, item.title, price, item.quantity, total
            )?;
        }

        write!(f, "Subtotal: ${:.2}", self.0.subtotal)
    }
}

/// Order history, one order per row.
pub(crate) struct DisplayOrders<'a>(pub(crate) &'a [Order]);

impl Display for DisplayOrders<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date_width = column_width(self.0.iter().map(|o| o.order_date.as_str()), "DATE");

        writeln!(f, "{:>8}  {:<date_width$}  {:>9}  {}", "ORDER", "DATE", "TOTAL", "STATUS")?;

        let mut orders = self.0.iter().peekable();
        while let Some(order) = orders.next() {
            let total = format!("${:.2}", order.total_price);
            let status = order.status.as_deref().unwrap_or("-");
            let id = format!("#{}", order.order_id);
            write!(
                f,
                "{:>8}  {:<date_width$}  {:>9}  {}",
                id, order.order_date, total, status
            )?;
            if orders.peek().is_some() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// A single order with its line items.
pub(crate) struct DisplayOrder<'a>(pub(crate) &'a Order);

impl Display for DisplayOrder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.0;
        writeln!(f, "Order #{} placed {}", order.order_id, order.order_date)?;
        if let Some(ref status) = order.status {
            writeln!(f, "Status: {status}")?;
        }
        if let Some(ref last4) = order.payment_last4 {
            writeln!(f, "Paid with card ending in {last4}")?;
        }

        for item in &order.items {
            writeln!(
                f,
                "  {} x{} @ ${:.2} = ${:.2}",
                item.title, item.quantity, item.price, item.total
            )?;
        }

        write!(f, "Total: ${:.2}", order.total_price)
    }
}
