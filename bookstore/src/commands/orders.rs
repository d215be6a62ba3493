use anyhow::Result;
use bookstore_api::StoreApi;
use bookstore_sdk::models::orders::OrderHistory;
use bookstore_sdk::storefront::Storefront;
use bpaf::Bpaf;
use tracing::instrument;

use crate::config::Config;
use crate::utils::display::{DisplayOrder, DisplayOrders};
use crate::utils::message;

// Show past orders
#[derive(Debug, Bpaf, Clone)]
pub struct Orders {
    /// Display orders as JSON
    #[bpaf(long)]
    json: bool,

    /// Only show the most recent orders
    #[bpaf(long)]
    recent: bool,

    /// Show a single order in detail
    #[bpaf(long, argument("ID"))]
    id: Option<u64>,
}

impl Orders {
    #[instrument(name = "orders", skip_all)]
    pub async fn handle(self, _config: Config, storefront: Storefront) -> Result<()> {
        let client = storefront.client()?;

        if let Some(order_id) = self.id {
            let order = client.order_details(order_id).await?;
            if self.json {
                println!("{}", serde_json::to_string(&order)?);
            } else {
                println!("{}", DisplayOrder(&order));
            }
            return Ok(());
        }

        let history = OrderHistory::fetch(&client).await?;
        let orders = if self.recent {
            history.recent()
        } else {
            history.orders()
        };

        if self.json {
            println!("{}", serde_json::to_string(orders)?);
            return Ok(());
        }

        if orders.is_empty() {
            message::plain("No orders yet. Your order history will appear here.");
            return Ok(());
        }

        println!("{}", DisplayOrders(orders));
        Ok(())
    }
}
