//! One-shot listing: a single fetch cycle for the configured region.

use crate::api::{ApiClient, ProductApi};
use crate::config::Config;
use crate::format::Formatter;
use crate::view::ProductListView;
use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

/// Fetches and renders the listing for one region.
pub struct ShowCommand {
    config: Config,
}

impl ShowCommand {
    /// Creates a new show command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the fetch cycle and returns the settled body.
    ///
    /// The loading body is written to `status` before the request is sent.
    pub async fn execute(&self, status: &mut impl Write) -> Result<String> {
        let client = ApiClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, status).await
    }

    /// Runs the fetch cycle with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ProductApi,
        status: &mut impl Write,
    ) -> Result<String> {
        let formatter = Formatter::new(self.config.format);
        let (mut view, ticket) = ProductListView::mount(self.config.region, self.config.stale_policy);

        writeln!(status, "{}", formatter.render(&view.body()))
            .context("Failed to write loading status")?;

        info!("Showing products for {}", ticket.region);
        let outcome = client.fetch_products(ticket.region).await;
        view.settle(ticket, outcome);

        Ok(formatter.render(&view.body()))
    }
}
