//! Interactive browsing: the region selector loop.
//!
//! Region selections arrive on one channel, fetch settlements on another.
//! The loop is the only writer of view state, so every transition is applied
//! whole before the next frame is drawn.

use crate::api::{ApiClient, FetchError, Product, ProductApi, Region};
use crate::config::Config;
use crate::format::Formatter;
use crate::view::{ProductListView, Settlement, StalePolicy, Ticket};
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

type Outcome = (Ticket, Result<Vec<Product>, FetchError>);

/// Runs the view against a stream of region selections.
pub struct BrowseCommand {
    config: Config,
}

impl BrowseCommand {
    /// Creates a new browse command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Browses the configured API until `input` closes or the user quits.
    pub async fn execute(&self, input: UnboundedReceiver<String>, out: &mut impl Write) -> Result<()> {
        let client = ApiClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(Arc::new(client), input, out).await
    }

    /// Browses with a provided client (for testing).
    ///
    /// Once `input` closes the loop keeps running until no settlement that
    /// could still change the view is outstanding, so the last frame written
    /// is always a settled one.
    pub async fn execute_with_client(
        &self,
        client: Arc<dyn ProductApi>,
        mut input: UnboundedReceiver<String>,
        out: &mut impl Write,
    ) -> Result<()> {
        let formatter = Formatter::new(self.config.format);
        let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Outcome>();

        let (mut view, ticket) = ProductListView::mount(self.config.region, self.config.stale_policy);
        Self::spawn_fetch(&client, ticket, &settled_tx);
        let mut in_flight: usize = 1;

        writeln!(out, "{}", Self::selector_prompt()).context("Failed to write output")?;
        Self::draw(&formatter, &view, out)?;

        let mut input_open = true;

        loop {
            tokio::select! {
                line = input.recv(), if input_open => {
                    let Some(line) = line else {
                        debug!("Input closed");
                        input_open = false;
                        if self.is_quiescent(&view, in_flight) {
                            break;
                        }
                        continue;
                    };

                    let choice = line.trim();
                    if choice.is_empty() {
                        continue;
                    }
                    if matches!(choice.to_lowercase().as_str(), "q" | "quit" | "exit") {
                        break;
                    }

                    match view.select_region(choice) {
                        Ok(ticket) => {
                            Self::spawn_fetch(&client, ticket, &settled_tx);
                            in_flight += 1;
                            Self::draw(&formatter, &view, out)?;
                        }
                        Err(err) => {
                            warn!("Rejected region selection: {}", choice);
                            writeln!(out, "{}", err).context("Failed to write output")?;
                        }
                    }
                }

                Some((ticket, outcome)) = settled_rx.recv() => {
                    in_flight = in_flight.saturating_sub(1);
                    if view.settle(ticket, outcome) == Settlement::Applied {
                        Self::draw(&formatter, &view, out)?;
                    }
                    if !input_open && self.is_quiescent(&view, in_flight) {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns true when no outstanding request can change the view anymore.
    ///
    /// Under `Discard` only the current cycle counts; under `LastSettledWins`
    /// every request still in flight may overwrite the view.
    fn is_quiescent(&self, view: &ProductListView, in_flight: usize) -> bool {
        match self.config.stale_policy {
            StalePolicy::Discard => !view.is_loading(),
            StalePolicy::LastSettledWins => in_flight == 0,
        }
    }

    /// Starts the request for `ticket` without waiting for it.
    ///
    /// Superseded requests are not cancelled; they settle into the channel
    /// and the view decides whether they still count.
    fn spawn_fetch(client: &Arc<dyn ProductApi>, ticket: Ticket, tx: &UnboundedSender<Outcome>) {
        let client = Arc::clone(client);
        let tx = tx.clone();

        tokio::spawn(async move {
            let outcome = client.fetch_products(ticket.region).await;
            if tx.send((ticket, outcome)).is_err() {
                debug!("Browse session ended before cycle {} settled", ticket.id);
            }
        });
    }

    fn draw(formatter: &Formatter, view: &ProductListView, out: &mut impl Write) -> Result<()> {
        writeln!(out, "\n{}", formatter.render(&view.body())).context("Failed to write output")?;
        out.flush().context("Failed to flush output")
    }

    fn selector_prompt() -> String {
        let codes: Vec<&str> = Region::all().iter().map(|r| r.code()).collect();
        format!("Select Region: {} (q to quit)", codes.join(", "))
    }
}
