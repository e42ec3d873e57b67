//! Product list view state and its fetch-cycle transitions.
//!
//! The view is always in exactly one [`Phase`]. Every region change (the
//! initial mount included) starts a new fetch cycle identified by a
//! [`Ticket`]; the cycle's outcome is applied with [`ProductListView::settle`].

use crate::api::{FetchError, Product, Region, RegionParseError};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// What the view is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    Failed(String),
    Loaded(Vec<Product>),
}

/// Identifies one fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub region: Region,
}

/// How settlements of superseded cycles are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalePolicy {
    /// Only the latest cycle may change the view.
    #[default]
    Discard,
    /// Every settlement is applied; whichever settles last wins. This is the
    /// behaviour of the original web view.
    LastSettledWins,
}

impl std::str::FromStr for StalePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discard" => Ok(StalePolicy::Discard),
            "last-settled-wins" | "last" => Ok(StalePolicy::LastSettledWins),
            _ => Err(format!("Unknown stale policy: {}. Use: discard, last-settled-wins", s)),
        }
    }
}

/// Result of applying a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    /// The cycle was superseded and its outcome ignored.
    Stale,
}

/// The visible body, derived from the view state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Body<'a> {
    Loading(Region),
    Error(&'a str),
    Empty(Region),
    Products(Region, &'a [Product]),
}

/// Region-scoped product listing.
#[derive(Debug)]
pub struct ProductListView {
    region: Region,
    phase: Phase,
    current: Ticket,
    next_id: u64,
    stale_policy: StalePolicy,
}

impl ProductListView {
    /// Mounts the view on `region` and starts its first fetch cycle.
    pub fn mount(region: Region, stale_policy: StalePolicy) -> (Self, Ticket) {
        let ticket = Ticket { id: 1, region };
        let view = Self { region, phase: Phase::Loading, current: ticket, next_id: 2, stale_policy };
        debug!("Mounted view on {}", region);
        (view, ticket)
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Returns the ticket of the cycle started last.
    pub fn current_ticket(&self) -> Ticket {
        self.current
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// Starts a new fetch cycle for the current region.
    ///
    /// Previous products or error are dropped together with the switch to
    /// `Loading`, so no render can observe a half-reset state.
    pub fn begin_cycle(&mut self) -> Ticket {
        let ticket = Ticket { id: self.next_id, region: self.region };
        self.next_id += 1;
        self.current = ticket;
        self.phase = Phase::Loading;
        debug!("Started fetch cycle {} for {}", ticket.id, ticket.region);
        ticket
    }

    /// Handles a region selection from user input.
    ///
    /// Selecting the active region again re-runs the cycle. Input outside the
    /// supported set leaves the view untouched.
    pub fn select_region(&mut self, raw: &str) -> Result<Ticket, RegionParseError> {
        let region: Region = raw.parse()?;
        Ok(self.change_region(region))
    }

    /// Switches to an already validated region and starts its cycle.
    pub fn change_region(&mut self, region: Region) -> Ticket {
        self.region = region;
        self.begin_cycle()
    }

    /// Applies the outcome of the cycle identified by `ticket`.
    pub fn settle(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<Product>, FetchError>,
    ) -> Settlement {
        if ticket.id != self.current.id && self.stale_policy == StalePolicy::Discard {
            debug!(
                "Ignoring settlement of superseded cycle {} for {} (current is {})",
                ticket.id, ticket.region, self.current.id
            );
            return Settlement::Stale;
        }

        self.phase = match outcome {
            Ok(products) => {
                debug!("Cycle {} loaded {} products", ticket.id, products.len());
                Phase::Loaded(products)
            }
            Err(err) => {
                error!("Fetch error for {}: {}", ticket.region, err);
                Phase::Failed(format!("Failed to fetch products for {}: {}", ticket.region, err))
            }
        };

        Settlement::Applied
    }

    /// Returns what should be on screen right now.
    pub fn body(&self) -> Body<'_> {
        match &self.phase {
            Phase::Loading => Body::Loading(self.region),
            Phase::Failed(message) => Body::Error(message),
            Phase::Loaded(products) if products.is_empty() => Body::Empty(self.region),
            Phase::Loaded(products) => Body::Products(self.region, products),
        }
    }
}
