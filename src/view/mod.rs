//! The product list view: fetch-cycle state machine.

pub mod state;

pub use state::{Body, Phase, ProductListView, Settlement, StalePolicy, Ticket};
