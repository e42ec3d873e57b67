//! bluey-shop - Region-aware Bluey toy listing
//!
//! A product list view over a remote product API: one fetch cycle per
//! region selection, rendered as loading, error, or the product cards.

pub mod api;
pub mod commands;
pub mod config;
pub mod format;
pub mod view;

pub use api::{FetchError, Product, Region};
pub use config::Config;
pub use view::{Body, ProductListView};
