//! Product API access: client, error taxonomy, data models and regions.

pub mod client;
pub mod error;
pub mod models;
pub mod regions;

pub use client::{ApiClient, ProductApi};
pub use error::FetchError;
pub use models::{Product, ProductsPayload};
pub use regions::{Region, RegionParseError};
