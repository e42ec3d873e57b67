//! CLI command implementations.

pub mod browse;
pub mod show;

pub use browse::BrowseCommand;
pub use show::ShowCommand;
