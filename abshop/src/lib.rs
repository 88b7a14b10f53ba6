//! Promotion A/B analysis of retail store sales.
//!
//! `load -> filter -> summarize / welch_t_test -> report`: the data module
//! reads and filters the sales table, the stats module holds the pure group
//! comparison, and [`Analysis`] ties both together for one run.

mod analysis;
mod config;
pub mod data;
mod errors;
pub mod stats;

pub use analysis::{Analysis, AnalysisSummary, BootstrapSummary};
pub use config::AnalysisConfig;
pub use errors::{AbShopError, AbShopResult};
