//! Household-level explorer for the simulated impact of a tax reform bill.
//!
//! The library holds everything below the viewer: the household table and
//! its loaders, the filter chain, household selection, and the per-focus
//! impact analysis that feeds the waterfall chart and story summary.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod selection;
pub mod story;

pub use error::{ExplorerError, Result};
