//! Congress Harvester - Download bill data from the ProPublica Congress API.
//!
//! This crate requests every bill of a chamber and congress session,
//! flattens each bill's metadata and action history into two tables, and
//! writes them as CSV files.
//!
//! # Example
//!
//! ```
//! use congress_harvester::enumerate::BillIdTable;
//! use congress_harvester::types::Chamber;
//!
//! let ids = BillIdTable::builtin().enumerate(Chamber::Senate, 116).unwrap();
//! assert_eq!(ids.len(), 2594);
//! ```
//!
//! # Architecture
//!
//! The harvester is organized into several modules:
//!
//! - [`config`]: Constants, run settings and validation
//! - [`types`]: Core data types (Chamber, BillRecord, ActionRecord, etc.)
//! - [`error`]: Error types and Result alias
//! - [`enumerate`]: Bill number tables
//! - [`http`]: HTTP client for the Congress API
//! - [`fetch`]: Bill lookups
//! - [`parse`]: JSON to record mapping
//! - [`status`]: Plain-text run log
//! - [`export`]: CSV table export
//! - [`cli`]: Command-line interface
//! - [`harvester`]: Main harvester service

pub mod cli;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod export;
pub mod fetch;
pub mod harvester;
pub mod http;
pub mod parse;
pub mod status;
pub mod types;

// Re-export main functions
pub use harvester::{run_harvest, HarvestReport};

// Re-export commonly used items
pub use config::HarvestConfig;
pub use error::{FetchError, HarvesterError, Result};
pub use types::{ActionRecord, BillKey, BillRecord, Chamber, IntroducedDateMode};
