//! Gear build optimizer: score per-slot item tables, then search for one-item-per-slot
//! builds that maximize power while meeting minimum attribute totals.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod optimizer;
pub mod report;
pub mod server;

pub use error::{LoadoutError, Result};
