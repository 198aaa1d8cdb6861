//! Error types shared by ingestion, scoring and search.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::optimizer::search::Objective;

#[derive(Debug, Error)]
pub enum LoadoutError {
    /// Cost cell whose text, minus its unit suffix, is not an integer.
    #[error("item '{item}': cost attribute '{attribute}' has malformed value '{value}'")]
    MalformedCostValue {
        item: String,
        attribute: String,
        value: String,
    },

    /// Power or constraint cell that is not a number.
    #[error("item '{item}': attribute '{attribute}' is not numeric: '{value}'")]
    MalformedNumericAttribute {
        item: String,
        attribute: String,
        value: String,
    },

    /// Slot without candidates. Reported as a warning; searches continue without the slot.
    #[error("slot '{slot}' has no candidate items")]
    EmptySlotCatalog { slot: String },

    /// A linear scan ran out of offsets. A normal outcome, surfaced as an error only on request.
    #[error("no feasible build found for objective '{objective}'")]
    NoFeasibleBuild { objective: Objective },

    /// Two tables share a slot name; a build holds one item per slot.
    #[error("slot '{slot}' appears in more than one table")]
    DuplicateSlot { slot: String },

    #[error("no table for slot '{slot}' in {}", dir.display())]
    SlotTableNotFound { slot: String, dir: PathBuf },

    #[error("unsupported table format: {}", path.display())]
    UnsupportedTableFormat { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, LoadoutError>;
