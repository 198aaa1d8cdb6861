use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::OptimizerConfig;
use crate::data::record::{RawItem, SlotTable};
use crate::error::LoadoutError;
use crate::optimizer::scorer::ItemScorer;
use crate::optimizer::{optimize, OptimizationOutcome, SearchStrategy};

/// Upper bound on builds a single request may ask for.
const MAX_BUILDS_LIMIT: usize = 100;

/// Shared, read-only server state. Each request derives its own catalogs and builds.
#[derive(Debug, Clone, Default)]
pub struct ApiState {
    pub config: OptimizerConfig,
}

impl ApiState {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeRequest {
    pub slots: Vec<SlotTable>,
    #[serde(default)]
    pub strategy: Option<SearchStrategy>,
    #[serde(default)]
    pub max_builds: Option<usize>,
    #[serde(default)]
    pub seed_depth: Option<usize>,
    #[serde(default)]
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub outcome: OptimizationOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

#[derive(Debug)]
pub enum ApiError {
    Parse(serde_json::Error),
    Validation(ValidationErrorResponse),
    Scoring(LoadoutError),
    Serialize(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Validation(_) => write!(f, "invalid optimize request"),
            Self::Scoring(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize response: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "loadout-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn config_payload(state: &ApiState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&state.config)
}

fn validate_optimize_request(request: &OptimizeRequest) -> Result<(), ValidationErrorResponse> {
    let mut errors = Vec::new();

    if request.slots.is_empty() {
        errors.push(ValidationIssue {
            field: "slots",
            messages: vec!["at least one slot table is required".to_string()],
        });
    }
    let mut seen = HashSet::new();
    let duplicates: Vec<String> = request
        .slots
        .iter()
        .filter(|table| !seen.insert(table.slot.as_str()))
        .map(|table| format!("slot '{}' is listed more than once", table.slot))
        .collect();
    if !duplicates.is_empty() {
        errors.push(ValidationIssue {
            field: "slots",
            messages: duplicates,
        });
    }
    if let Some(max_builds) = request.max_builds {
        if max_builds == 0 || max_builds > MAX_BUILDS_LIMIT {
            errors.push(ValidationIssue {
                field: "max_builds",
                messages: vec![format!("must be between 1 and {MAX_BUILDS_LIMIT}")],
            });
        }
    }
    if request.seed_depth == Some(0) {
        errors.push(ValidationIssue {
            field: "seed_depth",
            messages: vec!["must be at least 1".to_string()],
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrorResponse {
            status: "error",
            message: "invalid optimize request",
            errors,
        })
    }
}

pub fn optimize_payload(state: &ApiState, body: &str) -> Result<String, ApiError> {
    let request: OptimizeRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    validate_optimize_request(&request).map_err(ApiError::Validation)?;

    for table in &request.slots {
        if !state.config.slots.contains(&table.slot) {
            tracing::warn!(
                slot = %table.slot,
                "slot is not in the configured slot list; strict mode only covers posted slots"
            );
        }
    }

    let mut config = state.config.clone();
    if let Some(max_builds) = request.max_builds {
        config.search.max_builds = max_builds;
    }
    if let Some(seed_depth) = request.seed_depth {
        config.search.seed_depth = seed_depth;
    }
    if let Some(strict) = request.strict {
        config.search.strict = strict;
    }

    let outcome = optimize(
        &config,
        &request.slots,
        request.strategy.unwrap_or_default(),
    )
    .map_err(ApiError::Scoring)?;

    serde_json::to_string_pretty(&OptimizeResponse {
        status: "ok",
        outcome,
    })
    .map_err(ApiError::Serialize)
}

pub fn score_payload(state: &ApiState, body: &str) -> Result<String, ApiError> {
    let item: RawItem = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let scored = ItemScorer::new(&state.config)
        .score(&item)
        .map_err(ApiError::Scoring)?;
    serde_json::to_string_pretty(&scored).map_err(ApiError::Serialize)
}
