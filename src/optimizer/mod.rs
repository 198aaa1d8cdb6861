pub mod catalog;
pub mod evaluator;
pub mod ranking;
pub mod scorer;
pub mod search;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::OptimizerConfig;
use crate::data::record::SlotTable;
use crate::error::{LoadoutError, Result};
use crate::optimizer::catalog::{build_catalogs, SlotCatalog};
use crate::optimizer::ranking::RankedBuild;
use crate::optimizer::scorer::{ItemScorer, ScoredItem};
use crate::optimizer::search::{linear_scan, top_k_with_repair, Objective, SearchLimits};

/// Which search runs over the slot catalogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Top-k seeds plus weakest-slot repair; up to `max_builds` ranked builds.
    #[default]
    TopK,
    /// One linear scan per objective; at most one build each.
    Scan,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveResult {
    pub objective: Objective,
    pub build: Option<RankedBuild>,
}

impl ObjectiveResult {
    /// Turn an empty result into [`LoadoutError::NoFeasibleBuild`].
    pub fn require(self) -> Result<RankedBuild> {
        let objective = self.objective;
        self.build
            .ok_or(LoadoutError::NoFeasibleBuild { objective })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", content = "results", rename_all = "snake_case")]
pub enum OptimizationOutcome {
    Ranked(Vec<RankedBuild>),
    PerObjective(Vec<ObjectiveResult>),
}

impl OptimizationOutcome {
    pub fn builds(&self) -> Vec<&RankedBuild> {
        match self {
            Self::Ranked(builds) => builds.iter().collect(),
            Self::PerObjective(results) => results.iter().filter_map(|r| r.build.as_ref()).collect(),
        }
    }
}

/// Score every table, failing on the first malformed value or repeated slot name.
pub fn score_tables(
    config: &OptimizerConfig,
    tables: &[SlotTable],
) -> Result<Vec<(String, Vec<ScoredItem>)>> {
    let mut seen = HashSet::new();
    if let Some(table) = tables.iter().find(|table| !seen.insert(table.slot.as_str())) {
        return Err(LoadoutError::DuplicateSlot {
            slot: table.slot.clone(),
        });
    }
    let scorer = ItemScorer::new(config);
    tables
        .iter()
        .map(|table| Ok((table.slot.clone(), scorer.score_table(table)?)))
        .collect()
}

pub fn catalogs_for(config: &OptimizerConfig, scored: &[(String, Vec<ScoredItem>)]) -> Vec<SlotCatalog> {
    build_catalogs(
        scored
            .iter()
            .map(|(slot, items)| (slot.as_str(), items.as_slice())),
        config.cost_epsilon,
    )
}

pub fn search_catalogs(
    config: &OptimizerConfig,
    catalogs: &[SlotCatalog],
    strategy: SearchStrategy,
) -> OptimizationOutcome {
    let thresholds = config.thresholds();
    match strategy {
        SearchStrategy::TopK => {
            let limits = SearchLimits::from(config.search.clone());
            OptimizationOutcome::Ranked(top_k_with_repair(catalogs, &thresholds, &limits))
        }
        SearchStrategy::Scan => OptimizationOutcome::PerObjective(
            Objective::ALL
                .into_iter()
                .map(|objective| ObjectiveResult {
                    objective,
                    build: linear_scan(catalogs, objective, &thresholds, config.search.strict),
                })
                .collect(),
        ),
    }
}

/// Full pipeline: score → catalog → search. Every call owns its own state.
pub fn optimize(
    config: &OptimizerConfig,
    tables: &[SlotTable],
    strategy: SearchStrategy,
) -> Result<OptimizationOutcome> {
    let scored = score_tables(config, tables)?;
    let catalogs = catalogs_for(config, &scored);
    let outcome = search_catalogs(config, &catalogs, strategy);
    tracing::info!(
        slots = catalogs.len(),
        candidates = catalogs.iter().map(SlotCatalog::len).sum::<usize>(),
        builds = outcome.builds().len(),
        ?strategy,
        "optimization finished"
    );
    Ok(outcome)
}
