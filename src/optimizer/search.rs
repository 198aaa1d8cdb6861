//! Build search: heuristic slot assignment under minimum-total constraints.
//!
//! Enumerating every combination is out of reach (twelve slots with dozens of
//! candidates each), so two cheap strategies are offered instead:
//!
//! * [`top_k_with_repair`] seeds builds from the k-th strongest item of every slot,
//!   then repairs the best seed by walking its weakest slots down their power lists.
//! * [`linear_scan`] walks one ordering per objective (ratio, power, cost) with a shared
//!   offset and stops at the first offset whose build is feasible.
//!
//! Neither is exhaustive. Both stop after a number of steps bounded by the longest
//! candidate list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ConstraintThresholds, SearchSettings};
use crate::optimizer::catalog::SlotCatalog;
use crate::optimizer::evaluator::{evaluate, Build, BuildTotals};
use crate::optimizer::ranking::{rank_builds, RankedBuild};

/// Ordering a linear scan follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Highest power/cost ratio first.
    Ratio,
    /// Highest power first.
    Power,
    /// Lowest cost first.
    Cost,
}

impl Objective {
    pub const ALL: [Objective; 3] = [Objective::Ratio, Objective::Power, Objective::Cost];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ratio => "ratio",
            Self::Power => "power",
            Self::Cost => "cost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ratio => "Optimal power/cost ratio",
            Self::Power => "Highest power",
            Self::Cost => "Lowest cost",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchLimits {
    pub max_builds: usize,
    /// Number of seed ranks tried by the top-k strategy.
    pub seed_depth: usize,
    /// Require every slot in the catalog set to be filled.
    pub strict: bool,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchSettings::default().into()
    }
}

impl From<SearchSettings> for SearchLimits {
    fn from(settings: SearchSettings) -> Self {
        Self {
            max_builds: settings.max_builds,
            seed_depth: settings.seed_depth,
            strict: settings.strict,
        }
    }
}

struct Feasibility<'a> {
    thresholds: &'a ConstraintThresholds,
    required_slots: Option<usize>,
}

impl<'a> Feasibility<'a> {
    fn new(catalogs: &[SlotCatalog], thresholds: &'a ConstraintThresholds, strict: bool) -> Self {
        Self {
            thresholds,
            required_slots: strict.then_some(catalogs.len()),
        }
    }

    fn accepts(&self, build: &Build, totals: &BuildTotals) -> bool {
        if let Some(required) = self.required_slots {
            if build.len() < required {
                return false;
            }
        }
        self.thresholds.is_satisfied_by(totals)
    }
}

fn longest_list(catalogs: &[SlotCatalog]) -> usize {
    catalogs.iter().map(SlotCatalog::len).max().unwrap_or(0)
}

/// Build from the item at `offset` of every slot's `objective` ordering.
/// Slots whose list is too short are left out.
fn build_at_offset(catalogs: &[SlotCatalog], objective: Objective, offset: usize) -> Build {
    let mut build = Build::new();
    for catalog in catalogs {
        if let Some(item) = catalog.ordered(objective).get(offset) {
            build.push(catalog.slot.clone(), item.clone());
        }
    }
    build
}

/// Top-k seeding followed by weakest-slot repair; ranked by descending power.
pub fn top_k_with_repair(
    catalogs: &[SlotCatalog],
    thresholds: &ConstraintThresholds,
    limits: &SearchLimits,
) -> Vec<RankedBuild> {
    let feasibility = Feasibility::new(catalogs, thresholds, limits.strict);
    let seed_depth = limits.seed_depth.min(longest_list(catalogs));
    let mut recorded: Vec<RankedBuild> = Vec::new();
    // Rank and power of the strongest feasible seed so far.
    let mut best_seed: Option<(usize, f64)> = None;

    for rank in 0..seed_depth {
        let build = build_at_offset(catalogs, Objective::Power, rank);
        let totals = evaluate(&build);
        if feasibility.accepts(&build, &totals) {
            tracing::debug!(rank, power = totals.power, "seed build is feasible");
            if best_seed.map_or(true, |(_, power)| totals.power > power) {
                best_seed = Some((rank, totals.power));
            }
            recorded.push(RankedBuild::with_totals(build, totals));
        }
    }
    tracing::debug!(seeds = recorded.len(), "seeding finished");

    if let Some((rank, _)) = best_seed {
        if recorded.len() < limits.max_builds {
            let budget = limits.max_builds - recorded.len();
            recorded.extend(repair_seed(catalogs, rank, &feasibility, budget));
        }
    }

    rank_builds(recorded, limits.max_builds)
}

/// Walk the seed at `rank` down its weakest slots, one step per slot. Each slot is
/// touched at most once; overrides accumulate on the working build and only
/// feasible intermediates are recorded, at most `budget` of them.
fn repair_seed(
    catalogs: &[SlotCatalog],
    rank: usize,
    feasibility: &Feasibility<'_>,
    budget: usize,
) -> Vec<RankedBuild> {
    let mut working = build_at_offset(catalogs, Objective::Power, rank);
    // (catalog index, position in by_power) for every slot the seed fills.
    let mut eligible: Vec<(usize, usize)> = catalogs
        .iter()
        .enumerate()
        .filter(|(_, catalog)| catalog.len() > rank)
        .map(|(index, _)| (index, rank))
        .collect();
    let mut repaired: Vec<RankedBuild> = Vec::new();

    while repaired.len() < budget {
        let Some(weakest) = eligible
            .iter()
            .enumerate()
            .min_by(|(_, left), (_, right)| {
                catalogs[left.0].by_power[left.1]
                    .power
                    .total_cmp(&catalogs[right.0].by_power[right.1].power)
            })
            .map(|(at, _)| at)
        else {
            break;
        };
        let (index, position) = eligible.remove(weakest);
        let catalog = &catalogs[index];

        if let Some(next) = catalog.by_power.get(position + 1) {
            working = working.with_pick(&catalog.slot, next.clone());
            let totals = evaluate(&working);
            tracing::debug!(
                slot = %catalog.slot,
                item = %next.name,
                power = totals.power,
                "repair step"
            );
            if feasibility.accepts(&working, &totals) {
                repaired.push(RankedBuild::with_totals(working.clone(), totals));
            }
        }
    }

    repaired
}

/// Smallest shared offset whose build satisfies every constraint, or `None` once
/// the offset runs past the longest candidate list.
pub fn linear_scan(
    catalogs: &[SlotCatalog],
    objective: Objective,
    thresholds: &ConstraintThresholds,
    strict: bool,
) -> Option<RankedBuild> {
    let feasibility = Feasibility::new(catalogs, thresholds, strict);
    for offset in 0..longest_list(catalogs) {
        let build = build_at_offset(catalogs, objective, offset);
        let totals = evaluate(&build);
        if feasibility.accepts(&build, &totals) {
            tracing::debug!(%objective, offset, "linear scan found a feasible build");
            return Some(RankedBuild::with_totals(build, totals));
        }
    }
    tracing::info!(%objective, "linear scan exhausted every offset without a feasible build");
    None
}
