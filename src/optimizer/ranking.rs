use std::collections::BTreeMap;

use serde::Serialize;

use crate::optimizer::evaluator::{evaluate, Build, BuildTotals};

/// A build together with the totals computed when it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBuild {
    pub build: Build,
    pub power: f64,
    pub cost: f64,
    pub constraints: BTreeMap<String, f64>,
}

impl RankedBuild {
    pub fn from_build(build: Build) -> Self {
        let totals = evaluate(&build);
        Self::with_totals(build, totals)
    }

    pub fn with_totals(build: Build, totals: BuildTotals) -> Self {
        Self {
            build,
            power: totals.power,
            cost: totals.cost,
            constraints: totals.constraints,
        }
    }

    pub fn totals(&self) -> BuildTotals {
        BuildTotals {
            power: self.power,
            cost: self.cost,
            constraints: self.constraints.clone(),
        }
    }

    pub fn ratio(&self) -> Option<f64> {
        self.totals().ratio()
    }
}

/// Stable sort by descending power, then keep the first `max_builds`.
pub fn rank_builds(mut builds: Vec<RankedBuild>, max_builds: usize) -> Vec<RankedBuild> {
    builds.sort_by(|left, right| right.power.total_cmp(&left.power));
    builds.truncate(max_builds);
    builds
}
