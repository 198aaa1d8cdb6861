//! Builds (one item per slot) and their aggregate totals.

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};

use crate::optimizer::scorer::ScoredItem;

#[derive(Debug, Clone, PartialEq)]
pub struct SlotPick {
    pub slot: String,
    pub item: ScoredItem,
}

/// Slot assignment in catalog order. Slots without a pick are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Build {
    picks: Vec<SlotPick>,
}

impl Build {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn picks(&self) -> &[SlotPick] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn item(&self, slot: &str) -> Option<&ScoredItem> {
        self.picks
            .iter()
            .find(|pick| pick.slot == slot)
            .map(|pick| &pick.item)
    }

    pub fn push(&mut self, slot: impl Into<String>, item: ScoredItem) {
        self.picks.push(SlotPick {
            slot: slot.into(),
            item,
        });
    }

    /// New build equal to `self` except that `slot` holds `item`.
    pub fn with_pick(&self, slot: &str, item: ScoredItem) -> Self {
        let mut next = self.clone();
        match next.picks.iter_mut().find(|pick| pick.slot == slot) {
            Some(pick) => pick.item = item,
            None => next.push(slot, item),
        }
        next
    }
}

impl Serialize for Build {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.picks.iter().map(|pick| (&pick.slot, &pick.item)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct BuildTotals {
    pub power: f64,
    pub cost: f64,
    pub constraints: BTreeMap<String, f64>,
}

impl BuildTotals {
    /// Power per unit of cost; `None` for a free build.
    pub fn ratio(&self) -> Option<f64> {
        (self.cost > 0.0).then(|| self.power / self.cost)
    }
}

pub fn evaluate(build: &Build) -> BuildTotals {
    let mut totals = BuildTotals::default();
    for pick in build.picks() {
        totals.power += pick.item.power;
        totals.cost += pick.item.cost;
        for (name, value) in &pick.item.constraints {
            *totals.constraints.entry(name.clone()).or_insert(0.0) += value;
        }
    }
    totals
}
