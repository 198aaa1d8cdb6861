//! Per-slot candidate orderings that drive the search.

use crate::optimizer::scorer::ScoredItem;
use crate::optimizer::search::Objective;

#[derive(Debug, Clone, PartialEq)]
pub struct SlotCatalog {
    pub slot: String,
    /// Descending power.
    pub by_power: Vec<ScoredItem>,
    /// Ascending cost.
    pub by_cost: Vec<ScoredItem>,
    /// Descending power/cost ratio.
    pub by_ratio: Vec<ScoredItem>,
}

/// Power per unit cost; free items divide by `epsilon` so they still rank by raw power.
pub fn power_cost_ratio(item: &ScoredItem, epsilon: f64) -> f64 {
    if item.cost > 0.0 {
        item.power / item.cost
    } else {
        item.power / epsilon
    }
}

impl SlotCatalog {
    /// All three orderings are stable: ties keep input order.
    pub fn build(slot: impl Into<String>, items: &[ScoredItem], cost_epsilon: f64) -> Self {
        let mut by_power = items.to_vec();
        by_power.sort_by(|left, right| right.power.total_cmp(&left.power));

        let mut by_cost = items.to_vec();
        by_cost.sort_by(|left, right| left.cost.total_cmp(&right.cost));

        let mut by_ratio = items.to_vec();
        by_ratio.sort_by(|left, right| {
            power_cost_ratio(right, cost_epsilon).total_cmp(&power_cost_ratio(left, cost_epsilon))
        });

        Self {
            slot: slot.into(),
            by_power,
            by_cost,
            by_ratio,
        }
    }

    pub fn ordered(&self, objective: Objective) -> &[ScoredItem] {
        match objective {
            Objective::Power => &self.by_power,
            Objective::Cost => &self.by_cost,
            Objective::Ratio => &self.by_ratio,
        }
    }

    pub fn len(&self) -> usize {
        self.by_power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_power.is_empty()
    }
}

/// Build catalogs for every slot, keeping slot order. Empty slots are kept and logged.
pub fn build_catalogs<'a, I>(slots: I, cost_epsilon: f64) -> Vec<SlotCatalog>
where
    I: IntoIterator<Item = (&'a str, &'a [ScoredItem])>,
{
    slots
        .into_iter()
        .map(|(slot, items)| {
            if items.is_empty() {
                tracing::warn!(
                    slot,
                    "{}; builds will omit it",
                    crate::error::LoadoutError::EmptySlotCatalog {
                        slot: slot.to_string()
                    }
                );
            }
            SlotCatalog::build(slot, items, cost_epsilon)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn item(name: &str, power: f64, cost: f64) -> ScoredItem {
        ScoredItem {
            name: name.to_string(),
            power,
            cost,
            constraints: BTreeMap::new(),
        }
    }

    fn names(items: &[ScoredItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn three_orderings() {
        let items = vec![
            item("cheap", 10.0, 5.0),
            item("strong", 90.0, 300.0),
            item("balanced", 50.0, 50.0),
        ];
        let catalog = SlotCatalog::build("Belt", &items, 1e-6);
        assert_eq!(names(&catalog.by_power), ["strong", "balanced", "cheap"]);
        assert_eq!(names(&catalog.by_cost), ["cheap", "balanced", "strong"]);
        assert_eq!(names(&catalog.by_ratio), ["cheap", "balanced", "strong"]);
        assert_eq!(names(&items), ["cheap", "strong", "balanced"], "input untouched");
    }

    #[test]
    fn ties_keep_input_order() {
        let items = vec![item("first", 10.0, 1.0), item("second", 10.0, 1.0)];
        let catalog = SlotCatalog::build("Ring 1", &items, 1e-6);
        assert_eq!(names(&catalog.by_power), ["first", "second"]);
        assert_eq!(names(&catalog.by_cost), ["first", "second"]);
        assert_eq!(names(&catalog.by_ratio), ["first", "second"]);
    }

    #[test]
    fn free_items_rank_by_raw_power() {
        let items = vec![
            item("paid", 100.0, 1.0),
            item("free-weak", 1.0, 0.0),
            item("free-strong", 5.0, 0.0),
        ];
        let catalog = SlotCatalog::build("Cloak", &items, 1e-6);
        assert_eq!(names(&catalog.by_ratio), ["free-strong", "free-weak", "paid"]);
    }

    #[test]
    fn empty_slots_are_kept() {
        let belt = vec![item("a", 1.0, 1.0)];
        let catalogs = build_catalogs(
            [("Belt", belt.as_slice()), ("Cloak", &[][..])],
            1e-6,
        );
        assert_eq!(catalogs.len(), 2);
        assert!(catalogs[1].is_empty());
        assert_eq!(catalogs[1].ordered(Objective::Cost).len(), 0);
    }
}
