//! Item scoring: turn one raw record into power, cost and constraint contributions.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{AttributeRole, AttributeTable, OptimizerConfig};
use crate::data::record::{RawItem, RawValue, SlotTable};
use crate::error::{LoadoutError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem {
    pub name: String,
    pub power: f64,
    pub cost: f64,
    /// Contains every configured constraint name, zero-filled when the row lacks it.
    pub constraints: BTreeMap<String, f64>,
}

impl ScoredItem {
    pub fn constraint(&self, name: &str) -> f64 {
        self.constraints.get(name).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct ItemScorer {
    attributes: AttributeTable,
}

impl ItemScorer {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            attributes: config.attribute_table(),
        }
    }

    pub fn score(&self, item: &RawItem) -> Result<ScoredItem> {
        let mut power = 0.0;
        let mut cost = 0.0;
        let mut constraints: BTreeMap<String, f64> = self
            .attributes
            .constraint_names()
            .iter()
            .map(|name| (name.clone(), 0.0))
            .collect();
        let mut cost_columns = 0usize;

        for (attribute, value) in &item.attributes {
            if value.is_empty() {
                continue;
            }
            match self.attributes.role(attribute) {
                AttributeRole::Power(weight) => {
                    power += weight * parse_numeric(&item.name, attribute, value)?;
                }
                AttributeRole::Constraint => {
                    *constraints.entry(attribute.clone()).or_insert(0.0) +=
                        parse_numeric(&item.name, attribute, value)?;
                }
                AttributeRole::Cost => {
                    cost += parse_cost(&item.name, attribute, value)?;
                    cost_columns += 1;
                }
            }
        }

        if cost_columns > 1 {
            tracing::warn!(
                item = %item.name,
                cost_columns,
                "item has more than one cost attribute; costs are summed"
            );
        }

        Ok(ScoredItem {
            name: item.name.clone(),
            power,
            cost,
            constraints,
        })
    }

    /// Score every row of a slot table, stopping at the first malformed value.
    pub fn score_table(&self, table: &SlotTable) -> Result<Vec<ScoredItem>> {
        table.items.iter().map(|item| self.score(item)).collect()
    }
}

/// Power and constraint values must be finite numbers; `NaN` and `inf` are rejected.
pub fn parse_numeric(item: &str, attribute: &str, value: &RawValue) -> Result<f64> {
    let malformed = || LoadoutError::MalformedNumericAttribute {
        item: item.to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    };
    let number = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(text) => text.trim().parse::<f64>().map_err(|_| malformed())?,
        RawValue::Empty => return Ok(0.0),
    };
    if number.is_finite() {
        Ok(number)
    } else {
        Err(malformed())
    }
}

/// Costs are written with a one-character currency suffix ("120g"); the suffix is
/// dropped and the remainder must be an integer. Numeric cells carry no suffix.
pub fn parse_cost(item: &str, attribute: &str, value: &RawValue) -> Result<f64> {
    let malformed = || LoadoutError::MalformedCostValue {
        item: item.to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    };
    match value {
        RawValue::Number(n) if n.is_finite() => Ok(*n),
        RawValue::Number(_) => Err(malformed()),
        RawValue::Empty => Ok(0.0),
        RawValue::Text(text) => {
            let mut chars = text.trim().chars();
            chars.next_back();
            // "120 g" keeps a space before the suffix.
            chars
                .as_str()
                .trim()
                .parse::<i64>()
                .map(|amount| amount as f64)
                .map_err(|_| malformed())
        }
    }
}
