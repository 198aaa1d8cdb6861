//! Raw per-slot records as read from source tables, before scoring.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One cell value. JSON numbers, strings and `null` map onto the three variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Empty,
}

impl RawValue {
    /// Interprets a text cell the way spreadsheet exports write it: blank is empty,
    /// anything that parses as a float is a number, the rest stays text.
    pub fn from_cell_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else if let Ok(number) = trimmed.parse::<f64>() {
            Self::Number(number)
        } else {
            Self::Text(text.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Empty => Ok(()),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, RawValue>,
}

impl RawItem {
    pub fn new<K, V, I>(name: impl Into<String>, attributes: I) -> Self
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// All candidate rows for one gear slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTable {
    pub slot: String,
    #[serde(default)]
    pub items: Vec<RawItem>,
}

impl SlotTable {
    pub fn new(slot: impl Into<String>, items: Vec<RawItem>) -> Self {
        Self {
            slot: slot.into(),
            items,
        }
    }
}
