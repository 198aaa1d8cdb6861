//! Scoring and search configuration.
//!
//! The defaults reproduce the fixed tables the optimizer was built around: three
//! minimum-total constraints, eight power multipliers and twelve gear slots. A YAML
//! or JSON file can override any subset of them; missing fields keep their defaults.
//!
//! ```
//! use loadout::config::OptimizerConfig;
//!
//! let config = OptimizerConfig::from_yaml_str("search:\n  max_builds: 3\n").unwrap();
//! assert_eq!(config.search.max_builds, 3);
//! assert_eq!(config.slots.len(), 12);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::optimizer::evaluator::BuildTotals;

pub const DEFAULT_MAX_BUILDS: usize = 10;
/// Number of top-ranked candidates per slot tried as seed builds.
pub const DEFAULT_SEED_DEPTH: usize = 10;
/// Divisor used in place of a zero cost when ranking by power/cost ratio.
pub const DEFAULT_COST_EPSILON: f64 = 1e-6;

const DEFAULT_CONSTRAINTS: &[(&str, f64)] = &[
    ("Stamina", 1000.0),
    ("Hit Rating", 300.0),
    ("Expertise Rating", 100.0),
];

const DEFAULT_MULTIPLIERS: &[(&str, f64)] = &[
    ("Attack Power", 1.0),
    ("Strength", 1.2),
    ("Agility", 1.7),
    ("Intellect", 0.5),
    ("Spell Power", 0.8),
    ("Critical Strike Rating", 1.3),
    ("Haste Rating", 2.0),
    ("Armor Penetration", 1.1),
];

const DEFAULT_SLOTS: &[&str] = &[
    "Belt",
    "Chest Armor",
    "Cloak",
    "Gloves",
    "Helmets",
    "Necklace",
    "Pants",
    "Ring 1",
    "Ring 2",
    "Shoes",
    "Shoulder Piece",
    "Wrist Guards",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub max_builds: usize,
    pub seed_depth: usize,
    /// Reject builds that leave any slot unfilled.
    pub strict: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_builds: DEFAULT_MAX_BUILDS,
            seed_depth: DEFAULT_SEED_DEPTH,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Minimum build-wide total per constraint attribute.
    pub constraints: BTreeMap<String, f64>,
    /// Power weight per power-contributing attribute.
    pub multipliers: BTreeMap<String, f64>,
    /// Slot names, in the order tables are loaded and builds are listed.
    pub slots: Vec<String>,
    pub cost_epsilon: f64,
    pub search: SearchSettings,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            constraints: DEFAULT_CONSTRAINTS
                .iter()
                .map(|(name, min)| (name.to_string(), *min))
                .collect(),
            multipliers: DEFAULT_MULTIPLIERS
                .iter()
                .map(|(name, weight)| (name.to_string(), *weight))
                .collect(),
            slots: DEFAULT_SLOTS.iter().map(|s| s.to_string()).collect(),
            cost_epsilon: DEFAULT_COST_EPSILON,
            search: SearchSettings::default(),
        }
    }
}

impl OptimizerConfig {
    /// Loads a YAML (`.yaml`/`.yml`) or JSON (`.json`) file and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let config = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&contents)?,
            "json" => Self::from_json_str(&contents)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = self
            .multipliers
            .keys()
            .find(|name| self.constraints.contains_key(*name))
        {
            return Err(ConfigError::Invalid(format!(
                "attribute '{name}' is both a power multiplier and a constraint"
            )));
        }
        if let Some((name, _)) = self
            .multipliers
            .iter()
            .chain(self.constraints.iter())
            .find(|(_, value)| !value.is_finite())
        {
            return Err(ConfigError::Invalid(format!(
                "attribute '{name}' has a non-finite value"
            )));
        }
        if self.slots.is_empty() {
            return Err(ConfigError::Invalid("slot list is empty".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(slot) = self.slots.iter().find(|slot| !seen.insert(slot.as_str())) {
            return Err(ConfigError::Invalid(format!("slot '{slot}' is listed twice")));
        }
        if !(self.cost_epsilon.is_finite() && self.cost_epsilon > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cost_epsilon must be positive, got {}",
                self.cost_epsilon
            )));
        }
        if self.search.max_builds == 0 {
            return Err(ConfigError::Invalid("search.max_builds must be at least 1".to_string()));
        }
        if self.search.seed_depth == 0 {
            return Err(ConfigError::Invalid("search.seed_depth must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> ConstraintThresholds {
        ConstraintThresholds::new(self.constraints.clone())
    }

    pub fn attribute_table(&self) -> AttributeTable {
        AttributeTable::from_config(self)
    }
}

/// Minimum totals a build has to reach, keyed by constraint name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConstraintThresholds(BTreeMap<String, f64>);

impl ConstraintThresholds {
    pub fn new(minimums: BTreeMap<String, f64>) -> Self {
        Self(minimums)
    }

    /// A constraint absent from `totals` counts as zero.
    pub fn is_satisfied_by(&self, totals: &BuildTotals) -> bool {
        self.0.iter().all(|(name, min)| {
            totals.constraints.get(name).copied().unwrap_or(0.0) >= *min
        })
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ConstraintThresholds {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, min)| (name.into(), min)).collect())
    }
}

/// Role an attribute plays during scoring, resolved once per configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeRole {
    Power(f64),
    Constraint,
    Cost,
}

#[derive(Debug, Clone, Default)]
pub struct AttributeTable {
    roles: HashMap<String, AttributeRole>,
    constraint_names: Vec<String>,
}

impl AttributeTable {
    pub fn from_config(config: &OptimizerConfig) -> Self {
        let mut roles: HashMap<String, AttributeRole> = config
            .multipliers
            .iter()
            .map(|(name, weight)| (name.clone(), AttributeRole::Power(*weight)))
            .collect();
        for name in config.constraints.keys() {
            roles.entry(name.clone()).or_insert(AttributeRole::Constraint);
        }
        Self {
            roles,
            constraint_names: config.constraints.keys().cloned().collect(),
        }
    }

    /// Any attribute not listed as power or constraint is a cost column.
    pub fn role(&self, attribute: &str) -> AttributeRole {
        self.roles.get(attribute).copied().unwrap_or(AttributeRole::Cost)
    }

    pub fn constraint_names(&self) -> &[String] {
        &self.constraint_names
    }
}
