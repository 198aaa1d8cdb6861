//! Collect-all diagnostics for slot tables. Unlike scoring, which stops at the first
//! malformed value, validation reports every problem it finds.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::config::{AttributeRole, OptimizerConfig};
use crate::data::record::SlotTable;
use crate::optimizer::scorer::{parse_cost, parse_numeric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_slot_tables(config: &OptimizerConfig, tables: &[SlotTable]) -> ValidationReport {
    let attributes = config.attribute_table();
    let mut report = ValidationReport::default();

    for table in tables {
        let slot_context = format!("slot '{}'", table.slot);
        if !config.slots.iter().any(|slot| slot == &table.slot) {
            report.push(
                ValidationSeverity::Warning,
                slot_context.clone(),
                "slot is not in the configured slot list",
            );
        }
        if table.items.is_empty() {
            report.push(
                ValidationSeverity::Warning,
                slot_context.clone(),
                "no candidate items; builds will omit this slot",
            );
            continue;
        }

        let mut seen_names = HashSet::new();
        for (index, item) in table.items.iter().enumerate() {
            let context = format!("{slot_context} item[{index}] '{}'", item.name);
            if !seen_names.insert(item.name.as_str()) {
                report.push(
                    ValidationSeverity::Info,
                    context.clone(),
                    "duplicate item name; treated as a separate candidate",
                );
            }

            let mut cost_columns = 0usize;
            for (attribute, value) in &item.attributes {
                if value.is_empty() {
                    continue;
                }
                match attributes.role(attribute) {
                    AttributeRole::Power(_) | AttributeRole::Constraint => {
                        if parse_numeric(&item.name, attribute, value).is_err() {
                            report.push(
                                ValidationSeverity::Error,
                                format!("{context}.{attribute}"),
                                format!("value '{value}' is not a finite number"),
                            );
                        }
                    }
                    AttributeRole::Cost => {
                        cost_columns += 1;
                        if let Err(err) = parse_cost(&item.name, attribute, value) {
                            report.push(
                                ValidationSeverity::Error,
                                format!("{context}.{attribute}"),
                                err.to_string(),
                            );
                        }
                    }
                }
            }

            match cost_columns {
                0 => report.push(
                    ValidationSeverity::Info,
                    context,
                    "no cost attribute; cost counts as 0",
                ),
                1 => {}
                n => report.push(
                    ValidationSeverity::Warning,
                    context,
                    format!("{n} cost attributes; their costs are summed"),
                ),
            }
        }
    }

    report
}
