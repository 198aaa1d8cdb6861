use std::fmt::Write as _;

use crate::optimizer::ranking::RankedBuild;
use crate::optimizer::ObjectiveResult;

const RULE_WIDTH: usize = 50;

fn format_constraints(build: &RankedBuild) -> String {
    build
        .constraints
        .iter()
        .map(|(name, total)| format!("{name}: {total}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_ratio(build: &RankedBuild) -> String {
    build
        .ratio()
        .map(|ratio| format!("{ratio:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn write_build(out: &mut String, heading: &str, build: &RankedBuild) {
    let _ = writeln!(out, "\n{heading}");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for pick in build.build.picks() {
        let _ = writeln!(
            out,
            "{:<15} : {:<30} (Power: {:.2})",
            pick.slot, pick.item.name, pick.item.power
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total Power: {:.2}", build.power);
    let _ = writeln!(out, "Total Cost: {}", build.cost);
    let _ = writeln!(out, "Power/Cost Ratio: {}", format_ratio(build));
    let _ = writeln!(out, "Total Constraints: {}", format_constraints(build));
}

/// Numbered listing of ranked builds, strongest first.
pub fn render_builds(builds: &[RankedBuild]) -> String {
    if builds.is_empty() {
        return "No valid builds found.\n".to_string();
    }
    let mut out = String::new();
    for (index, build) in builds.iter().enumerate() {
        write_build(&mut out, &format!("Build #{}", index + 1), build);
    }
    out
}

/// One block per objective; objectives without a feasible build say so.
pub fn render_objectives(results: &[ObjectiveResult]) -> String {
    let mut out = String::new();
    for result in results {
        match &result.build {
            Some(build) => write_build(&mut out, result.objective.label(), build),
            None => {
                let _ = writeln!(out, "\n{}", result.objective.label());
                let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
                let _ = writeln!(out, "No feasible build found.");
            }
        }
    }
    out
}
