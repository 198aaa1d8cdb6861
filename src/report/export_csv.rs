//! Cost-vs-power points for external plotting, one CSV row per build.
//!
//! Columns: `build` (1-based label), `power`, `cost`, `ratio` (blank for free builds).

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::optimizer::ranking::RankedBuild;

#[derive(Debug, Serialize)]
struct CostPowerRow {
    build: String,
    power: f64,
    cost: f64,
    ratio: Option<f64>,
}

pub fn write_cost_power_csv<W: Write>(builds: &[RankedBuild], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (index, build) in builds.iter().enumerate() {
        csv_writer.serialize(CostPowerRow {
            build: format!("Build {}", index + 1),
            power: build.power,
            cost: build.cost,
            ratio: build.ratio(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
