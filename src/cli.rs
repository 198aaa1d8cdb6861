use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::OptimizerConfig;
use crate::data::loader::{load_slot_table, load_slot_tables};
use crate::data::validate::validate_slot_tables;
use crate::logging::init_logging;
use crate::optimizer::catalog::SlotCatalog;
use crate::optimizer::scorer::ItemScorer;
use crate::optimizer::search::Objective;
use crate::optimizer::{optimize, OptimizationOutcome, SearchStrategy};
use crate::report::export_csv::write_cost_power_csv;
use crate::report::text::{render_builds, render_objectives};
use crate::server;

const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Parser)]
#[command(name = "loadout", version, about = "Search gear slot tables for strong, valid builds")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load one table per slot from DIR and search for builds.
    Optimize {
        dir: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = StrategyArg::TopK)]
        strategy: StrategyArg,
        #[arg(long)]
        max_builds: Option<usize>,
        #[arg(long)]
        seed_depth: Option<usize>,
        /// Reject builds that leave any slot empty.
        #[arg(long)]
        strict: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Also write cost/power points for plotting.
        #[arg(long)]
        export_csv: Option<PathBuf>,
    },
    /// Score a single slot table and print its sorted candidates.
    Score {
        file: PathBuf,
        #[arg(long)]
        slot: String,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OrderArg::Power)]
        order: OrderArg,
    },
    /// Report malformed values and suspicious rows in every slot table.
    Validate {
        dir: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective configuration as YAML.
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Serve the HTTP API.
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    TopK,
    Scan,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::TopK => SearchStrategy::TopK,
            StrategyArg::Scan => SearchStrategy::Scan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Power,
    Cost,
    Ratio,
}

impl From<OrderArg> for Objective {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Power => Objective::Power,
            OrderArg::Cost => Objective::Cost,
            OrderArg::Ratio => Objective::Ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Parse `args` (including the program name) and run the command. Returns the exit code.
pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { 2 } else { 0 };
        }
    };
    init_logging(&cli.log_level);

    match cli.command {
        Command::Optimize {
            dir,
            config,
            strategy,
            max_builds,
            seed_depth,
            strict,
            format,
            export_csv,
        } => {
            let overrides = SearchOverrides {
                max_builds,
                seed_depth,
                strict,
            };
            handle_optimize(
                &dir,
                config.as_deref(),
                strategy.into(),
                overrides,
                format,
                export_csv.as_deref(),
            )
        }
        Command::Score {
            file,
            slot,
            config,
            order,
        } => handle_score(&file, &slot, config.as_deref(), order.into()),
        Command::Validate { dir, config } => handle_validate(&dir, config.as_deref()),
        Command::Config { config } => handle_config(config.as_deref()),
        Command::Serve { bind, config } => handle_serve(bind, config.as_deref()),
    }
}

struct SearchOverrides {
    max_builds: Option<usize>,
    seed_depth: Option<usize>,
    strict: bool,
}

fn load_config(path: Option<&Path>) -> Option<OptimizerConfig> {
    match OptimizerConfig::load_or_default(path) {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("config error: {err}");
            None
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn handle_optimize(
    dir: &Path,
    config_path: Option<&Path>,
    strategy: SearchStrategy,
    overrides: SearchOverrides,
    format: OutputFormat,
    export_csv: Option<&Path>,
) -> i32 {
    let Some(mut config) = load_config(config_path) else {
        return 1;
    };
    if let Some(max_builds) = overrides.max_builds {
        config.search.max_builds = max_builds;
    }
    if let Some(seed_depth) = overrides.seed_depth {
        config.search.seed_depth = seed_depth;
    }
    config.search.strict |= overrides.strict;
    if let Err(err) = config.validate() {
        eprintln!("config error: {err}");
        return 2;
    }

    let tables = match load_slot_tables(dir, &config.slots) {
        Ok(tables) => tables,
        Err(err) => {
            eprintln!("failed to load slot tables: {err}");
            return 1;
        }
    };
    let outcome = match optimize(&config, &tables, strategy) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("optimization failed: {err}");
            return 1;
        }
    };

    if let Some(path) = export_csv {
        let builds: Vec<_> = outcome.builds().into_iter().cloned().collect();
        let written = File::create(path)
            .map_err(crate::error::LoadoutError::from)
            .and_then(|file| write_cost_power_csv(&builds, BufWriter::new(file)));
        if let Err(err) = written {
            eprintln!("failed to export csv '{}': {err}", path.display());
            return 1;
        }
    }

    match format {
        OutputFormat::Json => print_json(&outcome, "optimization result"),
        OutputFormat::Text => {
            match &outcome {
                OptimizationOutcome::Ranked(builds) => print!("{}", render_builds(builds)),
                OptimizationOutcome::PerObjective(results) => {
                    print!("{}", render_objectives(results))
                }
            }
            0
        }
    }
}

fn handle_score(file: &Path, slot: &str, config_path: Option<&Path>, order: Objective) -> i32 {
    let Some(config) = load_config(config_path) else {
        return 1;
    };
    let table = match load_slot_table(file, slot) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("failed to load '{}': {err}", file.display());
            return 1;
        }
    };
    let scored = match ItemScorer::new(&config).score_table(&table) {
        Ok(scored) => scored,
        Err(err) => {
            eprintln!("scoring failed: {err}");
            return 1;
        }
    };
    let catalog = SlotCatalog::build(slot, &scored, config.cost_epsilon);
    print_json(&catalog.ordered(order), "scored items")
}

fn handle_validate(dir: &Path, config_path: Option<&Path>) -> i32 {
    let Some(config) = load_config(config_path) else {
        return 1;
    };
    let tables = match load_slot_tables(dir, &config.slots) {
        Ok(tables) => tables,
        Err(err) => {
            eprintln!("failed to load slot tables: {err}");
            return 1;
        }
    };

    let report = validate_slot_tables(&config, &tables);
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} issue(s)",
            report.diagnostics.len()
        );
        1
    } else {
        println!("validation passed: {}", dir.display());
        0
    }
}

fn handle_config(config_path: Option<&Path>) -> i32 {
    let Some(config) = load_config(config_path) else {
        return 1;
    };
    match config.to_yaml_string() {
        Ok(yaml) => {
            print!("{yaml}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize config: {err}");
            1
        }
    }
}

fn handle_serve(bind: Option<String>, config_path: Option<&Path>) -> i32 {
    let Some(config) = load_config(config_path) else {
        return 1;
    };
    let bind_addr = bind
        .or_else(|| env::var("LOADOUT_BIND").ok())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    match server::run_server(&bind_addr, config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}
