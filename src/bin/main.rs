//! measureforge CLI - generate measures against a JSON model file
//!
//! Usage:
//!   measureforge catalog [--config <file.toml>]
//!   measureforge columns <model.json> [--aggregation <KEY>] [--dry-run]
//!   measureforge tables <model.json> [--measure-table <name>] [--folder <name>]
//!                       [--calc-group <name> | --no-calc-group] [--dry-run]
//!
//! Examples:
//!   measureforge columns demos/model.json --aggregation SUM
//!   measureforge tables demos/model.json --measure-table Measures --folder Counts --dry-run
//!   measureforge catalog

use std::fs;
use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use measureforge::config::EngineConfig;
use measureforge::host::{MemoryModel, Prompt, PromptOutcome};
use measureforge::planner::MeasureBatchPlanner;
use measureforge::run::{
    run_column_measures, run_row_count_measures, ColumnRunOptions, GroupChoice,
    RowCountRunOptions, RunOutcome, RunSummary,
};
use measureforge::AggregationCatalog;

#[derive(Parser)]
#[command(name = "measureforge")]
#[command(about = "Batch measure and calculation-group generation for tabular semantic models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available aggregations
    Catalog {
        /// Optional TOML config extending the built-in catalog
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Create one aggregation measure per selected column
    Columns {
        /// Path to the model JSON file
        model: PathBuf,

        /// Aggregation key (prompts if not specified)
        #[arg(short, long)]
        aggregation: Option<String>,

        /// Plan only: print the plans as JSON, do not modify the model
        #[arg(long)]
        dry_run: bool,

        /// Optional TOML config (catalog and template overrides)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the updated model here instead of back to the input file
        #[arg(short, long)]
        write: Option<PathBuf>,
    },

    /// Create a row-count measure per table, plus a roll-up total
    Tables {
        /// Path to the model JSON file
        model: PathBuf,

        /// Table the measures are created in (prompts if not specified)
        #[arg(short, long)]
        measure_table: Option<String>,

        /// Display folder for the generated measures (prompts if not specified)
        #[arg(short, long)]
        folder: Option<String>,

        /// Also create a calculation group with this name
        #[arg(long, conflicts_with = "no_calc_group")]
        calc_group: Option<String>,

        /// Skip the calculation group without prompting
        #[arg(long)]
        no_calc_group: bool,

        /// Plan only: print the plans as JSON, do not modify the model
        #[arg(long)]
        dry_run: bool,

        /// Optional TOML config (catalog and template overrides)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the updated model here instead of back to the input file
        #[arg(short, long)]
        write: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog { config } => cmd_catalog(config),
        Commands::Columns {
            model,
            aggregation,
            dry_run,
            config,
            write,
        } => cmd_columns(model, aggregation, dry_run, config, write),
        Commands::Tables {
            model,
            measure_table,
            folder,
            calc_group,
            no_calc_group,
            dry_run,
            config,
            write,
        } => cmd_tables(
            model,
            measure_table,
            folder,
            calc_group,
            no_calc_group,
            dry_run,
            config,
            write,
        ),
    }
}

fn cmd_catalog(config: Option<PathBuf>) -> ExitCode {
    let catalog = match load_catalog(&config) {
        Ok(c) => c,
        Err(code) => return code,
    };

    for spec in catalog.specs() {
        println!("{:<16} {}", spec.key, spec.label);
    }
    ExitCode::SUCCESS
}

fn cmd_columns(
    model_path: PathBuf,
    aggregation: Option<String>,
    dry_run: bool,
    config: Option<PathBuf>,
    write: Option<PathBuf>,
) -> ExitCode {
    let engine_config = match load_config(&config) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let catalog = match engine_config.build_catalog() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut model = match load_model(&model_path) {
        Ok(m) => m,
        Err(code) => return code,
    };

    let planner = MeasureBatchPlanner::new(engine_config.build_templates());
    let options = ColumnRunOptions {
        aggregation,
        dry_run,
        ..Default::default()
    };
    let mut prompt = StdinPrompt::new();

    match run_column_measures(&mut model, &mut prompt, &catalog, &planner, &options) {
        Ok(RunOutcome::Completed(summary)) => {
            report(&summary, dry_run);
            if dry_run {
                ExitCode::SUCCESS
            } else {
                save_model(&model, write.as_ref().unwrap_or(&model_path))
            }
        }
        // Dismissed prompt: no side effects, no error dialog.
        Ok(RunOutcome::Cancelled) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_tables(
    model_path: PathBuf,
    measure_table: Option<String>,
    folder: Option<String>,
    calc_group: Option<String>,
    no_calc_group: bool,
    dry_run: bool,
    config: Option<PathBuf>,
    write: Option<PathBuf>,
) -> ExitCode {
    let engine_config = match load_config(&config) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let mut model = match load_model(&model_path) {
        Ok(m) => m,
        Err(code) => return code,
    };

    let group = match (calc_group, no_calc_group) {
        (Some(name), _) => GroupChoice::Named(name),
        (None, true) => GroupChoice::Skip,
        (None, false) => GroupChoice::Prompt,
    };

    let planner = MeasureBatchPlanner::new(engine_config.build_templates());
    let options = RowCountRunOptions {
        measure_table,
        folder,
        group,
        dry_run,
    };
    let mut prompt = StdinPrompt::new();

    match run_row_count_measures(&mut model, &mut prompt, &planner, &options) {
        Ok(RunOutcome::Completed(summary)) => {
            report(&summary, dry_run);
            if dry_run {
                ExitCode::SUCCESS
            } else {
                save_model(&model, write.as_ref().unwrap_or(&model_path))
            }
        }
        Ok(RunOutcome::Cancelled) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn report(summary: &RunSummary, dry_run: bool) {
    if dry_run {
        match serde_json::to_string_pretty(&summary.batch) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing plans: {}", e),
        }
        if let Some(group) = &summary.group {
            match serde_json::to_string_pretty(group) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Error serializing calculation group: {}", e),
            }
        }
        eprintln!("{}", summary.message);
    } else {
        println!("{}", summary.message);
    }
}

fn load_config(path: &Option<PathBuf>) -> Result<EngineConfig, ExitCode> {
    match path {
        Some(path) => EngineConfig::load(path).map_err(|e| {
            eprintln!("Config error: {}", e);
            ExitCode::FAILURE
        }),
        None => Ok(EngineConfig::default()),
    }
}

fn load_catalog(config: &Option<PathBuf>) -> Result<AggregationCatalog, ExitCode> {
    let engine_config = load_config(config)?;
    engine_config.build_catalog().map_err(|e| {
        eprintln!("Config error: {}", e);
        ExitCode::FAILURE
    })
}

fn load_model(path: &PathBuf) -> Result<MemoryModel, ExitCode> {
    let json = fs::read_to_string(path).map_err(|e| {
        eprintln!("Error reading model '{}': {}", path.display(), e);
        ExitCode::FAILURE
    })?;
    MemoryModel::from_json(&json).map_err(|e| {
        eprintln!("Error parsing model '{}': {}", path.display(), e);
        ExitCode::FAILURE
    })
}

fn save_model(model: &MemoryModel, path: &PathBuf) -> ExitCode {
    let json = match model.to_json_pretty() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing model: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match fs::write(path, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error writing model '{}': {}", path.display(), e);
            ExitCode::FAILURE
        }
    }
}

/// Stdin-backed prompts for choices the flags did not provide.
///
/// An empty line accepts the default (for choices) or cancels (for text);
/// EOF always cancels.
struct StdinPrompt {
    stdin: io::Stdin,
}

impl StdinPrompt {
    fn new() -> Self {
        Self { stdin: io::stdin() }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.stdin.lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }
}

impl Prompt for StdinPrompt {
    fn choose(&mut self, label: &str, options: &[&str], default: &str) -> PromptOutcome<String> {
        eprintln!("{}", label);
        eprintln!("  options: {}", options.join(", "));
        eprint!("  [{}]> ", default);
        let _ = io::stderr().flush();
        match self.read_line() {
            Some(line) if line.is_empty() => PromptOutcome::Selected(default.to_string()),
            Some(line) => PromptOutcome::Selected(line),
            None => PromptOutcome::Cancelled,
        }
    }

    fn text(&mut self, label: &str) -> PromptOutcome<String> {
        eprint!("{}> ", label);
        let _ = io::stderr().flush();
        match self.read_line() {
            Some(line) if line.is_empty() => PromptOutcome::Cancelled,
            Some(line) => PromptOutcome::Selected(line),
            None => PromptOutcome::Cancelled,
        }
    }

    fn confirm(&mut self, label: &str) -> PromptOutcome<bool> {
        eprint!("{} [y/N]> ", label);
        let _ = io::stderr().flush();
        match self.read_line() {
            Some(line) => PromptOutcome::Selected(line.eq_ignore_ascii_case("y")),
            None => PromptOutcome::Cancelled,
        }
    }
}
