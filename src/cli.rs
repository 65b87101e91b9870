//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::keyword_router::KeywordRouter;
use crate::adapters::static_router::StaticRouter;
use crate::adapters::synthetic_adapter::SyntheticDataAdapter;
use crate::domain::blueprint::{Composition, ExecutionBlueprint};
use crate::domain::engine::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_SERIES_LEN, EngineConfig, Orchestrator,
};
use crate::domain::error::RegimixError;
use crate::domain::library::FunctionRegistry;
use crate::domain::smoothing::DEFAULT_WINDOW;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::router_port::IntentRouter;

#[derive(Parser, Debug)]
#[command(name = "regimix", about = "Deterministic regime-classification orchestrator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a query through the orchestrator
    Query {
        /// Query routed to an execution blueprint
        query: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Execute this blueprint file instead of routing the query
        #[arg(short, long)]
        blueprint: Option<PathBuf>,
        /// Iterate smoothing until the regime is stable
        #[arg(short, long)]
        recursive: bool,
        /// Cap on smoothing rounds (with --recursive)
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Write the JSON result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List registered regime functions
    Functions,
    /// Check a blueprint file against the registry
    Validate {
        #[arg(short, long)]
        blueprint: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Query {
            query,
            config,
            blueprint,
            recursive,
            max_iterations,
            output,
        } => run_query(
            &query,
            config.as_ref(),
            blueprint.as_ref(),
            recursive,
            max_iterations,
            output.as_ref(),
        ),
        Command::Functions => run_functions(),
        Command::Validate { blueprint } => run_validate(&blueprint),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = RegimixError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_blueprint(path: &PathBuf) -> Result<ExecutionBlueprint, RegimixError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| RegimixError::IntentParse {
        reason: format!("invalid blueprint {}: {}", path.display(), e),
    })
}

fn build_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, RegimixError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "synthetic".to_string());

    match source.as_str() {
        "synthetic" => Ok(Box::new(SyntheticDataAdapter::from_config(config))),
        "csv" => {
            let dir = config
                .get_string("data", "directory")
                .unwrap_or_else(|| "prices".to_string());
            Ok(Box::new(CsvDataAdapter::new(PathBuf::from(dir))))
        }
        other => Err(RegimixError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: format!("unknown source {other}"),
        }),
    }
}

fn run_query(
    query: &str,
    config_path: Option<&PathBuf>,
    blueprint_path: Option<&PathBuf>,
    recursive: bool,
    max_iterations: Option<usize>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(c) => c,
                Err(code) => return code,
            }
        }
        None => FileConfigAdapter::default(),
    };

    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let router: Box<dyn IntentRouter> = match blueprint_path {
        Some(path) => {
            eprintln!("Loading blueprint from {}", path.display());
            match load_blueprint(path) {
                Ok(bp) => Box::new(StaticRouter::new(bp)),
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            }
        }
        None => Box::new(KeywordRouter),
    };

    let engine_config = EngineConfig {
        series_len: config.get_int("data", "limit", DEFAULT_SERIES_LEN as i64) as usize,
        smoothing_window: config.get_int("stability", "window", DEFAULT_WINDOW as i64) as usize,
    };
    let orchestrator = Orchestrator::with_config(router.as_ref(), data_port.as_ref(), engine_config);

    let json = if recursive {
        let cap = max_iterations.unwrap_or_else(|| {
            config.get_int("stability", "max_iterations", DEFAULT_MAX_ITERATIONS as i64) as usize
        });
        eprintln!("Running until stable (max {cap} iterations): {query}");
        match orchestrator.run_until_stable(query, cap) {
            Ok(result) => {
                eprintln!(
                    "Stable after {} iteration(s); regime has {} samples",
                    result.iterations,
                    result.regime.len()
                );
                serde_json::to_string_pretty(&result)
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    } else {
        eprintln!("Executing: {query}");
        match orchestrator.execute(query) {
            Ok(result) => {
                eprintln!("Regime has {} samples", result.regime.len());
                serde_json::to_string_pretty(&result)
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    };

    let json = match json {
        Ok(j) => j,
        Err(e) => {
            eprintln!("error: failed to serialize result: {e}");
            return ExitCode::from(1);
        }
    };

    match output_path {
        Some(path) => match fs::write(path, &json) {
            Ok(()) => {
                eprintln!("Result written to {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to write result: {e}");
                ExitCode::from(1)
            }
        },
        None => {
            println!("{json}");
            ExitCode::SUCCESS
        }
    }
}

fn run_functions() -> ExitCode {
    let registry = FunctionRegistry::new();
    for name in registry.names() {
        println!("{name}");
    }
    eprintln!("{} functions registered", registry.len());
    ExitCode::SUCCESS
}

fn run_validate(blueprint_path: &PathBuf) -> ExitCode {
    eprintln!("Validating blueprint: {}", blueprint_path.display());
    let blueprint = match load_blueprint(blueprint_path) {
        Ok(bp) => bp,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("  steps:       {}", blueprint.steps.len());
    eprintln!("  composition: {}", blueprint.composition);
    eprintln!(
        "  assets:      {}",
        if blueprint.assets.is_empty() {
            "(default)".to_string()
        } else {
            blueprint.assets.join(", ")
        }
    );

    let registry = FunctionRegistry::new();
    let mut problems = Vec::new();
    for step in &blueprint.steps {
        if registry.get(&step.function_name).is_none() {
            problems.push(format!("unknown function: {}", step.function_name));
        }
    }
    if let Err(e) = Composition::parse(&blueprint.composition) {
        problems.push(e.to_string());
    }

    if problems.is_empty() {
        eprintln!("Blueprint is valid.");
        ExitCode::SUCCESS
    } else {
        for problem in &problems {
            eprintln!("error: {problem}");
        }
        ExitCode::from(3)
    }
}
