//! quarry CLI: run or dry-run the retail and warehouse pipelines.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use quarry_core::config::PipelineConfig;
use quarry_core::manifest::RunManifest;
use quarry_core::schema::Schema;
use quarry_exec::pipeline::CONNECT_STAGE;
use quarry_exec::{
    ExecError, Pipeline, RetailPipeline, Reporter, TracingReporter, WarehousePipeline,
};
use quarry_io::JsonlSink;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Validate, reshape and load the retail and warehouse datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read, transform and load a pipeline
    Run {
        pipeline: PipelineKind,

        /// Path to the YAML config (built-in defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write `<table>.jsonl` files here instead of the SQL sink
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Log file (overrides config and environment)
        #[arg(long)]
        log_file: Option<String>,

        /// Print the run manifest as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read and transform a pipeline without loading anything
    Validate {
        pipeline: PipelineKind,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        log_file: Option<String>,
    },

    /// Print a pipeline's default config as YAML
    Defaults { pipeline: PipelineKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PipelineKind {
    Retail,
    Warehouse,
}

impl PipelineKind {
    fn pipeline(self) -> &'static dyn Pipeline {
        match self {
            PipelineKind::Retail => &RetailPipeline,
            PipelineKind::Warehouse => &WarehousePipeline,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    let (config, kind) = match &cli.command {
        Commands::Defaults { pipeline } => {
            match pipeline.pipeline().defaults().to_yaml() {
                Ok(yaml) => print!("{yaml}"),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
            return;
        }
        Commands::Run {
            pipeline,
            config,
            log_file,
            ..
        }
        | Commands::Validate {
            pipeline,
            config,
            log_file,
        } => match resolve_config(*pipeline, config.as_deref(), log_file.clone()) {
            Ok(cfg) => (cfg, *pipeline),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    };

    let guard = match init_logging(&config.log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: cannot open log file '{}': {}", config.log_file, e);
            std::process::exit(1);
        }
    };

    let outcome = match cli.command {
        Commands::Run {
            export_dir, json, ..
        } => run_pipeline(kind, &config, export_dir.as_deref(), json),
        Commands::Validate { .. } => validate_pipeline(kind, &config),
        Commands::Defaults { .. } => Ok(()),
    };

    // Stage failures were already logged by the reporter.
    let code = match outcome {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    tracing::info!(code, "quarry exiting");
    // Flush the file appender before exiting.
    drop(guard);
    std::process::exit(code);
}

/// Defaults or file, then environment, then command-line flags.
fn resolve_config(
    kind: PipelineKind,
    path: Option<&Path>,
    log_file: Option<String>,
) -> CliResult<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::from_path(path)?,
        None => kind.pipeline().defaults(),
    };
    config.apply_env();
    if let Some(log_file) = log_file {
        config.log_file = log_file;
    }
    Ok(config)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Human-readable stderr plus a plain-text append-only log file.
fn init_logging(log_file: &str) -> std::io::Result<WorkerGuard> {
    let path = Path::new(log_file);
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "pipeline.log".into());
    fs::create_dir_all(&dir)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter());

    let file_appender = tracing_appender::rolling::never(&dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(non_blocking)
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(guard)
}

fn run_pipeline(
    kind: PipelineKind,
    config: &PipelineConfig,
    export_dir: Option<&Path>,
    json: bool,
) -> CliResult<()> {
    let pipeline = kind.pipeline();
    let mut reporter = TracingReporter;

    let manifest = match export_dir {
        Some(dir) => {
            let mut sink = open_export(dir, &mut reporter)?;
            pipeline.run(config, &mut sink, &mut reporter)?
        }
        None => pipeline.run_to_database(config, &mut reporter)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
    } else {
        print_summary(&manifest);
    }
    Ok(())
}

fn open_export(dir: &Path, reporter: &mut dyn Reporter) -> Result<JsonlSink, ExecError> {
    JsonlSink::new(dir)
        .map_err(ExecError::Connection)
        .inspect_err(|e| reporter.failed(CONNECT_STAGE, e))
}

fn validate_pipeline(kind: PipelineKind, config: &PipelineConfig) -> CliResult<()> {
    let tables = kind.pipeline().prepare(config, &mut TracingReporter)?;
    println!("✓ {} pipeline is valid", kind.pipeline().name());
    for (name, table) in &tables {
        println!("  {:<12} {} rows", name, table.num_rows());
        for field in Schema::of(&table.batch).fields {
            let null = if field.nullable { " (nullable)" } else { "" };
            println!("    {}: {:?}{}", field.name, field.data_type, null);
        }
    }
    Ok(())
}

fn print_summary(manifest: &RunManifest) {
    println!("✓ {} pipeline executed successfully", manifest.pipeline);
    println!(
        "  Duration: {}ms",
        manifest.finished_ms.saturating_sub(manifest.started_ms)
    );
    for table in &manifest.tables {
        println!("  {:<12} {} rows  {}", table.name, table.rows, table.digest);
    }
}
