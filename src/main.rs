//! src/main.rs
use anyhow::Context;
use clap::Parser;
use gocount::configuration::get_configuration;
use gocount::startup;
use gocount::telemetry::init_tracing;
use std::path::PathBuf;
use std::process::ExitCode;

/// Count GO term annotations per source file and object id.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory (or single file) of tab-separated annotation files
    input: PathBuf,
    /// Directory to write results to; must not exist yet
    output: PathBuf,
    /// Configuration file [default: configuration/base.yaml when present]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of concurrent workers
    #[arg(long)]
    workers: Option<usize>,
    /// Number of reduce partitions, i.e. output part files
    #[arg(long)]
    reduce_tasks: Option<usize>,
    /// Disable map-side pre-aggregation
    #[arg(long)]
    no_combine: bool,
    /// Term code to count, repeatable; replaces the configured set
    #[arg(long = "term-code", value_name = "CODE")]
    term_codes: Vec<String>,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings =
        get_configuration(cli.config.as_deref()).context("Failed to read configuration.")?;
    if let Some(workers) = cli.workers {
        settings.cluster.workers = workers;
    }
    if let Some(reduce_tasks) = cli.reduce_tasks {
        settings.cluster.reduce_tasks = reduce_tasks;
    }
    if cli.no_combine {
        settings.job.combine = false;
    }
    if !cli.term_codes.is_empty() {
        settings.job.term_codes = cli.term_codes;
    }

    let telemetry = init_tracing(&settings.telemetry).context("Failed to setup tracing")?;
    let result = startup::run(&cli.input, &cli.output, &settings).await;
    if let Ok(report) = &result {
        tracing::info!(
            job_id = %report.job_id,
            output = %report.output.display(),
            records = report.counters.reduce_output_records,
            "job succeeded"
        );
    }
    if let Err(e) = telemetry.shutdown() {
        eprintln!("Failed to flush traces: {e}");
    }
    result?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}
