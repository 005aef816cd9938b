//! trip-etl binary: clean a raw trip-record CSV and load it into DuckDB.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trip_etl::pipeline::config::{DEFAULT_BATCH_SIZE, DEFAULT_CHUNK_SIZE};
use trip_etl::{EtlConfig, EtlRunner};

/// ETL (clean + load) for heterogeneous trip-record datasets.
#[derive(Debug, Parser)]
#[command(name = "trip-etl", version, about)]
struct Args {
    /// Path to the raw CSV file
    #[arg(long)]
    input: PathBuf,

    /// Path to the destination DuckDB database
    #[arg(long)]
    database: PathBuf,

    /// Destination table name
    #[arg(long, default_value = "trips")]
    table: String,

    /// Create the destination table if it does not exist
    #[arg(long)]
    create_table: bool,

    /// Rows read per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Rows per insert sub-batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Path to the exclusion log CSV
    #[arg(long, default_value = "cleaning_log.csv")]
    exclusion_log: PathBuf,

    /// Suppress progress output
    #[arg(long)]
    quiet: bool,

    /// Emit the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = EtlConfig::new(&args.input, &args.database)
        .with_table(&args.table)
        .with_create_table(args.create_table)
        .with_chunk_size(args.chunk_size)
        .with_batch_size(args.batch_size)
        .with_exclusion_log(&args.exclusion_log)
        .with_quiet(args.quiet || args.json);

    let runner = EtlRunner::new(config).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let report = runner.run().map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print_summary();
    }

    Ok(())
}
