//! hintkv CLI
//!
//! Command-line interface for a file-backed hintkv database.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hintkv::{Config, Database, FileDatabase, SnapshotPolicy};
use tracing_subscriber::{fmt, EnvFilter};

/// hintkv CLI
#[derive(Parser, Debug)]
#[command(name = "hintkv")]
#[command(about = "Append-only key-value store with a hint-file index")]
#[command(version)]
struct Args {
    /// Data file (the index snapshot is kept at <data-file>.hint)
    #[arg(short, long, default_value = "./hintkv.log")]
    data_file: PathBuf,

    /// Save the index snapshot every N writes instead of after each one
    #[arg(short = 'n', long)]
    snapshot_every: Option<usize>,

    /// fsync the log and snapshot after each write
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Rebuild the index snapshot by scanning the data file
    Rebuild,

    /// Print key count and log size
    Stats,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let policy = match args.snapshot_every {
        Some(count) => SnapshotPolicy::EveryNWrites { count },
        None => SnapshotPolicy::EveryWrite,
    };
    let config = Config::builder()
        .data_file(&args.data_file)
        .snapshot_policy(policy)
        .sync_writes(args.sync)
        .build();

    let mut db = match Database::open_path(config) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            return ExitCode::from(1);
        }
    };

    let code = run(&mut db, args.command);

    if let Err(e) = db.close() {
        tracing::error!("Failed to close database: {}", e);
        return ExitCode::from(1);
    }

    code
}

fn run(db: &mut FileDatabase, command: Commands) -> ExitCode {
    match command {
        Commands::Get { key } => match db.get(&key) {
            Ok(value) => {
                println!("{}", value);
                ExitCode::SUCCESS
            }
            Err(e) if e.is_not_found() => {
                eprintln!("(not found) {}", key);
                ExitCode::from(2)
            }
            Err(e) => {
                tracing::error!("get failed: {}", e);
                ExitCode::from(1)
            }
        },
        Commands::Set { key, value } => match db.set(&key, &value) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("set failed: {}", e);
                ExitCode::from(1)
            }
        },
        Commands::Rebuild => match db.rebuild_index() {
            Ok(scan) => {
                println!(
                    "records={} live_keys={} end_offset={} torn_bytes={}",
                    scan.records, scan.live_keys, scan.end_offset, scan.torn_bytes
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("rebuild failed: {}", e);
                ExitCode::from(1)
            }
        },
        Commands::Stats => {
            println!("keys={} log_bytes={}", db.len(), db.log_len().unwrap_or(0));
            ExitCode::SUCCESS
        }
    }
}
