//! # semaphore CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers on a tokio runtime.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use semaphore_cli::codec::{run_pack, run_unpack, PackArgs, UnpackArgs};
use semaphore_cli::hash::{run_hash, HashArgs};
use semaphore_cli::prove::{run_inputs, run_prove, InputsArgs, ProveArgs};
use semaphore_cli::settings::{GlobalArgs, Settings};
use semaphore_cli::verify::{run_verify, VerifyArgs};

/// Semaphore proof toolchain.
///
/// Verifies and generates zero-knowledge proofs of group membership,
/// hashes signals, and converts proof records between JSON and packed form.
#[derive(Parser, Debug)]
#[command(name = "semaphore", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify a proof record.
    Verify(VerifyArgs),

    /// Generate a proof record from a request file.
    Prove(ProveArgs),

    /// Print the domain hash of a message or scope value.
    Hash(HashArgs),

    /// Print the circuit inputs for a request without proving.
    Inputs(InputsArgs),

    /// Pack a proof record into its binary form.
    Pack(PackArgs),

    /// Unpack a binary proof into a JSON record.
    Unpack(UnpackArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn dispatch(command: Commands, settings: &Settings) -> anyhow::Result<u8> {
    match command {
        Commands::Verify(args) => run_verify(&args, settings).await,
        Commands::Prove(args) => run_prove(&args, settings).await,
        Commands::Hash(args) => run_hash(&args),
        Commands::Inputs(args) => run_inputs(&args, settings),
        Commands::Pack(args) => run_pack(&args),
        Commands::Unpack(args) => run_unpack(&args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!("semaphore CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = Settings::resolve(&cli.global).and_then(|settings| {
        tracing::debug!(config = ?settings.config, backend = ?settings.backend, "resolved settings");
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(dispatch(cli.command, &settings))
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
