//! # Hash Subcommand
//!
//! Prints the domain hash of a message or scope value, as it appears among
//! a proof's public inputs.

use anyhow::{Context, Result};
use clap::Args;

use semaphore_core::{hash, Signal};

/// Arguments for `semaphore hash`.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Decimal, `0x` hex, or text of at most 31 bytes.
    pub value: String,

    /// Print `0x` hex instead of decimal.
    #[arg(long)]
    pub hex: bool,
}

/// Render the hash of `value`.
pub fn hash_value(value: &str, as_hex: bool) -> Result<String> {
    let signal = Signal::parse(value).with_context(|| format!("invalid signal {value:?}"))?;
    let digest = hash(&signal);
    Ok(if as_hex {
        digest.to_hex()
    } else {
        digest.to_decimal()
    })
}

/// Execute `semaphore hash`.
pub fn run_hash(args: &HashArgs) -> Result<u8> {
    println!("{}", hash_value(&args.value, args.hex)?);
    Ok(0)
}
