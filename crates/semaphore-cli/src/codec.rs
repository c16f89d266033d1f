//! # Pack and Unpack Subcommands
//!
//! Converts between the JSON proof record and its compact binary form.
//! Packed output goes to a file, or to stdout as hex.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use semaphore_core::{pack_proof, unpack_proof};

use crate::settings::{read_proof, write_output};

/// Arguments for `semaphore pack`.
#[derive(Args, Debug)]
pub struct PackArgs {
    /// Proof record JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write raw bytes here instead of hex to stdout.
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Arguments for `semaphore unpack`.
#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// Packed proof: raw bytes, or hex with `--hex`.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// The input file holds hex text.
    #[arg(long)]
    pub hex: bool,
}

/// Execute `semaphore pack`.
pub fn run_pack(args: &PackArgs) -> Result<u8> {
    let proof = read_proof(&args.file)?;
    let packed = pack_proof(&proof).context("cannot pack proof")?;
    match &args.out {
        Some(path) => write_output(Some(path), &packed)?,
        None => write_output(None, hex::encode(&packed).as_bytes())?,
    }
    Ok(0)
}

/// Read a packed proof from `path`.
pub fn read_packed(path: &Path, is_hex: bool) -> Result<Vec<u8>> {
    let raw = std::fs::read(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    if !is_hex {
        return Ok(raw);
    }
    let text = String::from_utf8(raw).context("hex input is not UTF-8")?;
    let text = text.trim();
    hex::decode(text.strip_prefix("0x").unwrap_or(text)).context("invalid hex input")
}

/// Execute `semaphore unpack`.
pub fn run_unpack(args: &UnpackArgs) -> Result<u8> {
    let packed = read_packed(&args.file, args.hex)?;
    let proof = unpack_proof(&packed).context("cannot unpack proof")?;
    write_output(None, &serde_json::to_vec_pretty(&proof)?)?;
    Ok(0)
}
