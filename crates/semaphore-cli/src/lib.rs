//! # semaphore-cli — Semaphore Command-Line Interface
//!
//! A clap-based front end over `semaphore-proof`.
//!
//! ## Subcommands
//!
//! - `verify`: verify a JSON proof record
//! - `prove`: generate a proof record from a request file
//! - `hash`: domain hash of a message or scope value
//! - `inputs`: circuit inputs for a request, without proving
//! - `pack` / `unpack`: convert between JSON and the packed binary form
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to the library crates; no proof logic here.
//! - Handlers return an exit code; errors propagate as `anyhow::Error`.

pub mod codec;
pub mod hash;
pub mod prove;
pub mod request;
pub mod settings;
pub mod verify;
