//! # Error Types
//!
//! Structured errors for the pure, I/O-free layer of the workspace. All
//! errors use `thiserror` for derive-based `Display` and `Error`.
//!
//! ## Design
//!
//! - Every [`ValidationError`] names the offending field using the
//!   `proof.<field>` convention of the JSON transport record, so callers
//!   can report exactly which input was rejected.
//! - Field-element and signal parse failures are reported without a field
//!   name; the validator attaches one when it wraps them.

use thiserror::Error;

/// A record or argument was rejected before any artifact lookup or backend
/// call took place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent (or JSON `null`).
    #[error("{field} is required")]
    Missing {
        /// The offending field, e.g. `proof.scope`.
        field: String,
    },

    /// A field is present but has the wrong primitive shape.
    #[error("{field} must be {expected}")]
    WrongType {
        /// The offending field.
        field: String,
        /// Human-readable description of the expected shape.
        expected: &'static str,
    },

    /// A string field is present but empty.
    #[error("{field} must not be empty")]
    Empty {
        /// The offending field.
        field: String,
    },

    /// The declared tree depth has no compiled circuit.
    #[error("{field} must be a number between {min} and {max}, got {depth}")]
    DepthOutOfRange {
        /// The offending field.
        field: String,
        /// The rejected depth.
        depth: u64,
        /// Smallest supported depth.
        min: u32,
        /// Largest supported depth.
        max: u32,
    },

    /// A value could not be interpreted as a scalar-field element or signal.
    #[error("{field} is not a valid {kind}: {reason}")]
    Malformed {
        /// The offending field.
        field: String,
        /// What the value should have been (`field element`, `signal`).
        kind: &'static str,
        /// Why parsing failed.
        reason: String,
    },

    /// A public-input vector does not have one element per circuit input.
    #[error("{field} must hold {expected} elements, got {actual}")]
    PublicInputCount {
        /// The offending field, usually `proof.publicInputs`.
        field: String,
        /// Number of circuit public inputs.
        expected: usize,
        /// Number supplied.
        actual: usize,
    },

    /// The supplied public inputs disagree with the vector derived from the
    /// record's scope, message, root and nullifier. Verification reports
    /// such records as invalid; packing refuses them.
    #[error("{field} does not match the derived public inputs at position {index}")]
    PublicInputsMismatch {
        /// Always `proof.publicInputs`.
        field: String,
        /// First position at which the vectors differ.
        index: usize,
    },

    /// The membership witness cannot be used with the requested depth.
    #[error("{field}: {reason}")]
    Membership {
        /// The offending field.
        field: String,
        /// Why the witness was rejected.
        reason: String,
    },
}

impl ValidationError {
    /// The `proof.<field>` name this error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field }
            | Self::WrongType { field, .. }
            | Self::Empty { field }
            | Self::DepthOutOfRange { field, .. }
            | Self::Malformed { field, .. }
            | Self::PublicInputCount { field, .. }
            | Self::PublicInputsMismatch { field, .. }
            | Self::Membership { field, .. } => field,
        }
    }
}

/// A string could not be parsed into a [`FieldElement`](crate::FieldElement).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Empty input.
    #[error("empty value")]
    Empty,

    /// Not a decimal or `0x`-prefixed hex number.
    #[error("invalid numeric encoding: {0:?}")]
    InvalidEncoding(String),

    /// Numeric, but not strictly below the BN254 scalar modulus.
    #[error("value is not below the BN254 scalar field modulus")]
    OutOfRange,

    /// A byte encoding had the wrong length.
    #[error("expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// A string could not be interpreted as a 256-bit [`Signal`](crate::Signal).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// Empty input.
    #[error("empty value")]
    Empty,

    /// A numeric value does not fit in 32 bytes.
    #[error("numeric value exceeds 256 bits")]
    TooLarge,

    /// Text does not fit the 31-byte `bytes32` string encoding.
    #[error("text signal is {0} bytes; at most 31 bytes are allowed")]
    TextTooLong(usize),

    /// `0x` prefix followed by invalid hex digits.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Packing or unpacking a proof record failed.
#[derive(Error, Debug)]
pub enum PackError {
    /// The record held a value that cannot be packed.
    #[error("cannot pack proof: {0}")]
    Invalid(#[from] ValidationError),

    /// Binary encoding or decoding failed.
    #[error("packed proof codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// The packed bytes carry an unknown format version.
    #[error("unsupported packed proof version {0}")]
    UnsupportedVersion(u8),
}
