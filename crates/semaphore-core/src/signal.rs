//! # Signals: Message and Scope Values
//!
//! A Semaphore message or scope is an arbitrary 256-bit value. Records carry
//! it as a string, interpreted in this order:
//!
//! 1. decimal digits → the integer they spell;
//! 2. `0x`-prefixed hex → the integer it spells (at most 32 bytes);
//! 3. anything else → UTF-8 text of at most 31 bytes, right-padded with
//!    zeros to 32 bytes and read big-endian (the Ethereum `bytes32` string
//!    encoding).
//!
//! The canonical string form is the decimal integer, which is what
//! generated proof records store.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;

use crate::error::SignalError;

/// Maximum UTF-8 length of a text signal (one byte is reserved for the
/// terminating zero of the `bytes32` string encoding).
pub const MAX_TEXT_SIGNAL_BYTES: usize = 31;

/// A 256-bit message or scope value in big-endian form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signal([u8; 32]);

impl Signal {
    /// Parse a record string into a signal.
    pub fn parse(s: &str) -> Result<Self, SignalError> {
        if s.is_empty() {
            return Err(SignalError::Empty);
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            let value = BigUint::parse_bytes(s.as_bytes(), 10).ok_or(SignalError::TooLarge)?;
            return Self::from_biguint(&value);
        }
        if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(SignalError::InvalidHex(s.to_string()));
            }
            let value = BigUint::parse_bytes(digits.as_bytes(), 16)
                .ok_or_else(|| SignalError::InvalidHex(s.to_string()))?;
            return Self::from_biguint(&value);
        }
        Self::from_text(s)
    }

    /// Encode text as a right-padded `bytes32` string.
    pub fn from_text(s: &str) -> Result<Self, SignalError> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_TEXT_SIGNAL_BYTES {
            return Err(SignalError::TextTooLong(bytes.len()));
        }
        let mut out = [0u8; 32];
        out[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Convert an integer of at most 256 bits.
    pub fn from_biguint(value: &BigUint) -> Result<Self, SignalError> {
        let raw = value.to_bytes_be();
        if raw.len() > 32 {
            return Err(SignalError::TooLarge);
        }
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        Ok(Self(out))
    }

    /// Build a signal directly from its 32-byte big-endian form.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The 32-byte big-endian form hashed by the domain hash.
    pub fn as_be_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Canonical decimal string.
    pub fn to_decimal(&self) -> String {
        BigUint::from_bytes_be(&self.0).to_string()
    }
}

impl From<u64> for Signal {
    fn from(value: u64) -> Self {
        let mut out = [0u8; 32];
        out[24..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }
}

impl FromStr for Signal {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signal(0x{})", hex::encode(self.0))
    }
}
