//! # Domain Hash
//!
//! `hash(x) = keccak256(bytes32_be(x)) mod r`
//!
//! The scope and message are public inputs of the circuit only through this
//! hash, so it must agree bit-for-bit with what proof generators computed:
//! the same primitive (Keccak-256, not SHA3-256), the same serialization
//! (the 32-byte big-endian signal) and the same reduction (modulo the BN254
//! scalar field order). Keccak is also the oracle hash the backend is
//! configured with, see `semaphore-backend`.

use sha3::{Digest, Keccak256};

use crate::error::SignalError;
use crate::field::FieldElement;
use crate::signal::Signal;

/// Raw Keccak-256 digest of a byte string.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let digest = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Hash a signal into the scalar field.
pub fn hash(signal: &Signal) -> FieldElement {
    FieldElement::from_be_bytes_mod_order(&keccak256(signal.as_be_bytes()))
}

/// Parse a record string as a signal and hash it.
pub fn hash_str(value: &str) -> Result<FieldElement, SignalError> {
    Ok(hash(&Signal::parse(value)?))
}
