//! # Proof Packing
//!
//! A compact binary form of a [`SemaphoreProof`] for storage and transport.
//! Every field element and signal is stored as 32 big-endian bytes; the
//! public inputs are not stored because they are derivable from the other
//! fields. The layout is the `bincode` encoding of [`PackedProof`].
//!
//! Unpacking yields canonical strings: decimal root, nullifier, message and
//! scope, and `0x` hex public inputs. A record that was already canonical
//! survives a pack/unpack cycle unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{PackError, ValidationError};
use crate::field::FieldElement;
use crate::proof::SemaphoreProof;
use crate::public_inputs::PublicInputs;
use crate::signal::Signal;
use crate::validate::{check_depth, validate};

/// Current packed layout version.
pub const PACKED_PROOF_VERSION: u8 = 1;

/// The packed layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedProof {
    /// Layout version, [`PACKED_PROOF_VERSION`].
    pub version: u8,
    /// Tree depth.
    pub merkle_tree_depth: u8,
    /// Root, 32 big-endian bytes.
    pub merkle_tree_root: [u8; 32],
    /// Nullifier, 32 big-endian bytes.
    pub nullifier: [u8; 32],
    /// Message signal, 32 big-endian bytes.
    pub message: [u8; 32],
    /// Scope signal, 32 big-endian bytes.
    pub scope: [u8; 32],
    /// Backend-encoded proof.
    pub proof: Vec<u8>,
}

/// Pack a proof record.
///
/// # Errors
///
/// [`PackError::Invalid`] if the record does not validate, or if its
/// supplied public inputs disagree with its other fields (the packed form
/// keeps only the latter).
pub fn pack_proof(record: &SemaphoreProof) -> Result<Vec<u8>, PackError> {
    let validated = validate(record)?;
    if let Some(index) = validated.public_inputs_mismatch() {
        return Err(PackError::Invalid(ValidationError::PublicInputsMismatch {
            field: "proof.publicInputs".to_string(),
            index,
        }));
    }
    let packed = PackedProof {
        version: PACKED_PROOF_VERSION,
        // Validated depths are at most 32.
        merkle_tree_depth: validated.merkle_tree_depth as u8,
        merkle_tree_root: validated.public_inputs.merkle_tree_root.to_be_bytes(),
        nullifier: validated.public_inputs.nullifier.to_be_bytes(),
        message: *validated.message.as_be_bytes(),
        scope: *validated.scope.as_be_bytes(),
        proof: validated.proof,
    };
    Ok(bincode::serialize(&packed)?)
}

/// Unpack bytes produced by [`pack_proof`].
///
/// # Errors
///
/// [`PackError::Codec`] for truncated or garbled input,
/// [`PackError::UnsupportedVersion`] for an unknown layout, and
/// [`PackError::Invalid`] when a stored value is out of range.
pub fn unpack_proof(bytes: &[u8]) -> Result<SemaphoreProof, PackError> {
    let packed: PackedProof = bincode::deserialize(bytes)?;
    if packed.version != PACKED_PROOF_VERSION {
        return Err(PackError::UnsupportedVersion(packed.version));
    }

    let depth = check_depth(u64::from(packed.merkle_tree_depth), "proof.merkleTreeDepth")?;
    let root = decode_field(&packed.merkle_tree_root, "proof.merkleTreeRoot")?;
    let nullifier = decode_field(&packed.nullifier, "proof.nullifier")?;
    let message = Signal::from_be_bytes(packed.message);
    let scope = Signal::from_be_bytes(packed.scope);
    let public_inputs = PublicInputs::derive(&scope, &message, root, nullifier);

    Ok(SemaphoreProof {
        merkle_tree_depth: depth,
        merkle_tree_root: root.to_decimal(),
        nullifier: nullifier.to_decimal(),
        message: message.to_decimal(),
        scope: scope.to_decimal(),
        proof: packed.proof,
        public_inputs: public_inputs.to_hex_strings(),
    })
}

fn decode_field(bytes: &[u8; 32], field: &str) -> Result<FieldElement, PackError> {
    FieldElement::from_be_bytes(bytes).map_err(|e| {
        PackError::Invalid(ValidationError::Malformed {
            field: field.to_string(),
            kind: "field element",
            reason: e.to_string(),
        })
    })
}
