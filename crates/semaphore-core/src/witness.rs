//! # Witness Assembly
//!
//! Proof generation combines a private identity, a Merkle membership path,
//! a scope and a message into the circuit's input map. The identity and the
//! membership path are supplied by the caller: this crate does not build
//! Merkle trees or derive identities, it only lays their values out the way
//! the circuit expects.
//!
//! ## Layout
//!
//! The circuit is compiled for a fixed depth `d`. Paths shorter than `d` are
//! padded: siblings with zero, index bits with zero. The real path length is
//! passed separately as `merkle_proof_length`.

use serde::Serialize;

use crate::constants::MIN_DEPTH;
use crate::error::ValidationError;
use crate::field::FieldElement;
use crate::hash::hash;
use crate::signal::Signal;
use crate::validate::check_depth;

/// The private half of a Semaphore identity, plus its public commitment.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    /// Secret scalar known only to the member.
    pub secret_scalar: FieldElement,
    /// Public leaf value registered in groups.
    pub commitment: FieldElement,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("secret_scalar", &"[REDACTED]")
            .field("commitment", &self.commitment)
            .finish()
    }
}

/// A membership path from a leaf to the group root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    /// Root the path leads to.
    pub root: FieldElement,
    /// The leaf (an identity commitment).
    pub leaf: FieldElement,
    /// Leaf position; bit `i` selects the side at level `i`.
    pub index: u64,
    /// Sibling hashes from the leaf level upwards.
    pub siblings: Vec<FieldElement>,
}

/// A group of identity commitments able to produce membership paths.
///
/// Tree construction and hashing belong to the implementor.
pub trait Group: Send + Sync {
    /// Current root.
    fn root(&self) -> FieldElement;

    /// Position of `commitment`, if it is a member.
    fn index_of(&self, commitment: &FieldElement) -> Option<u64>;

    /// Membership path for the leaf at `index`.
    fn generate_merkle_proof(&self, index: u64) -> Result<MerkleProof, ValidationError>;
}

/// Either a group to look the identity up in, or a precomputed path.
pub enum Membership<'a> {
    /// Look the identity's commitment up in this group.
    Group(&'a dyn Group),
    /// Use this path as is.
    Proof(MerkleProof),
}

impl Membership<'_> {
    /// Resolve to a path for `identity`.
    pub fn merkle_proof(self, identity: &Identity) -> Result<MerkleProof, ValidationError> {
        match self {
            Membership::Group(group) => {
                let index =
                    group
                        .index_of(&identity.commitment)
                        .ok_or_else(|| ValidationError::Membership {
                            field: "group".to_string(),
                            reason: "the identity is not a member of the group".to_string(),
                        })?;
                group.generate_merkle_proof(index)
            }
            Membership::Proof(proof) => Ok(proof),
        }
    }
}

impl From<MerkleProof> for Membership<'_> {
    fn from(proof: MerkleProof) -> Self {
        Membership::Proof(proof)
    }
}

impl<'a, G: Group> From<&'a G> for Membership<'a> {
    fn from(group: &'a G) -> Self {
        Membership::Group(group)
    }
}

/// The circuit's input map. Field names follow the circuit's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitInputs {
    /// The identity's secret scalar.
    #[serde(rename = "secret_key")]
    pub secret: FieldElement,
    /// Real length of the membership path.
    pub merkle_proof_length: u32,
    /// Leaf index bits, least significant first, padded to the depth.
    #[serde(rename = "index_bits")]
    pub merkle_proof_indices: Vec<u8>,
    /// Siblings, zero-padded to the depth.
    #[serde(rename = "hash_path")]
    pub merkle_proof_siblings: Vec<FieldElement>,
    /// `hash(scope)`.
    #[serde(rename = "hashed_scope")]
    pub scope: FieldElement,
    /// `hash(message)`.
    #[serde(rename = "hashed_message")]
    pub message: FieldElement,
}

impl CircuitInputs {
    /// The depth these inputs were padded to.
    pub fn depth(&self) -> u32 {
        self.merkle_proof_siblings.len() as u32
    }
}

/// Choose the circuit depth: an explicit depth must be supported, otherwise
/// the path length is used (and `1` for a single-member group, whose path is
/// empty).
pub fn resolve_depth(requested: Option<u32>, path_length: usize) -> Result<u32, ValidationError> {
    match requested {
        Some(depth) => check_depth(u64::from(depth), "merkleTreeDepth"),
        None if path_length == 0 => Ok(MIN_DEPTH),
        None => check_depth(path_length as u64, "merkleTreeDepth"),
    }
}

/// Lay out the circuit inputs for `identity` proving membership via
/// `merkle_proof`, signaling `message` within `scope`.
///
/// # Errors
///
/// A [`ValidationError`] when the depth is unsupported, the path does not
/// fit the depth, or the path's leaf is not the identity's commitment.
pub fn generate_inputs(
    identity: &Identity,
    merkle_proof: &MerkleProof,
    message: &Signal,
    scope: &Signal,
    merkle_tree_depth: Option<u32>,
) -> Result<CircuitInputs, ValidationError> {
    let depth = resolve_depth(merkle_tree_depth, merkle_proof.siblings.len())?;
    let path_length = merkle_proof.siblings.len();

    if merkle_proof.leaf != identity.commitment {
        return Err(ValidationError::Membership {
            field: "merkleProof.leaf".to_string(),
            reason: "the leaf is not the identity commitment".to_string(),
        });
    }
    if path_length > depth as usize {
        return Err(ValidationError::Membership {
            field: "merkleTreeDepth".to_string(),
            reason: format!("a path of length {path_length} does not fit a tree of depth {depth}"),
        });
    }
    if merkle_proof.index >> depth != 0 {
        return Err(ValidationError::Membership {
            field: "merkleProof.index".to_string(),
            reason: format!("index {} does not fit a tree of depth {depth}", merkle_proof.index),
        });
    }

    let mut siblings = merkle_proof.siblings.clone();
    siblings.resize(depth as usize, FieldElement::zero());

    let indices = (0..depth)
        .map(|level| ((merkle_proof.index >> level) & 1) as u8)
        .collect();

    Ok(CircuitInputs {
        secret: identity.secret_scalar,
        merkle_proof_length: path_length as u32,
        merkle_proof_indices: indices,
        merkle_proof_siblings: siblings,
        scope: hash(scope),
        message: hash(message),
    })
}
