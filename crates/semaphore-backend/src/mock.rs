//! # Mock Engine
//!
//! A deterministic, transparent stand-in for the membership circuit. It
//! evaluates the circuit's relations directly with keccak in place of the
//! circuit's hash, and its "proof" is a keccak commitment to the artifact
//! and the public inputs:
//!
//! ```text
//! commitment = H(TAG_COMMITMENT, secret)
//! node'      = H(node, sibling)  or  H(sibling, node)   (index bit 0 / 1)
//! nullifier  = H(TAG_NULLIFIER, hash(scope), secret)
//! proof      = keccak(TAG_PROOF || sha256(bytecode) || public inputs)
//! ```
//!
//! `H` is keccak over 32-byte big-endian words, reduced into the field.
//! [`MockGroup`] builds trees with the same node hash, so mock proofs
//! generated against a mock group verify.
//!
//! ## Security Notice
//!
//! Mock proofs provide NO soundness and NO zero-knowledge: anyone can
//! compute a proof for any public inputs. Use only in tests and local
//! tooling.

use std::sync::Arc;

use semaphore_artifacts::CircuitArtifact;
use semaphore_core::{
    keccak256, CircuitInputs, FieldElement, Group, Identity, MerkleProof, PublicInputs,
    ValidationError,
};

use crate::traits::{BackendError, BackendInstance, BackendOptions, ProofData, ProvingEngine};

const TAG_COMMITMENT: &[u8] = b"semaphore-mock/commitment";
const TAG_NULLIFIER: &[u8] = b"semaphore-mock/nullifier";
const TAG_PROOF: &[u8] = b"semaphore-mock/proof";

/// Length of a mock proof.
pub const MOCK_PROOF_LEN: usize = 32;

fn field_hash(tag: &[u8], words: &[FieldElement]) -> FieldElement {
    let mut buf = Vec::with_capacity(tag.len() + 32 * words.len());
    buf.extend_from_slice(tag);
    for word in words {
        buf.extend_from_slice(&word.to_be_bytes());
    }
    FieldElement::from_be_bytes_mod_order(&keccak256(&buf))
}

/// Node hash of mock Merkle trees.
pub fn mock_node_hash(left: FieldElement, right: FieldElement) -> FieldElement {
    field_hash(&[], &[left, right])
}

/// The identity commitment the mock circuit derives from a secret.
pub fn mock_commitment(secret: FieldElement) -> FieldElement {
    field_hash(TAG_COMMITMENT, &[secret])
}

/// A mock identity for `secret`.
pub fn mock_identity(secret: u64) -> Identity {
    let secret_scalar = FieldElement::from(secret);
    Identity {
        secret_scalar,
        commitment: mock_commitment(secret_scalar),
    }
}

fn mock_nullifier(scope_hash: FieldElement, secret: FieldElement) -> FieldElement {
    field_hash(TAG_NULLIFIER, &[scope_hash, secret])
}

fn mock_proof(artifact: &CircuitArtifact, public_inputs: &[FieldElement]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(TAG_PROOF.len() + 32 + 32 * public_inputs.len());
    buf.extend_from_slice(TAG_PROOF);
    buf.extend_from_slice(&artifact.digest());
    for input in public_inputs {
        buf.extend_from_slice(&input.to_be_bytes());
    }
    keccak256(&buf).to_vec()
}

/// Mock proving engine.
#[derive(Debug, Default, Clone)]
pub struct MockEngine;

/// A circuit loaded into the mock engine.
#[derive(Debug)]
pub struct MockInstance {
    artifact: Arc<CircuitArtifact>,
}

impl ProvingEngine for MockEngine {
    type Instance = MockInstance;

    async fn load(
        &self,
        artifact: Arc<CircuitArtifact>,
        _options: &BackendOptions,
    ) -> Result<MockInstance, BackendError> {
        if artifact.bytecode.is_empty() {
            return Err(BackendError::Load("empty bytecode".to_string()));
        }
        Ok(MockInstance { artifact })
    }
}

impl BackendInstance for MockInstance {
    async fn verify(
        &self,
        proof: &[u8],
        public_inputs: &PublicInputs,
    ) -> Result<bool, BackendError> {
        if proof.len() != MOCK_PROOF_LEN {
            return Err(BackendError::MalformedProof(format!(
                "mock proofs are {MOCK_PROOF_LEN} bytes, got {}",
                proof.len()
            )));
        }
        Ok(proof == mock_proof(&self.artifact, &public_inputs.to_array()).as_slice())
    }

    async fn prove(&self, inputs: &CircuitInputs) -> Result<ProofData, BackendError> {
        if inputs.depth() != self.artifact.depth {
            return Err(BackendError::Unsupported(format!(
                "inputs padded to depth {} for a depth-{} circuit",
                inputs.depth(),
                self.artifact.depth
            )));
        }

        let length = inputs.merkle_proof_length as usize;
        let mut node = mock_commitment(inputs.secret);
        for (sibling, bit) in inputs
            .merkle_proof_siblings
            .iter()
            .zip(&inputs.merkle_proof_indices)
            .take(length)
        {
            node = if *bit == 0 {
                mock_node_hash(node, *sibling)
            } else {
                mock_node_hash(*sibling, node)
            };
        }

        let public_inputs = vec![
            inputs.scope,
            inputs.message,
            node,
            mock_nullifier(inputs.scope, inputs.secret),
        ];
        Ok(ProofData {
            proof: mock_proof(&self.artifact, &public_inputs),
            public_inputs,
        })
    }
}

/// A fixed group hashed with [`mock_node_hash`].
///
/// Leaves are padded with zeros to the next power of two; the tree depth is
/// the number of levels above the leaves (zero for a single member).
#[derive(Debug, Clone)]
pub struct MockGroup {
    levels: Vec<Vec<FieldElement>>,
}

impl MockGroup {
    /// Build a group over `members`. An empty group has a zero root.
    pub fn new(members: impl IntoIterator<Item = FieldElement>) -> Self {
        let mut leaves: Vec<FieldElement> = members.into_iter().collect();
        if leaves.is_empty() {
            return Self {
                levels: vec![vec![FieldElement::zero()]],
            };
        }
        leaves.resize(leaves.len().next_power_of_two(), FieldElement::zero());

        let mut levels = vec![leaves];
        while let Some(level) = levels.last().filter(|l| l.len() > 1) {
            let parent = level
                .chunks(2)
                .map(|pair| mock_node_hash(pair[0], pair[1]))
                .collect();
            levels.push(parent);
        }
        Self { levels }
    }

    /// Levels above the leaves.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }
}

impl Group for MockGroup {
    fn root(&self) -> FieldElement {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_else(FieldElement::zero)
    }

    fn index_of(&self, commitment: &FieldElement) -> Option<u64> {
        self.levels
            .first()?
            .iter()
            .position(|leaf| leaf == commitment && *leaf != FieldElement::zero())
            .map(|i| i as u64)
    }

    fn generate_merkle_proof(&self, index: u64) -> Result<MerkleProof, ValidationError> {
        let leaves = &self.levels[0];
        let position = usize::try_from(index)
            .ok()
            .filter(|i| *i < leaves.len())
            .ok_or_else(|| ValidationError::Membership {
                field: "group".to_string(),
                reason: format!("no leaf at index {index}"),
            })?;

        let siblings = self.levels[..self.depth()]
            .iter()
            .enumerate()
            .map(|(level, nodes)| nodes[(position >> level) ^ 1])
            .collect();
        Ok(MerkleProof {
            root: self.root(),
            leaf: leaves[position],
            index,
            siblings,
        })
    }
}
