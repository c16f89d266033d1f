//! # Proof Requests
//!
//! The JSON document read by `semaphore prove` and `semaphore inputs`:
//!
//! ```json
//! {
//!   "identity": { "secret": "42", "commitment": "0x..." },
//!   "merkleProof": { "root": "...", "leaf": "...", "index": 3, "siblings": ["..."] },
//!   "message": "2",
//!   "scope": "1",
//!   "merkleTreeDepth": 20
//! }
//! ```
//!
//! Instead of `merkleProof`, a request may list the group's `members`; the
//! path is then built with the mock engine's tree hash, so `members` only
//! makes sense together with `--backend mock`. For the same reason
//! `identity.commitment` may be omitted only with the mock engine.

use anyhow::{bail, Result};
use serde::Deserialize;

use semaphore_backend::{mock_commitment, MockGroup};
use semaphore_core::{FieldElement, Identity, MerkleProof};

use crate::settings::BackendKind;

/// Identity fields of a request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityInput {
    /// Secret scalar.
    pub secret: FieldElement,
    /// Identity commitment.
    #[serde(default)]
    pub commitment: Option<FieldElement>,
}

/// Membership path fields of a request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MerkleProofInput {
    /// Group root.
    pub root: FieldElement,
    /// The identity commitment.
    pub leaf: FieldElement,
    /// Leaf position.
    pub index: u64,
    /// Sibling hashes, leaf level first.
    #[serde(default)]
    pub siblings: Vec<FieldElement>,
}

/// A proof generation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProveRequest {
    /// The proving identity.
    pub identity: IdentityInput,
    /// Message to signal.
    pub message: String,
    /// Scope of the nullifier.
    pub scope: String,
    /// Circuit depth; defaults to the path length.
    #[serde(default)]
    pub merkle_tree_depth: Option<u32>,
    /// Precomputed membership path.
    #[serde(default)]
    pub merkle_proof: Option<MerkleProofInput>,
    /// Group members, for a path built with the mock tree hash.
    #[serde(default)]
    pub members: Option<Vec<FieldElement>>,
}

/// Where the membership path comes from.
#[derive(Debug)]
pub enum MembershipSource {
    /// A precomputed path.
    Path(MerkleProof),
    /// A group to look the identity up in.
    Group(MockGroup),
}

impl ProveRequest {
    /// Parse a request document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// The identity, deriving a mock commitment when allowed.
    pub fn identity(&self, backend: BackendKind) -> Result<Identity> {
        let secret_scalar = self.identity.secret;
        let commitment = match (self.identity.commitment, backend) {
            (Some(commitment), _) => commitment,
            (None, BackendKind::Mock) => mock_commitment(secret_scalar),
            (None, BackendKind::Bb) => bail!("identity.commitment is required with the bb backend"),
        };
        Ok(Identity {
            secret_scalar,
            commitment,
        })
    }

    /// The membership source. Exactly one of `merkleProof` and `members`
    /// must be present.
    pub fn membership(&self, backend: BackendKind) -> Result<MembershipSource> {
        match (&self.merkle_proof, &self.members) {
            (Some(p), None) => Ok(MembershipSource::Path(MerkleProof {
                root: p.root,
                leaf: p.leaf,
                index: p.index,
                siblings: p.siblings.clone(),
            })),
            (None, Some(members)) => {
                if backend != BackendKind::Mock {
                    bail!("members requires --backend mock; pass merkleProof instead");
                }
                Ok(MembershipSource::Group(MockGroup::new(members.iter().copied())))
            }
            (Some(_), Some(_)) => bail!("give either merkleProof or members, not both"),
            (None, None) => bail!("one of merkleProof or members is required"),
        }
    }
}
