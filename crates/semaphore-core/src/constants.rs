//! Protocol constants shared by every crate in the workspace.

/// Smallest Merkle tree depth with a compiled circuit.
pub const MIN_DEPTH: u32 = 1;

/// Largest Merkle tree depth with a compiled circuit.
pub const MAX_DEPTH: u32 = 32;

/// Number of public inputs exposed by the membership circuit:
/// `[hash(scope), hash(message), merkleTreeRoot, nullifier]`.
pub const PUBLIC_INPUT_COUNT: usize = 4;

/// Whether `depth` has a compiled circuit.
pub fn is_supported_depth(depth: u64) -> bool {
    (u64::from(MIN_DEPTH)..=u64::from(MAX_DEPTH)).contains(&depth)
}
