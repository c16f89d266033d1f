//! # Public-Input Assembly
//!
//! The membership circuit exposes exactly four public inputs, in this order:
//!
//! ```text
//! [ hash(scope), hash(message), merkleTreeRoot, nullifier ]
//! ```
//!
//! The order is a contract with the compiled circuit (its public parameters
//! come first, then its public return values), not a naming convention.
//! A reordered vector does not raise an error anywhere: the backend simply
//! rejects every proof. All assembly therefore goes through
//! [`PublicInputs::to_array`].

use crate::constants::PUBLIC_INPUT_COUNT;
use crate::error::ValidationError;
use crate::field::FieldElement;
use crate::hash::hash;
use crate::signal::Signal;

/// The circuit's public inputs, held by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicInputs {
    /// `hash(scope)`.
    pub scope_hash: FieldElement,
    /// `hash(message)`.
    pub message_hash: FieldElement,
    /// Root of the group's Merkle tree.
    pub merkle_tree_root: FieldElement,
    /// Nullifier for (identity, scope).
    pub nullifier: FieldElement,
}

impl PublicInputs {
    /// Hash scope and message and combine them with root and nullifier.
    pub fn derive(
        scope: &Signal,
        message: &Signal,
        merkle_tree_root: FieldElement,
        nullifier: FieldElement,
    ) -> Self {
        Self {
            scope_hash: hash(scope),
            message_hash: hash(message),
            merkle_tree_root,
            nullifier,
        }
    }

    /// The vector in circuit order.
    pub fn to_array(&self) -> [FieldElement; PUBLIC_INPUT_COUNT] {
        [
            self.scope_hash,
            self.message_hash,
            self.merkle_tree_root,
            self.nullifier,
        ]
    }

    /// The vector in circuit order, each element as `0x` + 64 hex digits.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.to_array().iter().map(FieldElement::to_hex).collect()
    }

    /// Rebuild from a circuit-ordered vector, e.g. the public inputs a
    /// backend reports after proving.
    pub fn from_slice(values: &[FieldElement]) -> Result<Self, ValidationError> {
        match values {
            [scope_hash, message_hash, merkle_tree_root, nullifier] => Ok(Self {
                scope_hash: *scope_hash,
                message_hash: *message_hash,
                merkle_tree_root: *merkle_tree_root,
                nullifier: *nullifier,
            }),
            _ => Err(ValidationError::PublicInputCount {
                field: "proof.publicInputs".to_string(),
                expected: PUBLIC_INPUT_COUNT,
                actual: values.len(),
            }),
        }
    }

    /// Position of the first element of `supplied` that differs from this
    /// vector, or `None` when they are identical.
    pub fn first_mismatch(&self, supplied: &[FieldElement]) -> Option<usize> {
        let expected = self.to_array();
        expected
            .iter()
            .zip(supplied)
            .position(|(a, b)| a != b)
            .or_else(|| (supplied.len() != expected.len()).then(|| supplied.len().min(expected.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_scope_message_root_nullifier() {
        let root = FieldElement::from(1000u64);
        let nullifier = FieldElement::from(2000u64);
        let scope = Signal::from(1);
        let message = Signal::from(2);
        let inputs = PublicInputs::derive(&scope, &message, root, nullifier);

        assert_eq!(
            inputs.to_array(),
            [hash(&scope), hash(&message), root, nullifier]
        );
    }

    #[test]
    fn test_order_does_not_depend_on_field_names() {
        // Swapping scope and message must swap the first two positions.
        let root = FieldElement::from(7u64);
        let nullifier = FieldElement::from(9u64);
        let a = PublicInputs::derive(&Signal::from(1), &Signal::from(2), root, nullifier);
        let b = PublicInputs::derive(&Signal::from(2), &Signal::from(1), root, nullifier);
        assert_eq!(a.to_array()[0], b.to_array()[1]);
        assert_eq!(a.to_array()[1], b.to_array()[0]);
        assert_eq!(a.to_array()[2..], b.to_array()[2..]);
    }

    #[test]
    fn test_hex_strings_are_fixed_width() {
        let inputs = PublicInputs::derive(
            &Signal::from(1),
            &Signal::from(2),
            FieldElement::from(3u64),
            FieldElement::from(4u64),
        );
        let strings = inputs.to_hex_strings();
        assert_eq!(strings.len(), PUBLIC_INPUT_COUNT);
        assert!(strings.iter().all(|s| s.len() == 66 && s.starts_with("0x")));
        assert_eq!(
            strings[3],
            "0x0000000000000000000000000000000000000000000000000000000000000004"
        );
    }

    #[test]
    fn test_from_slice_roundtrip_and_length_check() {
        let inputs = PublicInputs::derive(
            &Signal::from(5),
            &Signal::from(6),
            FieldElement::from(7u64),
            FieldElement::from(8u64),
        );
        assert_eq!(PublicInputs::from_slice(&inputs.to_array()).unwrap(), inputs);
        assert_eq!(
            PublicInputs::from_slice(&inputs.to_array()[..3]),
            Err(ValidationError::PublicInputCount {
                field: "proof.publicInputs".to_string(),
                expected: PUBLIC_INPUT_COUNT,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_first_mismatch() {
        let inputs = PublicInputs::derive(
            &Signal::from(1),
            &Signal::from(2),
            FieldElement::from(3u64),
            FieldElement::from(4u64),
        );
        let mut values = inputs.to_array().to_vec();
        assert_eq!(inputs.first_mismatch(&values), None);
        values[2] = FieldElement::from(99u64);
        assert_eq!(inputs.first_mismatch(&values), Some(2));
        values.truncate(2);
        assert_eq!(inputs.first_mismatch(&values), Some(2));
    }
}
