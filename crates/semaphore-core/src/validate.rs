//! # Input Validator
//!
//! The single boundary at which a [`SemaphoreProof`] record is checked and
//! turned into typed values. Validation is pure: no I/O, no artifact lookup,
//! no backend call. It fails fast on the first offending field.
//!
//! ## Checks, in order
//!
//! 1. `MIN_DEPTH <= merkleTreeDepth <= MAX_DEPTH`
//! 2. `merkleTreeRoot` and `nullifier` are non-empty scalar-field elements
//! 3. `message` and `scope` are non-empty signals
//! 4. `proof` is non-empty
//! 5. a non-empty `publicInputs` holds four scalar-field elements
//!
//! A well-formed `publicInputs` that disagrees with the vector derived from
//! the record is not a validation error. It is kept on the
//! [`ValidatedProof`] so that verification can report the record as
//! invalid: a record displaying one binding never verifies under another.

use crate::constants::{is_supported_depth, MAX_DEPTH, MIN_DEPTH};
use crate::error::ValidationError;
use crate::field::FieldElement;
use crate::proof::SemaphoreProof;
use crate::public_inputs::PublicInputs;
use crate::signal::Signal;

/// A record that passed validation, with every value in typed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProof {
    /// Tree depth, within `[MIN_DEPTH, MAX_DEPTH]`.
    pub merkle_tree_depth: u32,
    /// Parsed message.
    pub message: Signal,
    /// Parsed scope.
    pub scope: Signal,
    /// Canonical public inputs derived from the record.
    pub public_inputs: PublicInputs,
    /// The record's own `publicInputs`, when it carried any.
    pub supplied_public_inputs: Option<PublicInputs>,
    /// Backend-encoded proof bytes.
    pub proof: Vec<u8>,
}

impl ValidatedProof {
    /// Position of the first supplied public input that disagrees with the
    /// derived vector.
    pub fn public_inputs_mismatch(&self) -> Option<usize> {
        let supplied = self.supplied_public_inputs?;
        self.public_inputs.first_mismatch(&supplied.to_array())
    }
}

/// Reject depths without a compiled circuit.
pub fn check_depth(depth: u64, field: &str) -> Result<u32, ValidationError> {
    if !is_supported_depth(depth) {
        return Err(ValidationError::DepthOutOfRange {
            field: field.to_string(),
            depth,
            min: MIN_DEPTH,
            max: MAX_DEPTH,
        });
    }
    // In range, so it fits.
    Ok(depth as u32)
}

/// Parse a non-empty field-element string.
pub fn parse_field(value: &str, field: &str) -> Result<FieldElement, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    FieldElement::parse(value).map_err(|e| ValidationError::Malformed {
        field: field.to_string(),
        kind: "field element",
        reason: e.to_string(),
    })
}

/// Parse a non-empty signal string.
pub fn parse_signal(value: &str, field: &str) -> Result<Signal, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    Signal::parse(value).map_err(|e| ValidationError::Malformed {
        field: field.to_string(),
        kind: "signal",
        reason: e.to_string(),
    })
}

/// Validate a proof record.
pub fn validate(record: &SemaphoreProof) -> Result<ValidatedProof, ValidationError> {
    let merkle_tree_depth =
        check_depth(u64::from(record.merkle_tree_depth), "proof.merkleTreeDepth")?;
    let merkle_tree_root = parse_field(&record.merkle_tree_root, "proof.merkleTreeRoot")?;
    let nullifier = parse_field(&record.nullifier, "proof.nullifier")?;
    let message = parse_signal(&record.message, "proof.message")?;
    let scope = parse_signal(&record.scope, "proof.scope")?;

    if record.proof.is_empty() {
        return Err(ValidationError::Empty {
            field: "proof.proof".to_string(),
        });
    }

    let public_inputs = PublicInputs::derive(&scope, &message, merkle_tree_root, nullifier);

    let supplied_public_inputs = if record.public_inputs.is_empty() {
        None
    } else {
        let supplied = record
            .public_inputs
            .iter()
            .map(|s| parse_field(s, "proof.publicInputs"))
            .collect::<Result<Vec<_>, _>>()?;
        Some(PublicInputs::from_slice(&supplied)?)
    };

    Ok(ValidatedProof {
        merkle_tree_depth,
        message,
        scope,
        public_inputs,
        supplied_public_inputs,
        proof: record.proof.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash;
    use proptest::prelude::*;

    fn record() -> SemaphoreProof {
        SemaphoreProof {
            merkle_tree_depth: 20,
            merkle_tree_root: "1000".to_string(),
            nullifier: "0x07d0".to_string(),
            message: "2".to_string(),
            scope: "1".to_string(),
            proof: vec![1, 2, 3],
            public_inputs: Vec::new(),
        }
    }

    #[test]
    fn test_valid_record_derives_public_inputs() {
        let validated = validate(&record()).unwrap();
        assert_eq!(validated.merkle_tree_depth, 20);
        assert_eq!(
            validated.public_inputs.to_array(),
            [
                hash(&Signal::from(1)),
                hash(&Signal::from(2)),
                FieldElement::from(1000u64),
                FieldElement::from(2000u64),
            ]
        );
    }

    #[test]
    fn test_depth_bounds() {
        for depth in [MIN_DEPTH, 20, MAX_DEPTH] {
            let mut r = record();
            r.merkle_tree_depth = depth;
            assert!(validate(&r).is_ok(), "depth {depth}");
        }
        for depth in [0, MAX_DEPTH + 1, u32::MAX] {
            let mut r = record();
            r.merkle_tree_depth = depth;
            let err = validate(&r).unwrap_err();
            assert!(matches!(err, ValidationError::DepthOutOfRange { .. }));
            assert_eq!(err.field(), "proof.merkleTreeDepth");
        }
    }

    #[test]
    fn test_empty_strings_name_field() {
        let cases: [(&str, fn(&mut SemaphoreProof)); 4] = [
            ("proof.merkleTreeRoot", |r| r.merkle_tree_root.clear()),
            ("proof.nullifier", |r| r.nullifier.clear()),
            ("proof.message", |r| r.message.clear()),
            ("proof.scope", |r| r.scope.clear()),
        ];
        for (field, mutate) in cases {
            let mut r = record();
            mutate(&mut r);
            let err = validate(&r).unwrap_err();
            assert_eq!(err, ValidationError::Empty { field: field.to_string() });
        }
    }

    #[test]
    fn test_root_outside_field_rejected() {
        let mut r = record();
        r.merkle_tree_root = crate::field::scalar_modulus().to_string();
        let err = validate(&r).unwrap_err();
        assert_eq!(err.field(), "proof.merkleTreeRoot");
    }

    #[test]
    fn test_empty_proof_rejected() {
        let mut r = record();
        r.proof.clear();
        assert_eq!(validate(&r).unwrap_err().field(), "proof.proof");
    }

    #[test]
    fn test_matching_public_inputs_accepted() {
        let mut r = record();
        let derived = validate(&r).unwrap().public_inputs;
        r.public_inputs = derived.to_hex_strings();
        let validated = validate(&r).unwrap();
        assert_eq!(validated.supplied_public_inputs, Some(derived));
        assert_eq!(validated.public_inputs_mismatch(), None);

        // Decimal encodings of the same elements are equally acceptable.
        r.public_inputs = derived.to_array().iter().map(|f| f.to_decimal()).collect();
        assert_eq!(validate(&r).unwrap().public_inputs_mismatch(), None);
    }

    #[test]
    fn test_absent_public_inputs_have_no_mismatch() {
        let validated = validate(&record()).unwrap();
        assert_eq!(validated.supplied_public_inputs, None);
        assert_eq!(validated.public_inputs_mismatch(), None);
    }

    #[test]
    fn test_reordered_public_inputs_are_reported_not_rejected() {
        let mut r = record();
        let mut strings = validate(&r).unwrap().public_inputs.to_hex_strings();
        strings.swap(0, 1);
        r.public_inputs = strings;
        assert_eq!(validate(&r).unwrap().public_inputs_mismatch(), Some(0));
    }

    #[test]
    fn test_changed_scope_keeps_supplied_vector() {
        let mut r = record();
        r.public_inputs = validate(&r).unwrap().public_inputs.to_hex_strings();
        r.scope = "3".to_string();
        let validated = validate(&r).unwrap();
        assert_eq!(validated.public_inputs.scope_hash, hash(&Signal::from(3)));
        assert_eq!(validated.public_inputs_mismatch(), Some(0));
    }

    #[test]
    fn test_truncated_public_inputs_rejected() {
        let mut r = record();
        let mut strings = validate(&r).unwrap().public_inputs.to_hex_strings();
        strings.pop();
        r.public_inputs = strings;
        assert!(matches!(
            validate(&r).unwrap_err(),
            ValidationError::PublicInputCount { expected: 4, actual: 3, .. }
        ));
    }

    #[test]
    fn test_unparseable_public_input_rejected() {
        let mut r = record();
        r.public_inputs = vec!["1".into(), "2".into(), "x".into(), "4".into()];
        let err = validate(&r).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed { .. }));
        assert_eq!(err.field(), "proof.publicInputs");
    }

    proptest! {
        #[test]
        fn out_of_range_depth_always_rejected(depth in (MAX_DEPTH + 1)..=u32::MAX) {
            let mut r = record();
            r.merkle_tree_depth = depth;
            let is_range_error = matches!(validate(&r), Err(ValidationError::DepthOutOfRange { .. }));
            prop_assert!(is_range_error);
        }
    }
}
