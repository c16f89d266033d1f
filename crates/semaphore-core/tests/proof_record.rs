//! # Proof Record Boundary Tests
//!
//! Exercises the path an untrusted JSON proof takes through this crate:
//! shape checks, validation, public-input derivation and packing. The
//! vectors below are fixed so that any change to the domain hash or to the
//! public-input order shows up as a failing test.

use semaphore_core::{
    hash, keccak256, pack_proof, unpack_proof, validate, FieldElement, PackError,
    PublicInputs, SemaphoreProof, Signal, ValidationError,
};
use serde_json::json;

fn sample() -> serde_json::Value {
    json!({
        "merkleTreeDepth": 20,
        "merkleTreeRoot": "9876543210",
        "nullifier": "1234567890",
        "message": "2",
        "scope": "1",
        "proof": "0x0102030405",
        "publicInputs": []
    })
}

#[test]
fn test_hash_of_one_is_keccak_of_bytes32_reduced() {
    let mut word = [0u8; 32];
    word[31] = 1;
    let expected = FieldElement::from_be_bytes_mod_order(&keccak256(&word));
    assert_eq!(hash(&Signal::from(1)), expected);
}

#[test]
fn test_json_to_public_inputs() {
    let record = SemaphoreProof::from_json(&sample()).unwrap();
    let validated = validate(&record).unwrap();

    let expected = [
        hash(&Signal::from(1)),
        hash(&Signal::from(2)),
        FieldElement::from(9_876_543_210u64),
        FieldElement::from(1_234_567_890u64),
    ];
    assert_eq!(validated.public_inputs.to_array(), expected);
}

#[test]
fn test_scope_and_message_are_not_interchangeable() {
    let mut swapped = sample();
    swapped["message"] = json!("1");
    swapped["scope"] = json!("2");

    let a = validate(&SemaphoreProof::from_json(&sample()).unwrap()).unwrap();
    let b = validate(&SemaphoreProof::from_json(&swapped).unwrap()).unwrap();
    assert_ne!(a.public_inputs, b.public_inputs);
}

#[test]
fn test_depth_zero_named_in_error() {
    let mut value = sample();
    value["merkleTreeDepth"] = json!(0);
    let record = SemaphoreProof::from_json(&value).unwrap();
    let err = validate(&record).unwrap_err();
    assert_eq!(err.field(), "proof.merkleTreeDepth");
    assert!(err.to_string().contains("between 1 and 32"));
}

#[test]
fn test_depth_beyond_u32_rejected_at_shape_check() {
    let mut value = sample();
    value["merkleTreeDepth"] = json!(u64::MAX);
    let err = SemaphoreProof::from_json(&value).unwrap_err();
    assert!(matches!(err, ValidationError::DepthOutOfRange { .. }));
}

#[test]
fn test_mismatched_public_inputs_are_flagged() {
    let record = SemaphoreProof::from_json(&sample()).unwrap();
    let mut derived = validate(&record).unwrap().public_inputs;
    derived.nullifier = FieldElement::from(1u64);

    let mut tampered = record;
    tampered.public_inputs = derived.to_hex_strings();
    let validated = validate(&tampered).unwrap();
    assert_eq!(validated.public_inputs_mismatch(), Some(3));
    assert!(matches!(
        pack_proof(&tampered),
        Err(PackError::Invalid(ValidationError::PublicInputsMismatch { index: 3, .. }))
    ));
}

#[test]
fn test_short_public_inputs_rejected() {
    let mut value = sample();
    value["publicInputs"] = json!(["1", "2"]);
    let record = SemaphoreProof::from_json(&value).unwrap();
    let err = validate(&record).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::PublicInputCount { expected: 4, actual: 2, .. }
    ));
}

#[test]
fn test_packed_record_keeps_binding() {
    let record = SemaphoreProof::from_json(&sample()).unwrap();
    let unpacked = unpack_proof(&pack_proof(&record).unwrap()).unwrap();

    assert_eq!(unpacked.merkle_tree_root, record.merkle_tree_root);
    assert_eq!(unpacked.proof, record.proof);
    let validated = validate(&unpacked).unwrap();
    assert_eq!(
        validated.public_inputs,
        PublicInputs::derive(
            &Signal::from(1),
            &Signal::from(2),
            FieldElement::from(9_876_543_210u64),
            FieldElement::from(1_234_567_890u64),
        )
    );
}
