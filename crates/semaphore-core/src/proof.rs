//! # The Semaphore Proof Record
//!
//! `SemaphoreProof` is the unit of verification: produced once by proof
//! generation, then serialized, transmitted and verified by any number of
//! independent verifiers. It is never mutated.
//!
//! ## Transport
//!
//! The JSON form uses camelCase keys (`merkleTreeDepth`, `publicInputs`, …)
//! and encodes `proof` as a `0x`-prefixed hex string. Untrusted JSON should
//! enter through [`SemaphoreProof::from_json`], which reports the exact
//! `proof.<field>` that is missing or mistyped instead of a generic serde
//! error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// A Semaphore membership proof plus the values it is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemaphoreProof {
    /// Depth of the tree the proof was generated for; selects the circuit.
    pub merkle_tree_depth: u32,
    /// Group root, a field element as a decimal or hex string.
    pub merkle_tree_root: String,
    /// Nullifier for (identity, scope), a field element string.
    pub nullifier: String,
    /// The signaled message (see [`Signal`](crate::Signal)).
    pub message: String,
    /// The scope partitioning nullifiers (see [`Signal`](crate::Signal)).
    pub scope: String,
    /// Backend-encoded proof bytes.
    #[serde(with = "proof_bytes")]
    pub proof: Vec<u8>,
    /// Field-element strings in circuit order, may be empty.
    #[serde(default)]
    pub public_inputs: Vec<String>,
}

impl SemaphoreProof {
    /// Build a record from untrusted JSON, checking presence and primitive
    /// shape of every field.
    ///
    /// Range and field-element checks are left to
    /// [`validate`](crate::validate::validate).
    ///
    /// # Errors
    ///
    /// The first offending field, in record order, as a [`ValidationError`]
    /// naming `proof.<field>` (or `semaphoreProof` for a non-object input).
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let obj = match value {
            Value::Null => {
                return Err(ValidationError::Missing {
                    field: "semaphoreProof".to_string(),
                })
            }
            Value::Object(obj) => obj,
            _ => {
                return Err(ValidationError::WrongType {
                    field: "semaphoreProof".to_string(),
                    expected: "an object",
                })
            }
        };

        Ok(Self {
            merkle_tree_depth: require_depth(obj, "merkleTreeDepth")?,
            merkle_tree_root: require_string(obj, "merkleTreeRoot")?,
            nullifier: require_string(obj, "nullifier")?,
            message: require_string(obj, "message")?,
            scope: require_string(obj, "scope")?,
            proof: require_bytes(obj, "proof")?,
            public_inputs: require_string_array(obj, "publicInputs")?,
        })
    }

    /// Parse a JSON document with [`SemaphoreProof::from_json`].
    pub fn from_json_str(s: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(s).map_err(|e| ValidationError::Malformed {
            field: "semaphoreProof".to_string(),
            kind: "JSON document",
            reason: e.to_string(),
        })?;
        Self::from_json(&value)
    }
}

fn field_name(name: &str) -> String {
    format!("proof.{name}")
}

fn require<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a Value, ValidationError> {
    match obj.get(name) {
        None | Some(Value::Null) => Err(ValidationError::Missing {
            field: field_name(name),
        }),
        Some(v) => Ok(v),
    }
}

/// Any JSON number with no fractional part, so `20` and `20.0` agree.
fn require_depth(obj: &Map<String, Value>, name: &str) -> Result<u32, ValidationError> {
    let value = require(obj, name)?;
    let depth = value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        })
        .ok_or_else(|| ValidationError::WrongType {
            field: field_name(name),
            expected: "a non-negative integer",
        })?;
    u32::try_from(depth).map_err(|_| ValidationError::DepthOutOfRange {
        field: field_name(name),
        depth,
        min: crate::MIN_DEPTH,
        max: crate::MAX_DEPTH,
    })
}

fn require_string(obj: &Map<String, Value>, name: &str) -> Result<String, ValidationError> {
    require(obj, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::WrongType {
            field: field_name(name),
            expected: "a string",
        })
}

fn require_bytes(obj: &Map<String, Value>, name: &str) -> Result<Vec<u8>, ValidationError> {
    let wrong_type = || ValidationError::WrongType {
        field: field_name(name),
        expected: "a byte array or hex string",
    };
    match require(obj, name)? {
        Value::String(s) => proof_bytes::decode_hex(s).map_err(|e| ValidationError::Malformed {
            field: field_name(name),
            kind: "hex byte string",
            reason: e.to_string(),
        }),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(wrong_type)
            })
            .collect(),
        _ => Err(wrong_type()),
    }
}

fn require_string_array(
    obj: &Map<String, Value>,
    name: &str,
) -> Result<Vec<String>, ValidationError> {
    let wrong_type = || ValidationError::WrongType {
        field: field_name(name),
        expected: "an array of strings",
    };
    require(obj, name)?
        .as_array()
        .ok_or_else(wrong_type)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(wrong_type))
        .collect()
}

/// Serde adapter: proof bytes as `0x` hex, accepting a plain byte array too.
pub(crate) mod proof_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Hex(String),
        Array(Vec<u8>),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => decode_hex(&s).map_err(serde::de::Error::custom),
            Repr::Array(bytes) => Ok(bytes),
        }
    }

    pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(s.strip_prefix("0x").unwrap_or(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> Value {
        json!({
            "merkleTreeDepth": 20,
            "merkleTreeRoot": "123",
            "nullifier": "456",
            "message": "2",
            "scope": "1",
            "proof": "0xdeadbeef",
            "publicInputs": []
        })
    }

    #[test]
    fn test_from_json_accepts_well_formed_record() {
        let proof = SemaphoreProof::from_json(&sample_json()).unwrap();
        assert_eq!(proof.merkle_tree_depth, 20);
        assert_eq!(proof.scope, "1");
        assert_eq!(proof.proof, vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(proof.public_inputs.is_empty());
    }

    #[test]
    fn test_missing_scope_names_field() {
        let mut value = sample_json();
        value.as_object_mut().unwrap().remove("scope");
        let err = SemaphoreProof::from_json(&value).unwrap_err();
        assert_eq!(err.field(), "proof.scope");
        assert!(matches!(err, ValidationError::Missing { .. }));
    }

    #[test]
    fn test_null_field_is_missing() {
        let mut value = sample_json();
        value["nullifier"] = Value::Null;
        let err = SemaphoreProof::from_json(&value).unwrap_err();
        assert_eq!(err.field(), "proof.nullifier");
    }

    #[test]
    fn test_wrong_types_name_field() {
        let cases = [
            ("merkleTreeDepth", json!("20")),
            ("merkleTreeDepth", json!(20.5)),
            ("merkleTreeRoot", json!(123)),
            ("message", json!(["2"])),
            ("proof", json!({"bytes": []})),
            ("proof", json!([1, 2, 300])),
            ("publicInputs", json!("0x01")),
            ("publicInputs", json!([1])),
        ];
        for (name, bad) in cases {
            let mut value = sample_json();
            value[name] = bad;
            let err = SemaphoreProof::from_json(&value).unwrap_err();
            assert_eq!(err.field(), format!("proof.{name}"), "case {name}");
        }
    }

    #[test]
    fn test_whole_float_depth_accepted() {
        let mut value = sample_json();
        value["merkleTreeDepth"] = json!(20.0);
        assert_eq!(SemaphoreProof::from_json(&value).unwrap().merkle_tree_depth, 20);

        value["merkleTreeDepth"] = json!(-1.0);
        let err = SemaphoreProof::from_json(&value).unwrap_err();
        assert_eq!(err.field(), "proof.merkleTreeDepth");
    }

    #[test]
    fn test_first_offending_field_wins() {
        let value = json!({ "merkleTreeDepth": 20 });
        let err = SemaphoreProof::from_json(&value).unwrap_err();
        assert_eq!(err.field(), "proof.merkleTreeRoot");
    }

    #[test]
    fn test_non_object_rejected() {
        let err = SemaphoreProof::from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(err.field(), "semaphoreProof");
        let err = SemaphoreProof::from_json(&Value::Null).unwrap_err();
        assert!(matches!(err, ValidationError::Missing { .. }));
    }

    #[test]
    fn test_proof_accepts_byte_array() {
        let mut value = sample_json();
        value["proof"] = json!([1, 2, 3]);
        let proof = SemaphoreProof::from_json(&value).unwrap();
        assert_eq!(proof.proof, vec![1, 2, 3]);
    }

    #[test]
    fn test_serde_uses_camel_case_and_hex_proof() {
        let proof = SemaphoreProof::from_json(&sample_json()).unwrap();
        let out = serde_json::to_value(&proof).unwrap();
        assert_eq!(out["merkleTreeDepth"], 20);
        assert_eq!(out["proof"], "0xdeadbeef");
        let back: SemaphoreProof = serde_json::from_value(out).unwrap();
        assert_eq!(back, proof);
    }
}
