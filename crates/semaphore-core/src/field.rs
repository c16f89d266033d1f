//! # Field Elements
//!
//! `FieldElement` wraps a BN254 scalar-field element (`ark_bn254::Fr`), the
//! native numeric domain of the Semaphore circuit. Every value that crosses
//! into a circuit (hash outputs, roots, nullifiers, witness values) passes
//! through this type.
//!
//! ## Encodings
//!
//! | Form | Used by |
//! |------|---------|
//! | decimal string | the JSON proof record (`merkleTreeRoot`, `message`, …) |
//! | `0x` + 64 lowercase hex digits | Barretenberg public inputs |
//! | 32 big-endian bytes | packed proofs, backend public-input files |
//!
//! ## Security Invariant
//!
//! Parsing never reduces silently: a value `>= r` is rejected with
//! [`FieldError::OutOfRange`]. Only the domain hash reduces modulo `r`, and
//! it does so through the explicit [`FieldElement::from_be_bytes_mod_order`].

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;

/// The BN254 scalar field modulus `r` as an arbitrary-precision integer.
pub fn scalar_modulus() -> &'static BigUint {
    static MODULUS: OnceLock<BigUint> = OnceLock::new();
    MODULUS.get_or_init(|| BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be()))
}

/// An element of the BN254 scalar field.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldElement(Fr);

impl FieldElement {
    /// The additive identity.
    pub fn zero() -> Self {
        Self(Fr::from(0u64))
    }

    /// Parse a decimal or `0x`-prefixed hex string.
    ///
    /// # Errors
    ///
    /// [`FieldError::Empty`] for `""`, [`FieldError::InvalidEncoding`] for
    /// anything that is not a plain decimal or hex number, and
    /// [`FieldError::OutOfRange`] for values not below the modulus.
    pub fn parse(s: &str) -> Result<Self, FieldError> {
        if s.is_empty() {
            return Err(FieldError::Empty);
        }
        let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(digits) => {
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(FieldError::InvalidEncoding(s.to_string()));
                }
                BigUint::parse_bytes(digits.as_bytes(), 16)
            }
            None => {
                if !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(FieldError::InvalidEncoding(s.to_string()));
                }
                BigUint::parse_bytes(s.as_bytes(), 10)
            }
        }
        .ok_or_else(|| FieldError::InvalidEncoding(s.to_string()))?;
        Self::from_biguint(&value)
    }

    /// Convert an integer strictly below the modulus.
    pub fn from_biguint(value: &BigUint) -> Result<Self, FieldError> {
        if value >= scalar_modulus() {
            return Err(FieldError::OutOfRange);
        }
        Ok(Self(Fr::from_be_bytes_mod_order(&value.to_bytes_be())))
    }

    /// Decode 32 big-endian bytes, rejecting values `>= r`.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, FieldError> {
        if bytes.len() != 32 {
            return Err(FieldError::InvalidLength(bytes.len()));
        }
        Self::from_biguint(&BigUint::from_bytes_be(bytes))
    }

    /// Interpret arbitrary big-endian bytes as an integer reduced modulo `r`.
    ///
    /// This is the reduction step of the domain hash. It never fails.
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    /// 32-byte big-endian representation.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let raw = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }

    /// `0x`-prefixed, zero-padded, 64-digit lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }

    /// Canonical decimal string.
    pub fn to_decimal(&self) -> String {
        self.to_biguint().to_string()
    }

    /// The element as an arbitrary-precision integer in `[0, r)`.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.to_be_bytes())
    }

    /// Access the underlying arkworks element.
    pub fn as_fr(&self) -> &Fr {
        &self.0
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self(Fr::from(value))
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl FromStr for FieldElement {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_hex())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
