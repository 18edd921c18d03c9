//! Serialization helpers for big integers.
//!
//! Field elements are written as lowercase big-endian hex strings, with a
//! single "0" for zero.

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serializer};

/// Encode a BigUint as hex
pub fn to_hex(value: &BigUint) -> String {
    value.to_str_radix(16)
}

/// Decode hex, accepting an optional `0x` prefix and odd lengths
pub fn from_hex(s: &str) -> Option<BigUint> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if s.is_empty() {
        return None;
    }

    let padded;
    let s = if s.len() % 2 == 1 {
        padded = format!("0{}", s);
        padded.as_str()
    } else {
        s
    };
    hex::decode(s).ok().map(|bytes| BigUint::from_bytes_be(&bytes))
}

pub fn serialize_biguint<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_hex(value))
}

pub fn deserialize_biguint<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("Invalid hex integer: {}", s)))
}
