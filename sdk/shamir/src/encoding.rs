//! Conversions between byte strings and secrets.
//!
//! A secret is the big-endian integer value of its bytes. Leading zero
//! bytes do not survive the round trip.

use num_bigint::BigUint;

pub fn secret_from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Big-endian bytes of the secret, empty for zero
pub fn secret_to_bytes(secret: &BigUint) -> Vec<u8> {
    if secret.bits() == 0 {
        return Vec::new();
    }
    secret.to_bytes_be()
}

pub fn secret_from_str(text: &str) -> BigUint {
    secret_from_bytes(text.as_bytes())
}

/// UTF-8 text of the secret, `None` if the bytes are not valid UTF-8
pub fn secret_to_string(secret: &BigUint) -> Option<String> {
    String::from_utf8(secret_to_bytes(secret)).ok()
}
