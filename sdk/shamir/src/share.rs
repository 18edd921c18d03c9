//! Shares and share sets.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShamirError};
use crate::recovery;
use crate::serde_utils::{deserialize_biguint, from_hex, serialize_biguint, to_hex};

/// One participant's point (x, P(x)) on the secret polynomial
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Share {
    #[serde(
        serialize_with = "serialize_biguint",
        deserialize_with = "deserialize_biguint"
    )]
    x: BigUint,
    #[serde(
        serialize_with = "serialize_biguint",
        deserialize_with = "deserialize_biguint"
    )]
    y: BigUint,
}

impl Share {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> &BigUint {
        &self.x
    }

    pub fn y(&self) -> &BigUint {
        &self.y
    }
}

/// Renders as `x:y` in hex
impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", to_hex(&self.x), to_hex(&self.y))
    }
}

impl FromStr for Share {
    type Err = ShamirError;

    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = s
            .split_once(':')
            .ok_or_else(|| ShamirError::InvalidShareEncoding(format!("missing ':' in {:?}", s)))?;
        let x = from_hex(x)
            .ok_or_else(|| ShamirError::InvalidShareEncoding(format!("bad x in {:?}", s)))?;
        let y = from_hex(y)
            .ok_or_else(|| ShamirError::InvalidShareEncoding(format!("bad y in {:?}", s)))?;
        Ok(Self { x, y })
    }
}

/// The immutable output of share generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSet {
    threshold: usize,
    #[serde(
        serialize_with = "serialize_biguint",
        deserialize_with = "deserialize_biguint"
    )]
    prime: BigUint,
    shares: Vec<Share>,
}

impl ShareSet {
    pub fn new(threshold: usize, prime: BigUint, shares: Vec<Share>) -> Self {
        Self {
            threshold,
            prime,
            shares,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Share> {
        self.shares.iter()
    }

    /// Shares at the given positions, in the given order.
    ///
    /// Returns `None` if any index is out of range.
    pub fn subset(&self, indices: &[usize]) -> Option<Vec<Share>> {
        indices.iter().map(|&i| self.shares.get(i).cloned()).collect()
    }

    /// Recover from the first `threshold` shares held
    pub fn recover(&self) -> Result<BigUint> {
        recovery::recover(&self.shares, &self.prime, self.threshold)
    }

    pub fn into_shares(self) -> Vec<Share> {
        self.shares
    }
}

impl<'a> IntoIterator for &'a ShareSet {
    type Item = &'a Share;
    type IntoIter = std::slice::Iter<'a, Share>;

    fn into_iter(self) -> Self::IntoIter {
        self.shares.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(x: u32, y: u32) -> Share {
        Share::new(BigUint::from(x), BigUint::from(y))
    }

    #[test]
    fn test_display_and_parse() {
        let s = share(0x1f, 0xabc);
        assert_eq!(s.to_string(), "1f:abc");
        assert_eq!("1f:abc".parse::<Share>().unwrap(), s);
        assert_eq!("0x1f:0xabc".parse::<Share>().unwrap(), s);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "1f", "zz:01", "01:", ":01"] {
            assert!(matches!(
                bad.parse::<Share>(),
                Err(ShamirError::InvalidShareEncoding(_))
            ));
        }
    }

    #[test]
    fn test_json_uses_hex() {
        let set = ShareSet::new(2, BigUint::from(7919u32), vec![share(1, 255), share(2, 16)]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"{"threshold":2,"prime":"1eef","shares":[{"x":"1","y":"ff"},{"x":"2","y":"10"}]}"#
        );
        let back: ShareSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_subset() {
        let set = ShareSet::new(2, BigUint::from(7919u32), vec![share(1, 1), share(2, 2), share(3, 3)]);
        assert_eq!(set.subset(&[2, 0]).unwrap(), vec![share(3, 3), share(1, 1)]);
        assert!(set.subset(&[3]).is_none());
    }
}
