//! Error definitions for the secret sharing scheme.
//!
//! Every failure is fatal for the operation that raised it: no partial
//! polynomial, share set or secret is ever returned alongside an error.
use thiserror::Error;

/// Errors that can occur while splitting or recovering a secret
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShamirError {
    /// The secure random source failed while sampling field elements
    #[error("Random source failure: {0}")]
    RandomSource(String),

    /// Threshold must satisfy 1 <= t <= n
    #[error("Invalid threshold: t={t}, n={n} (need 1 <= t <= n)")]
    InvalidThreshold { t: usize, n: usize },

    /// Modulus must be at least 2
    #[error("Invalid modulus: must be at least 2")]
    InvalidModulus,

    /// Modulus failed the primality test
    #[error("Modulus is not prime")]
    NotPrime,

    /// Prime search gave up without finding a probable prime
    #[error("No {bits}-bit prime found after {candidates} candidates")]
    PrimeSearchExhausted { bits: u64, candidates: usize },

    /// Secret does not fit in the field without wraparound
    #[error("Secret must be smaller than the prime modulus")]
    SecretOutOfRange,

    /// Field has fewer than n nonzero elements to use as x-coordinates
    #[error("Prime modulus too small for {n} distinct nonzero x-coordinates")]
    TooFewFieldElements { n: usize },

    /// Rejection sampling gave up
    #[error("Field too small: no acceptable sample after {attempts} attempts")]
    FieldTooSmall { attempts: usize },

    /// Not enough shares provided to reconstruct the secret
    #[error("Insufficient shares: got {got}, need {need}")]
    InsufficientShares { got: usize, need: usize },

    /// Two shares used for interpolation have the same x-coordinate
    #[error("Duplicate share x-coordinate: {0:x}")]
    DuplicateX(num_bigint::BigUint),

    /// A share with x = 0 would expose the secret directly
    #[error("Share x-coordinate must be non-zero")]
    ZeroX,

    /// A share coordinate is not reduced modulo the prime
    #[error("Share coordinate is not a reduced field element")]
    UnreducedShare,

    /// Share text could not be parsed
    #[error("Invalid share encoding: {0}")]
    InvalidShareEncoding(String),
}

/// Result type for secret sharing operations
pub type Result<T> = std::result::Result<T, ShamirError>;

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn test_error_messages() {
        let err = ShamirError::InsufficientShares { got: 2, need: 3 };
        assert_eq!(err.to_string(), "Insufficient shares: got 2, need 3");

        let err = ShamirError::DuplicateX(BigUint::from(255u32));
        assert_eq!(err.to_string(), "Duplicate share x-coordinate: ff");

        let err = ShamirError::InvalidThreshold { t: 0, n: 3 };
        assert_eq!(
            err.to_string(),
            "Invalid threshold: t=0, n=3 (need 1 <= t <= n)"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(ShamirError::NotPrime, ShamirError::NotPrime);
        assert_ne!(
            ShamirError::FieldTooSmall { attempts: 1 },
            ShamirError::FieldTooSmall { attempts: 2 }
        );
    }
}
