//! Shamir (t, n) Threshold Secret Sharing
//!
//! A secret is hidden as the constant term of a random polynomial of degree
//! `t - 1` over the prime field Z/p. Each of the `n` participants receives
//! one point `(x, P(x))`; any `t` points recover `P(0)` by Lagrange
//! interpolation while `t - 1` points say nothing about it.
//!
//! ```text
//!   secret ──▶ generate_polynomial ──▶ generate_shares ──▶ ShareSet (n shares)
//!                                                              │
//!                                           any t shares ──▶ recover ──▶ secret
//! ```
//!
//! ## Example
//!
//! ```rust
//! use num_bigint::BigUint;
//! use rand::rngs::OsRng;
//! use shamir_sss::{SecretSharingScheme, recover};
//!
//! let prime = BigUint::from(7919u32);
//! let scheme = SecretSharingScheme::new(2, 3, prime.clone(), BigUint::from(42u32)).unwrap();
//! let shares = scheme.split(&mut OsRng).unwrap();
//!
//! let recovered = recover(&shares.shares()[1..], &prime, 2).unwrap();
//! assert_eq!(recovered, BigUint::from(42u32));
//! ```

pub mod encoding;
pub mod errors;
pub mod field;
pub mod polynomial;
pub mod prime;
pub mod recovery;
pub mod scheme;
pub mod serde_utils;
pub mod share;

#[cfg(test)]
mod test_utils;

pub use encoding::{secret_from_bytes, secret_from_str, secret_to_bytes, secret_to_string};
pub use errors::{Result, ShamirError};
pub use field::{DEFAULT_MAX_ATTEMPTS, PrimeField};
pub use polynomial::Polynomial;
pub use prime::{DEFAULT_MR_ROUNDS, is_prime, is_probable_prime, random_prime};
pub use recovery::{lagrange_coefficient_at_zero, recover, recover_strict};
pub use scheme::{SecretSharingScheme, minimum_prime_bits};
pub use share::{Share, ShareSet};

/// Re-export of the big integer type used for field elements
pub use num_bigint::BigUint;
