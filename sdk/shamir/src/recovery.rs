//! Secret recovery by Lagrange interpolation at x = 0.
//!
//! `recover` uses exactly the first `threshold` shares it is given and
//! ignores the rest. `recover_strict` validates the whole input first.

use std::collections::HashSet;

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::errors::{Result, ShamirError};
use crate::field::PrimeField;
use crate::prime::is_prime;
use crate::share::Share;

/// Recover the secret from the first `threshold` shares.
///
/// Fails with `InsufficientShares` when fewer than `threshold` shares are
/// given, and with `DuplicateX` when two of the first `threshold` shares
/// share an x-coordinate mod `prime`.
///
/// `prime` is taken on trust. Against a composite modulus a difference
/// sharing a factor with it is reported as `DuplicateX`; use
/// [`recover_strict`] for input read from untrusted storage.
pub fn recover(shares: &[Share], prime: &BigUint, threshold: usize) -> Result<BigUint> {
    if threshold == 0 {
        return Err(ShamirError::InvalidThreshold {
            t: threshold,
            n: shares.len(),
        });
    }
    let field = PrimeField::new(prime.clone())?;
    if shares.len() < threshold {
        return Err(ShamirError::InsufficientShares {
            got: shares.len(),
            need: threshold,
        });
    }

    let points = &shares[..threshold];
    let xs: Vec<BigUint> = points.iter().map(|s| field.reduce(s.x())).collect();

    let mut secret = BigUint::zero();
    for (i, share) in points.iter().enumerate() {
        let basis = lagrange_coefficient_at_zero(&xs, i, &field)?;
        let term = field.mul(share.y(), &basis);
        secret = field.add(&secret, &term);
    }

    debug!(
        "recovered secret from {} of {} supplied shares",
        threshold,
        shares.len()
    );
    Ok(secret)
}

/// Validate every supplied share, then recover from the first `threshold`.
///
/// `prime` must pass [`is_prime`]. All x-coordinates must be nonzero and
/// pairwise distinct, and every coordinate must already be reduced modulo
/// `prime`.
pub fn recover_strict(shares: &[Share], prime: &BigUint, threshold: usize) -> Result<BigUint> {
    let field = PrimeField::new(prime.clone())?;
    if !is_prime(prime) {
        return Err(ShamirError::NotPrime);
    }
    let mut seen = HashSet::with_capacity(shares.len());

    for share in shares {
        if !field.contains(share.x()) || !field.contains(share.y()) {
            return Err(ShamirError::UnreducedShare);
        }
        if share.x().is_zero() {
            return Err(ShamirError::ZeroX);
        }
        if !seen.insert(share.x()) {
            return Err(ShamirError::DuplicateX(share.x().clone()));
        }
    }

    recover(shares, prime, threshold)
}

/// Lagrange basis value at zero for point `i`:
/// `L_i(0) = prod_{j != i} x_j * (x_j - x_i)^-1 mod p`
///
/// An index past the end of `xs` is `InsufficientShares`.
pub fn lagrange_coefficient_at_zero(
    xs: &[BigUint],
    i: usize,
    field: &PrimeField,
) -> Result<BigUint> {
    let Some(x_i) = xs.get(i) else {
        return Err(ShamirError::InsufficientShares {
            got: xs.len(),
            need: i.saturating_add(1),
        });
    };
    let mut acc = BigUint::one();

    for (j, x_j) in xs.iter().enumerate() {
        if j == i {
            continue;
        }
        let inv = field
            .inv(&field.sub(x_j, x_i))
            .ok_or_else(|| ShamirError::DuplicateX(x_i.clone()))?;
        acc = field.mul(&acc, &field.mul(x_j, &inv));
    }

    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u32) -> BigUint {
        BigUint::from(v)
    }

    fn share(x: u32, y: u32) -> Share {
        Share::new(big(x), big(y))
    }

    // P(x) = 42 + 5x + 3x^2 over Z/7919
    fn points() -> Vec<Share> {
        (1..=5u32).map(|x| share(x, 42 + 5 * x + 3 * x * x)).collect()
    }

    #[test]
    fn test_basis_sums_to_one() {
        let field = PrimeField::new(big(7919)).unwrap();
        let xs = vec![big(1), big(2), big(3), big(500)];
        let mut sum = BigUint::zero();
        for i in 0..xs.len() {
            sum = field.add(&sum, &lagrange_coefficient_at_zero(&xs, i, &field).unwrap());
        }
        assert_eq!(sum, BigUint::one());
    }

    #[test]
    fn test_basis_index_out_of_range() {
        let field = PrimeField::new(big(7919)).unwrap();
        let xs = vec![big(5)];
        assert_eq!(
            lagrange_coefficient_at_zero(&xs, 3, &field),
            Err(ShamirError::InsufficientShares { got: 1, need: 4 })
        );
        assert_eq!(lagrange_coefficient_at_zero(&xs, 0, &field), Ok(BigUint::one()));
    }

    #[test]
    fn test_known_polynomial() {
        let prime = big(7919);
        assert_eq!(recover(&points(), &prime, 3).unwrap(), big(42));
        assert_eq!(recover(&points()[2..], &prime, 3).unwrap(), big(42));
    }

    #[test]
    fn test_extra_shares_are_ignored() {
        let prime = big(7919);
        let mut shares = points()[..3].to_vec();
        // garbage after the first t shares has no effect
        shares.push(share(9, 1));
        shares.push(share(1, 0));
        assert_eq!(recover(&shares, &prime, 3).unwrap(), big(42));
    }

    #[test]
    fn test_insufficient_shares() {
        let err = recover(&points()[..2], &big(7919), 3).unwrap_err();
        assert_eq!(err, ShamirError::InsufficientShares { got: 2, need: 3 });
    }

    #[test]
    fn test_duplicate_x_is_fatal() {
        let shares = vec![share(4, 10), share(7, 11), share(4, 12)];
        let err = recover(&shares, &big(7919), 3).unwrap_err();
        assert!(matches!(err, ShamirError::DuplicateX(_)));
    }

    #[test]
    fn test_duplicate_x_modulo_prime() {
        // 3 and 3 + p are the same field element
        let shares = vec![share(3, 10), share(3 + 7919, 11)];
        let err = recover(&shares, &big(7919), 2).unwrap_err();
        assert!(matches!(err, ShamirError::DuplicateX(_)));
    }

    #[test]
    fn test_zero_threshold() {
        assert_eq!(
            recover(&points(), &big(7919), 0),
            Err(ShamirError::InvalidThreshold { t: 0, n: 5 })
        );
    }

    #[test]
    fn test_strict_checks_all_shares() {
        let prime = big(7919);
        let mut shares = points();
        // duplicate beyond the first t: lenient recovery ignores it
        shares.push(share(1, 99));
        assert_eq!(recover(&shares, &prime, 3).unwrap(), big(42));
        assert!(matches!(
            recover_strict(&shares, &prime, 3),
            Err(ShamirError::DuplicateX(_))
        ));

        let with_zero = vec![share(0, 42), share(1, 50)];
        assert_eq!(recover_strict(&with_zero, &prime, 2), Err(ShamirError::ZeroX));

        let unreduced = vec![share(1, 8000), share(2, 50)];
        assert_eq!(
            recover_strict(&unreduced, &prime, 2),
            Err(ShamirError::UnreducedShare)
        );

        assert_eq!(recover_strict(&points(), &prime, 3).unwrap(), big(42));
    }

    #[test]
    fn test_strict_rejects_composite_modulus() {
        // 7917 = 3 * 7 * 13 * 29; x = 1 and x = 4 differ by 3
        let shares = vec![share(1, 10), share(4, 20)];
        assert!(matches!(
            recover(&shares, &big(7917), 2),
            Err(ShamirError::DuplicateX(_))
        ));
        assert_eq!(
            recover_strict(&shares, &big(7917), 2),
            Err(ShamirError::NotPrime)
        );
    }
}
