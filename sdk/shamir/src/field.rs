//! Arithmetic in Z/p and uniform sampling of field elements.
//!
//! Sampling goes through [`RngCore::try_fill_bytes`] so an entropy failure
//! surfaces as [`ShamirError::RandomSource`] instead of a panic, and every
//! rejection loop is capped by an explicit attempt budget.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::errors::{Result, ShamirError};

/// Default cap on rejection-sampling iterations
pub const DEFAULT_MAX_ATTEMPTS: usize = 1024;

/// The prime field Z/p
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
}

impl PrimeField {
    /// Wrap a modulus. Primality is checked by the caller (see [`crate::prime`]).
    pub fn new(modulus: BigUint) -> Result<Self> {
        if modulus < BigUint::from(2u32) {
            return Err(ShamirError::InvalidModulus);
        }
        Ok(Self { modulus })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// True if `a` is already a reduced element
    pub fn contains(&self, a: &BigUint) -> bool {
        a < &self.modulus
    }

    pub fn reduce(&self, a: &BigUint) -> BigUint {
        a % &self.modulus
    }

    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.modulus
    }

    /// (a - b) mod p without underflow on unsigned integers
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let b = b % &self.modulus;
        (a + &self.modulus - b) % &self.modulus
    }

    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    /// Multiplicative inverse, `None` for zero (mod p)
    pub fn inv(&self, a: &BigUint) -> Option<BigUint> {
        let a = a % &self.modulus;
        if a.is_zero() {
            return None;
        }
        a.modinv(&self.modulus)
    }

    /// Uniform element of [0, p)
    pub fn random_element<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        max_attempts: usize,
    ) -> Result<BigUint> {
        random_below(rng, &self.modulus, max_attempts)
    }

    /// Uniform element of [1, p), drawn from [0, p) and resampled on zero
    pub fn random_nonzero<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        max_attempts: usize,
    ) -> Result<BigUint> {
        for _ in 0..max_attempts {
            let candidate = random_below(rng, &self.modulus, max_attempts)?;
            if !candidate.is_zero() {
                return Ok(candidate);
            }
        }
        Err(ShamirError::FieldTooSmall {
            attempts: max_attempts,
        })
    }
}

/// Uniform integer in [0, bound) by masked rejection sampling.
///
/// Each draw fills `ceil(bits / 8)` bytes and clears the bits above the top
/// bit of `bound`, so at least half of all draws are accepted.
pub fn random_below<R: RngCore + CryptoRng>(
    rng: &mut R,
    bound: &BigUint,
    max_attempts: usize,
) -> Result<BigUint> {
    if bound.is_zero() {
        return Err(ShamirError::InvalidModulus);
    }
    if bound.is_one() {
        return Ok(BigUint::zero());
    }

    let bits = bound.bits();
    let len = bits.div_ceil(8) as usize;
    let excess = (len as u64 * 8 - bits) as u32;
    let mut buf = vec![0u8; len];

    for _ in 0..max_attempts {
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| ShamirError::RandomSource(e.to_string()))?;
        buf[0] &= 0xffu8 >> excess;

        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return Ok(candidate);
        }
    }

    Err(ShamirError::FieldTooSmall {
        attempts: max_attempts,
    })
}

/// Uniform integer with exactly `bits` bits (top bit set)
pub(crate) fn random_bits<R: RngCore + CryptoRng>(rng: &mut R, bits: u64) -> Result<BigUint> {
    let len = bits.div_ceil(8) as usize;
    let excess = (len as u64 * 8 - bits) as u32;
    let mut buf = vec![0u8; len];

    rng.try_fill_bytes(&mut buf)
        .map_err(|e| ShamirError::RandomSource(e.to_string()))?;
    buf[0] &= 0xffu8 >> excess;
    buf[0] |= 0x80u8 >> excess;

    Ok(BigUint::from_bytes_be(&buf))
}
