//! Secret polynomial of degree t-1 over Z/p.

use std::fmt;

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

use crate::errors::Result;
use crate::field::PrimeField;

/// Coefficients `[a0, a1, ..., a(t-1)]` with `a0` the secret.
///
/// Not `Clone` and not serializable; `Debug` only reports the degree.
pub struct Polynomial {
    coefficients: Vec<BigUint>,
}

impl Polynomial {
    /// Draw a random polynomial with constant term `secret`.
    ///
    /// Every non-constant coefficient is uniform over [1, p-1]; zero draws
    /// are rejected and redrawn.
    pub fn random<R: RngCore + CryptoRng>(
        secret: &BigUint,
        threshold: usize,
        field: &PrimeField,
        rng: &mut R,
        max_attempts: usize,
    ) -> Result<Self> {
        let mut coefficients = Vec::with_capacity(threshold);
        coefficients.push(secret.clone());

        for _ in 1..threshold {
            coefficients.push(field.random_nonzero(rng, max_attempts)?);
        }

        debug!("generated polynomial of degree {}", threshold.saturating_sub(1));
        Ok(Self { coefficients })
    }

    /// Build from explicit coefficients, lowest degree first
    pub fn from_coefficients(coefficients: Vec<BigUint>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[BigUint] {
        &self.coefficients
    }

    /// Number of coefficients (the threshold)
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// P(x) mod p by Horner's method
    pub fn evaluate(&self, x: &BigUint, field: &PrimeField) -> BigUint {
        let mut coeffs = self.coefficients.iter().rev();
        let Some(leading) = coeffs.next() else {
            return BigUint::zero();
        };

        let mut acc = field.reduce(leading);
        for coeff in coeffs {
            acc = field.mul(&acc, x);
            acc = field.add(&acc, coeff);
        }
        acc
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polynomial")
            .field("degree", &self.degree())
            .field("coefficients", &"<redacted>")
            .finish()
    }
}
