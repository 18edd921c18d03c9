//! Validated scheme parameters and the split pipeline.
//!
//! The pipeline is linear: [`SecretSharingScheme::generate_polynomial`] then
//! [`SecretSharingScheme::generate_shares`], or both at once through
//! [`SecretSharingScheme::split`]. Recovery is the free function
//! [`crate::recover`] and never touches the scheme.

use std::collections::HashSet;

use log::{debug, info};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use crate::errors::{Result, ShamirError};
use crate::field::{DEFAULT_MAX_ATTEMPTS, PrimeField};
use crate::polynomial::Polynomial;
use crate::prime::{is_prime, random_prime};
use crate::share::{Share, ShareSet};

/// Parameters for one (t, n) split of a secret
#[derive(Debug, Clone)]
pub struct SecretSharingScheme {
    threshold: usize,
    participants: usize,
    field: PrimeField,
    secret: BigUint,
    max_attempts: usize,
}

impl SecretSharingScheme {
    /// Validate and build a scheme.
    ///
    /// Requires `1 <= threshold <= participants`, a prime modulus, and
    /// `secret < prime`, `participants < prime`.
    pub fn new(
        threshold: usize,
        participants: usize,
        prime: BigUint,
        secret: BigUint,
    ) -> Result<Self> {
        if threshold == 0 || threshold > participants {
            return Err(ShamirError::InvalidThreshold {
                t: threshold,
                n: participants,
            });
        }
        let field = PrimeField::new(prime)?;
        if !is_prime(field.modulus()) {
            return Err(ShamirError::NotPrime);
        }
        if !field.contains(&secret) {
            return Err(ShamirError::SecretOutOfRange);
        }
        if !field.contains(&BigUint::from(participants)) {
            return Err(ShamirError::TooFewFieldElements { n: participants });
        }

        Ok(Self {
            threshold,
            participants,
            field,
            secret,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Build a scheme over a fresh random prime just large enough for
    /// both the secret and the participant count.
    pub fn with_random_prime<R: RngCore + CryptoRng>(
        threshold: usize,
        participants: usize,
        secret: BigUint,
        mr_rounds: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let bits = minimum_prime_bits(&secret, participants);
        let prime = random_prime(bits, mr_rounds, rng)?;
        debug!("selected {}-bit prime modulus", bits);
        Self::new(threshold, participants, prime, secret)
    }

    /// Cap on rejection-sampling iterations (per sampled element)
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    pub fn prime(&self) -> &BigUint {
        self.field.modulus()
    }

    pub fn secret(&self) -> &BigUint {
        &self.secret
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Random polynomial of degree t-1 with the secret as constant term
    pub fn generate_polynomial<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Polynomial> {
        Polynomial::random(
            &self.secret,
            self.threshold,
            &self.field,
            rng,
            self.max_attempts,
        )
    }

    /// Evaluate `polynomial` at n distinct random nonzero x-coordinates.
    pub fn generate_shares<R: RngCore + CryptoRng>(
        &self,
        polynomial: &Polynomial,
        rng: &mut R,
    ) -> Result<ShareSet> {
        if polynomial.len() != self.threshold {
            return Err(ShamirError::InvalidThreshold {
                t: polynomial.len(),
                n: self.participants,
            });
        }

        let mut used: HashSet<BigUint> = HashSet::with_capacity(self.participants);
        let mut shares = Vec::with_capacity(self.participants);

        for _ in 0..self.participants {
            let x = self.fresh_x(&used, rng)?;
            let y = polynomial.evaluate(&x, &self.field);
            used.insert(x.clone());
            shares.push(Share::new(x, y));
        }

        Ok(ShareSet::new(
            self.threshold,
            self.field.modulus().clone(),
            shares,
        ))
    }

    /// Generate the polynomial and the shares; the polynomial is dropped
    /// before returning.
    pub fn split<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<ShareSet> {
        let polynomial = self.generate_polynomial(rng)?;
        let shares = self.generate_shares(&polynomial, rng)?;
        drop(polynomial);

        info!(
            "split secret into {} shares (threshold {}, {}-bit prime)",
            shares.len(),
            self.threshold,
            self.field.modulus().bits()
        );
        Ok(shares)
    }

    /// Nonzero x not yet handed out, resampled on collision
    fn fresh_x<R: RngCore + CryptoRng>(
        &self,
        used: &HashSet<BigUint>,
        rng: &mut R,
    ) -> Result<BigUint> {
        for _ in 0..self.max_attempts {
            let x = self.field.random_nonzero(rng, self.max_attempts)?;
            if !used.contains(&x) {
                return Ok(x);
            }
            debug!("x-coordinate collision, resampling");
        }
        Err(ShamirError::FieldTooSmall {
            attempts: self.max_attempts,
        })
    }
}

/// Bit length giving a prime above both the secret and `participants`
pub fn minimum_prime_bits(secret: &BigUint, participants: usize) -> u64 {
    let secret_bits = secret.bits();
    let n_bits = BigUint::from(participants).bits();
    secret_bits.max(n_bits).max(1) + 1
}
