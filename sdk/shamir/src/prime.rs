//! Probable-prime testing and random prime generation.
//!
//! Miller-Rabin over `BigUint`: trial division by the small primes, the
//! fixed witness set, then optional random witnesses drawn from the caller's
//! secure random source.

use log::debug;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::errors::{Result, ShamirError};
use crate::field::{DEFAULT_MAX_ATTEMPTS, random_below, random_bits};

/// Default number of random Miller-Rabin rounds for generated primes
pub const DEFAULT_MR_ROUNDS: usize = 40;

const SMALL_PRIMES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// Deterministic check against the fixed witness set.
///
/// Bases 2..=41 make this exact below 3.317 * 10^24; above that it is a
/// strong probable-prime test.
pub fn is_prime(n: &BigUint) -> bool {
    if let Some(answer) = trial_division(n) {
        return answer;
    }
    let witnesses: Vec<BigUint> = SMALL_PRIMES.iter().map(|&p| BigUint::from(p)).collect();
    passes_miller_rabin(n, &witnesses)
}

/// Fixed witnesses plus `rounds` random witnesses in [2, n-2]
pub fn is_probable_prime<R: RngCore + CryptoRng>(
    n: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> Result<bool> {
    if !is_prime(n) {
        return Ok(false);
    }
    if trial_division(n).is_some() {
        return Ok(true);
    }

    let span = n - 3u32;
    let mut witnesses = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        witnesses.push(random_below(rng, &span, DEFAULT_MAX_ATTEMPTS)? + 2u32);
    }
    Ok(passes_miller_rabin(n, &witnesses))
}

/// Random probable prime with exactly `bits` bits
pub fn random_prime<R: RngCore + CryptoRng>(
    bits: u64,
    rounds: usize,
    rng: &mut R,
) -> Result<BigUint> {
    if bits < 2 {
        return Err(ShamirError::InvalidModulus);
    }

    // Prime density near 2^bits is about 1 / (0.69 * bits); this budget
    // is several hundred times the expected number of odd candidates.
    let max_candidates = (bits as usize).saturating_mul(256).max(DEFAULT_MAX_ATTEMPTS);

    for attempt in 1..=max_candidates {
        let mut candidate = random_bits(rng, bits)?;
        if candidate.is_even() {
            candidate += 1u32;
        }
        if is_probable_prime(&candidate, rounds, rng)? {
            debug!("found {}-bit prime after {} candidates", bits, attempt);
            return Ok(candidate);
        }
    }

    Err(ShamirError::PrimeSearchExhausted {
        bits,
        candidates: max_candidates,
    })
}

fn trial_division(n: &BigUint) -> Option<bool> {
    if n < &BigUint::from(2u32) {
        return Some(false);
    }
    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if n == &p {
            return Some(true);
        }
        if (n % &p).is_zero() {
            return Some(false);
        }
    }
    None
}

/// n must be odd and greater than every witness
fn passes_miller_rabin(n: &BigUint, witnesses: &[BigUint]) -> bool {
    let n_minus_one = n - 1u32;
    let r = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> r;

    'witness: for a in witnesses {
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..r {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
