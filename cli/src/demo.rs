//! Walkthrough of a full split and recovery.
//!
//! Prints the secret, parameters, polynomial and every share, then
//! shuffles the shares to simulate an arbitrary coalition of `t`
//! participants and recovers from them.

use anyhow::{Result, ensure};
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use shamir_config::ShamirConfig;
use shamir_sss::{recover, secret_from_str, secret_to_bytes};

use crate::SplitArgs;
use crate::shares::{build_scheme, render_secret};

const DEFAULT_DEMO_SECRET: &str = "Rust secret";

pub fn run(args: SplitArgs, config: &ShamirConfig) -> Result<()> {
    ensure!(
        args.out.is_none(),
        "demo never writes shares to disk; use `split --out` instead"
    );
    let text = args.secret.as_deref().unwrap_or(DEFAULT_DEMO_SECRET);
    let secret = secret_from_str(text);

    let mut rng = OsRng;
    let scheme = build_scheme(&args, secret.clone(), config, &mut rng)?;
    let polynomial = scheme.generate_polynomial(&mut rng)?;
    let set = scheme.generate_shares(&polynomial, &mut rng)?;

    println!("Secret:");
    println!("-------");
    println!("\tstring: {}", text);
    println!("\thexa:   {}\n", hex::encode(secret_to_bytes(&secret)));

    println!("Threshold:");
    println!("----------");
    println!("\t(t, n) = ({}, {})\n", scheme.threshold(), scheme.participants());

    println!("Prime modulus:");
    println!("--------------");
    println!("\tp = {:x}\n", scheme.prime());

    println!("Polynomial coefficients:");
    println!("------------------------");
    for (i, coeff) in polynomial.coefficients().iter().enumerate() {
        println!("\ta_{} = {:x}", i, coeff);
    }
    drop(polynomial);

    println!("\nShares of the participants:");
    println!("---------------------------");
    for (i, share) in set.iter().enumerate() {
        println!("\t(x_{i}, y_{i}) = ({:x}, {:x})", share.x(), share.y());
    }

    let mut order: Vec<usize> = (0..set.len()).collect();
    order.shuffle(&mut rng);
    order.truncate(scheme.threshold());

    println!("\nParticipants used:");
    println!("------------------");
    let mut coalition = Vec::with_capacity(order.len());
    for &i in &order {
        let share = &set.shares()[i];
        println!("\t(x_{i}, y_{i}) = ({:x}, {:x})", share.x(), share.y());
        coalition.push(share.clone());
    }

    let recovered = recover(&coalition, set.prime(), set.threshold())?;

    println!("\nRecovered secret:");
    println!("-----------------");
    println!("\thexa:   {}", hex::encode(secret_to_bytes(&recovered)));
    println!("\tstring: {}", render_secret(&recovered));

    ensure!(recovered == secret, "recovered secret does not match");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn demo_args(out: Option<PathBuf>) -> SplitArgs {
        SplitArgs {
            secret: Some("demo".into()),
            threshold: 2,
            participants: 3,
            prime_bits: None,
            out,
        }
    }

    #[test]
    fn test_demo_round_trip() {
        assert!(run(demo_args(None), &ShamirConfig::default()).is_ok());
    }

    #[test]
    fn test_demo_rejects_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shares.json");
        let err = run(demo_args(Some(path.clone())), &ShamirConfig::default()).unwrap_err();
        assert!(err.to_string().contains("split --out"));
        assert!(!path.exists());
    }
}
