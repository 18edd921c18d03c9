use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use shamir_config::ShamirConfig;
use shamir_sss::{
    BigUint, SecretSharingScheme, ShareSet, minimum_prime_bits, random_prime, recover_strict,
    secret_from_str, secret_to_bytes, secret_to_string,
};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use crate::{RecoverArgs, SplitArgs};

/// Build a scheme for `secret` over a fresh random prime
pub fn build_scheme<R: RngCore + CryptoRng>(
    args: &SplitArgs,
    secret: BigUint,
    config: &ShamirConfig,
    rng: &mut R,
) -> Result<SecretSharingScheme> {
    let rounds = config.field.miller_rabin_rounds;
    let needed = minimum_prime_bits(&secret, args.participants);

    let scheme = match args.prime_bits {
        Some(bits) => {
            if bits < needed {
                bail!(
                    "--bits {} is too small: this secret and participant count need at least {}",
                    bits,
                    needed
                );
            }
            let prime = random_prime(bits, rounds, rng)?;
            SecretSharingScheme::new(args.threshold, args.participants, prime, secret)?
        }
        None => SecretSharingScheme::with_random_prime(
            args.threshold,
            args.participants,
            secret,
            rounds,
            rng,
        )?,
    };

    Ok(scheme.with_max_attempts(config.sampling.max_attempts))
}

pub fn split(args: SplitArgs, config: &ShamirConfig) -> Result<()> {
    let text = args
        .secret
        .as_deref()
        .ok_or_else(|| anyhow!("Usage: split <secret> [-t T] [-n N] [--bits B] [--out FILE]"))?;

    let mut rng = OsRng;
    let scheme = build_scheme(&args, secret_from_str(text), config, &mut rng)?;
    let set = scheme.split(&mut rng)?;
    let json = serde_json::to_string_pretty(&set).context("Failed to encode shares")?;

    match args.out {
        Some(path) => {
            write_private(&path, &json)?;
            println!(
                "✅ Wrote {} shares (threshold {}) to {}",
                set.len(),
                set.threshold(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn run_recover(args: RecoverArgs) -> Result<()> {
    let set = read_share_set(&args.path)?;
    let secret = recover_from_set(&set, args.indices.as_deref(), args.strict)?;
    println!("{}", render_secret(&secret));
    Ok(())
}

pub fn read_share_set(path: &Path) -> Result<ShareSet> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read share file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse share file: {}", path.display()))
}

/// Combine the selected shares of a set, or its first `threshold` shares
pub fn recover_from_set(
    set: &ShareSet,
    indices: Option<&[usize]>,
    strict: bool,
) -> Result<BigUint> {
    let shares = match indices {
        Some(indices) => set
            .subset(indices)
            .ok_or_else(|| anyhow!("Share index out of range (set has {})", set.len()))?,
        None => set.shares().to_vec(),
    };
    debug!(
        "recovering from {} shares, threshold {}",
        shares.len(),
        set.threshold()
    );

    let secret = if strict {
        recover_strict(&shares, set.prime(), set.threshold())?
    } else {
        shamir_sss::recover(&shares, set.prime(), set.threshold())?
    };
    info!("secret recovered");
    Ok(secret)
}

/// Text when the secret decodes as UTF-8, otherwise `0x` hex
pub fn render_secret(secret: &BigUint) -> String {
    match secret_to_string(secret) {
        Some(text) => text,
        None => format!("0x{}", hex::encode(secret_to_bytes(secret))),
    }
}

/// Share files hold secret material: owner read/write only
fn write_private(path: &Path, contents: &str) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to create {} (remove it first if it exists)", path.display()))?;
    file.write_all(contents.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn split_args(t: usize, n: usize, bits: Option<u64>) -> SplitArgs {
        SplitArgs {
            secret: Some("correct horse".into()),
            threshold: t,
            participants: n,
            prime_bits: bits,
            out: None,
        }
    }

    #[test]
    fn test_build_scheme_sizes_prime() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = ShamirConfig::default();
        let secret = secret_from_str("correct horse");

        let scheme =
            build_scheme(&split_args(2, 3, None), secret.clone(), &config, &mut rng).unwrap();
        assert_eq!(scheme.prime().bits(), secret.bits() + 1);

        let scheme =
            build_scheme(&split_args(2, 3, Some(256)), secret.clone(), &config, &mut rng).unwrap();
        assert_eq!(scheme.prime().bits(), 256);

        assert!(build_scheme(&split_args(2, 3, Some(16)), secret, &config, &mut rng).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = ShamirConfig::default();
        let secret = secret_from_str("correct horse");
        let scheme = build_scheme(&split_args(3, 5, None), secret, &config, &mut rng).unwrap();
        let set = scheme.split(&mut rng).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shares.json");
        write_private(&path, &serde_json::to_string(&set).unwrap()).unwrap();
        // never overwrite an existing share file
        assert!(write_private(&path, "{}").is_err());

        let loaded = read_share_set(&path).unwrap();
        let secret = recover_from_set(&loaded, Some(&[4, 1, 2][..]), true).unwrap();
        assert_eq!(render_secret(&secret), "correct horse");

        assert!(recover_from_set(&loaded, Some(&[0, 1][..]), false).is_err());
        assert!(recover_from_set(&loaded, Some(&[0, 9, 1][..]), false).is_err());
    }

    #[test]
    fn test_run_recover_from_file() {
        let mut rng = StdRng::seed_from_u64(6);
        let config = ShamirConfig::default();
        let secret = secret_from_str("correct horse");
        let scheme = build_scheme(&split_args(2, 4, None), secret, &config, &mut rng).unwrap();
        let set = scheme.split(&mut rng).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shares.json");
        write_private(&path, &serde_json::to_string(&set).unwrap()).unwrap();

        let args = RecoverArgs {
            path: path.clone(),
            indices: Some(vec![3, 1]),
            strict: false,
        };
        assert!(run_recover(args).is_ok());

        let missing = RecoverArgs {
            path: dir.path().join("missing.json"),
            indices: None,
            strict: true,
        };
        assert!(run_recover(missing).is_err());
    }

    #[test]
    fn test_render_binary_secret() {
        let secret = BigUint::from_bytes_be(&[0xff, 0x00, 0x10]);
        assert_eq!(render_secret(&secret), "0xff0010");
    }
}
