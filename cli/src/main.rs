mod demo;
mod shares;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use shamir_config::ShamirConfig;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let cmd = &args[1];
    let config = ShamirConfig::global();

    let result = match cmd.as_str() {
        "split" => parse_split_args(&args[2..], config).and_then(|a| shares::split(a, config)),
        "recover" => parse_recover_args(&args[2..]).and_then(shares::run_recover),
        "demo" => parse_split_args(&args[2..], config).and_then(|a| demo::run(a, config)),
        "config" => show_config(config),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            println!("❌ Unknown command: {}", cmd);
            println!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error running {}: {:#}", cmd, e);
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("shamir - (t, n) threshold secret sharing");
    println!();
    println!("USAGE:");
    println!("  shamir <command> [args]");
    println!();
    println!("COMMANDS:");
    println!("  split <secret> [options]   Split a text secret into shares (JSON)");
    println!("  recover <file> [options]   Recover a secret from a share file");
    println!("  demo [secret] [options]    Split, shuffle and recover, printing every step");
    println!("  config                     Print the effective configuration");
    println!("  help                       Show this help message");
    println!();
    println!("SPLIT / DEMO OPTIONS:");
    println!("  -t, --threshold <t>        Shares needed to recover (default: config)");
    println!("  -n, --participants <n>     Shares to generate (default: config)");
    println!("  --bits <b>                 Prime size in bits (default: secret size + 1)");
    println!("  --out <file>               Write shares to a file instead of stdout (split only)");
    println!();
    println!("RECOVER OPTIONS:");
    println!("  --use <i,j,k>              Positions of the shares to combine (0-based)");
    println!("  --strict                   Reject duplicate, zero or unreduced shares");
    println!();
    println!("EXAMPLES:");
    println!("  shamir split \"my secret\" -t 3 -n 5 --out shares.json");
    println!("  shamir recover shares.json --use 4,0,2");
    println!("  shamir demo -t 3 -n 7");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("  SHAMIR_CONFIG        Path to shamir.toml");
    println!("  SHAMIR_THRESHOLD     Default threshold");
    println!("  SHAMIR_PARTICIPANTS  Default participant count");
    println!("  SHAMIR_PRIME_BITS    Default prime size");
    println!("  RUST_LOG             Log level (debug/info/warn/error)");
}

/// Options shared by `split` and `demo`
#[derive(Debug, Clone, PartialEq)]
pub struct SplitArgs {
    pub secret: Option<String>,
    pub threshold: usize,
    pub participants: usize,
    pub prime_bits: Option<u64>,
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoverArgs {
    pub path: PathBuf,
    pub indices: Option<Vec<usize>>,
    pub strict: bool,
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} needs a value", flag))
}

fn parse_split_args(args: &[String], config: &ShamirConfig) -> Result<SplitArgs> {
    let mut parsed = SplitArgs {
        secret: None,
        threshold: config.scheme.threshold,
        participants: config.scheme.participants,
        prime_bits: config.field.prime_bits,
        out: None,
    };

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-t" | "--threshold" => {
                parsed.threshold = flag_value(args, i, arg)?
                    .parse()
                    .context("threshold must be a positive integer")?;
                i += 1;
            }
            "-n" | "--participants" => {
                parsed.participants = flag_value(args, i, arg)?
                    .parse()
                    .context("participants must be a positive integer")?;
                i += 1;
            }
            "--bits" => {
                parsed.prime_bits = Some(
                    flag_value(args, i, arg)?
                        .parse()
                        .context("bits must be a positive integer")?,
                );
                i += 1;
            }
            "--out" => {
                parsed.out = Some(PathBuf::from(flag_value(args, i, arg)?));
                i += 1;
            }
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            other => {
                if parsed.secret.is_some() {
                    bail!("Unexpected argument: {}", other);
                }
                parsed.secret = Some(other.to_string());
            }
        }
        i += 1;
    }

    Ok(parsed)
}

fn parse_recover_args(args: &[String]) -> Result<RecoverArgs> {
    let mut path = None;
    let mut indices = None;
    let mut strict = false;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--use" => {
                let list = flag_value(args, i, arg)?;
                let parsed = list
                    .split(',')
                    .map(|s| s.trim().parse::<usize>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .with_context(|| format!("Invalid share list: {}", list))?;
                indices = Some(parsed);
                i += 1;
            }
            "--strict" => strict = true,
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            other => {
                if path.is_some() {
                    bail!("Unexpected argument: {}", other);
                }
                path = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    Ok(RecoverArgs {
        path: path.ok_or_else(|| anyhow!("Usage: recover <file> [--use i,j,k] [--strict]"))?,
        indices,
        strict,
    })
}

fn show_config(config: &ShamirConfig) -> Result<()> {
    if let Some(path) = ShamirConfig::default_config_path() {
        println!("# default location: {}", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_args_defaults_from_config() {
        let config = ShamirConfig::default();
        let parsed = parse_split_args(&args(&["hello"]), &config).unwrap();
        assert_eq!(parsed.secret.as_deref(), Some("hello"));
        assert_eq!(parsed.threshold, 3);
        assert_eq!(parsed.participants, 7);
        assert_eq!(parsed.prime_bits, None);
        assert_eq!(parsed.out, None);
    }

    #[test]
    fn test_split_args_flags() {
        let config = ShamirConfig::default();
        let parsed = parse_split_args(
            &args(&["-t", "2", "hello", "--participants", "4", "--bits", "128", "--out", "s.json"]),
            &config,
        )
        .unwrap();
        assert_eq!(parsed.threshold, 2);
        assert_eq!(parsed.participants, 4);
        assert_eq!(parsed.prime_bits, Some(128));
        assert_eq!(parsed.out, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn test_split_args_errors() {
        let config = ShamirConfig::default();
        assert!(parse_split_args(&args(&["-t"]), &config).is_err());
        assert!(parse_split_args(&args(&["-t", "x"]), &config).is_err());
        assert!(parse_split_args(&args(&["a", "b"]), &config).is_err());
        assert!(parse_split_args(&args(&["--verbose"]), &config).is_err());
    }

    #[test]
    fn test_recover_args() {
        let parsed =
            parse_recover_args(&args(&["shares.json", "--use", "3, 0,1", "--strict"])).unwrap();
        assert_eq!(parsed.path, PathBuf::from("shares.json"));
        assert_eq!(parsed.indices, Some(vec![3, 0, 1]));
        assert!(parsed.strict);

        assert!(parse_recover_args(&args(&[])).is_err());
        assert!(parse_recover_args(&args(&["f", "--use", "1,a"])).is_err());
    }
}
