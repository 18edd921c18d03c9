//! Shamir Tool Configuration
//!
//! Default scheme parameters for the command line tools.
//!
//! Handles loading configuration from:
//! 1. SHAMIR_CONFIG env var (explicit path)
//! 2. ./shamir.toml (current directory)
//! 3. ~/.shamir/shamir.toml (user home)
//!
//! Environment variables take precedence over TOML config.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::{env, fs};

/// Global config instance for convenience access
pub static GLOBAL_CONFIG: OnceLock<ShamirConfig> = OnceLock::new();

const CONFIG_FILE_NAME: &str = "shamir.toml";
const CONFIG_DIR_NAME: &str = ".shamir";

// ============================================================================
// Default Constants
// ============================================================================

const DEFAULT_THRESHOLD: usize = 3;
const DEFAULT_PARTICIPANTS: usize = 7;
const DEFAULT_MR_ROUNDS: usize = 40;
const DEFAULT_MAX_ATTEMPTS: usize = 1024;

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShamirConfig {
    #[serde(default)]
    pub scheme: SchemeConfig,
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

/// Default (t, n)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeConfig {
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    #[serde(default = "default_participants")]
    pub participants: usize,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            participants: DEFAULT_PARTICIPANTS,
        }
    }
}

fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}
fn default_participants() -> usize {
    DEFAULT_PARTICIPANTS
}

/// Prime modulus selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Fixed prime size; derived from the secret when unset
    #[serde(default)]
    pub prime_bits: Option<u64>,
    #[serde(default = "default_mr_rounds")]
    pub miller_rabin_rounds: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            prime_bits: None,
            miller_rabin_rounds: DEFAULT_MR_ROUNDS,
        }
    }
}

fn default_mr_rounds() -> usize {
    DEFAULT_MR_ROUNDS
}

/// Rejection sampling limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

// ============================================================================
// Override Helpers
// ============================================================================

/// Set field from a variable if present and parseable
fn var_parse<T, F>(lookup: &F, key: &str, field: &mut T)
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(key) {
        match v.parse() {
            Ok(parsed) => *field = parsed,
            Err(_) => log::warn!("Ignoring unparseable {}={}", key, v),
        }
    }
}

/// Set Option<T> from a variable if present and parseable
fn var_parse_option<T, F>(lookup: &F, key: &str, field: &mut Option<T>)
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(key) {
        match v.parse() {
            Ok(parsed) => *field = Some(parsed),
            Err(_) => log::warn!("Ignoring unparseable {}={}", key, v),
        }
    }
}

// ============================================================================
// Implementation
// ============================================================================

impl ShamirConfig {
    /// Load configuration from config file with env var overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading config from: {}", path.display());
                Self::parse_file(&path)?
            }
            None => {
                log::info!("No config file found, using defaults and environment variables");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::parse_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find the config file path
    fn find_config_file() -> Option<PathBuf> {
        // 1. Check SHAMIR_CONFIG env var
        if let Ok(path) = env::var("SHAMIR_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            log::warn!("SHAMIR_CONFIG points to missing file: {}", path.display());
        }

        // 2. Check ./shamir.toml (current directory)
        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Some(local_path);
        }

        // 3. Check ~/.shamir/shamir.toml
        Self::default_config_path().filter(|p| p.exists())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        var_parse(&lookup, "SHAMIR_THRESHOLD", &mut self.scheme.threshold);
        var_parse(&lookup, "SHAMIR_PARTICIPANTS", &mut self.scheme.participants);
        var_parse_option(&lookup, "SHAMIR_PRIME_BITS", &mut self.field.prime_bits);
        var_parse(
            &lookup,
            "SHAMIR_MR_ROUNDS",
            &mut self.field.miller_rabin_rounds,
        );
        var_parse(&lookup, "SHAMIR_MAX_ATTEMPTS", &mut self.sampling.max_attempts);
    }

    /// Reject settings no scheme could use
    pub fn validate(&self) -> Result<()> {
        let SchemeConfig {
            threshold,
            participants,
        } = self.scheme;
        if threshold == 0 || threshold > participants {
            bail!(
                "Invalid scheme: threshold {} must be between 1 and participants {}",
                threshold,
                participants
            );
        }
        if let Some(bits) = self.field.prime_bits {
            if bits < 2 {
                bail!("Invalid prime_bits {}: must be at least 2", bits);
            }
        }
        if self.sampling.max_attempts == 0 {
            bail!("Invalid max_attempts: must be at least 1");
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Generate a sample config file
    pub fn generate_sample() -> String {
        let mut sample = Self::default();
        sample.field.prime_bits = Some(256);
        toml::to_string_pretty(&sample).unwrap_or_default()
    }

    /// Render the effective configuration
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Get the global config instance, initializing it if necessary.
    ///
    /// Falls back to defaults if loading fails.
    pub fn global() -> &'static ShamirConfig {
        GLOBAL_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                log::warn!("Failed to load config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Initialize the global config with a specific instance.
    ///
    /// Returns `Err(config)` if already initialized.
    pub fn set_global(config: ShamirConfig) -> Result<(), ShamirConfig> {
        GLOBAL_CONFIG.set(config)
    }
}

/// Shorthand for `ShamirConfig::global()`.
#[inline]
pub fn global_config() -> &'static ShamirConfig {
    ShamirConfig::global()
}
