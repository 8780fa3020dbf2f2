use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Default file the obfuscated key is written to.
pub const DEFAULT_KEY_FILE: &str = "ft_otp.key";

/// Default duration of a step, per [rfc-6238](https://tools.ietf.org/html/rfc6238#section-5.2).
pub const DEFAULT_INTERVAL: u64 = 30;

/// Invalid configuration value.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConfigError {
    /// The interval is used as a divisor and can't be 0
    ZeroInterval,
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroInterval => write!(f, "interval must be at least 1 second"),
        }
    }
}

fn assert_interval(interval: u64) -> Result<NonZeroU64, ConfigError> {
    NonZeroU64::new(interval).ok_or(ConfigError::ZeroInterval)
}

/// Settings shared by the key store and the code generator.
///
/// # Example
/// ```
/// use ft_otp::Config;
///
/// let mut config = Config::default();
/// assert_eq!(config.get_interval(), 30);
///
/// // 60 seconds windows have to be asked for
/// config.interval(60).unwrap();
/// config.key_file("/tmp/ft_otp.key");
/// assert!(config.interval(0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Config {
    /// Duration in seconds of a step
    interval: NonZeroU64,
    /// Where the obfuscated key lives
    key_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            interval: NonZeroU64::new(DEFAULT_INTERVAL).unwrap_or(NonZeroU64::MIN),
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
        }
    }
}

impl Config {
    /// # Errors
    ///
    /// will return [ConfigError::ZeroInterval] when `interval` is 0
    pub fn new<P: Into<PathBuf>>(interval: u64, key_file: P) -> Result<Config, ConfigError> {
        Ok(Config {
            interval: assert_interval(interval)?,
            key_file: key_file.into(),
        })
    }

    /// Set the `interval`
    pub fn interval(&mut self, value: u64) -> Result<(), ConfigError> {
        self.interval = assert_interval(value)?;
        Ok(())
    }

    /// Set the `key_file`
    pub fn key_file<P: Into<PathBuf>>(&mut self, value: P) {
        self.key_file = value.into();
    }

    pub fn get_interval(&self) -> u64 {
        self.interval.get()
    }

    /// The interval, as the divisor [counter_from_time](crate::counter_from_time) expects
    pub fn get_step(&self) -> NonZeroU64 {
        self.interval
    }

    pub fn get_key_file(&self) -> &Path {
        &self.key_file
    }
}
