//! One-time passwords per [rfc-4226](https://tools.ietf.org/html/rfc4226) (HOTP) and its time based
//! variant [rfc-6238](https://tools.ietf.org/html/rfc6238) (TOTP), computed from a 256 bits key
//! supplied once as 64 hex characters and kept in an obfuscated key file.
//!
//! Only HMAC-SHA1 and 6 digits codes are supported, which is what every authenticator app understands.
//!
//! Nothing in this crate reads the clock: the current time is always passed in, in seconds since the Unix epoch.
//!
//! # Examples
//!
//! ```rust
//! use ft_otp::{generate_code, store_key, Config};
//!
//! let record = store_key(&"a1".repeat(32)).unwrap();
//! // `record` is what goes to the key file
//! let code = generate_code(&record, 1_000, &Config::default()).unwrap();
//! assert_eq!(code.to_string(), "606141");
//! ```
//!
//! ```rust
//! use std::num::NonZeroU64;
//! use ft_otp::{compute, counter_from_time, secret};
//!
//! let secret = secret::decode_hex(&"a1".repeat(32)).unwrap();
//! let step = NonZeroU64::new(60).unwrap();
//! let code = compute(&secret, counter_from_time(1_700_000_000, step));
//! assert_eq!(code.to_string(), "445354");
//! ```

mod code;
mod config;
pub mod secret;
pub mod storage;

pub use code::{Code, DIGITS};
pub use config::{Config, ConfigError, DEFAULT_INTERVAL, DEFAULT_KEY_FILE};
pub use secret::{KeyError, RawSecret, StoredKeyRecord};

use std::num::NonZeroU64;

use hmac::Mac;

type HmacSha1 = hmac::Hmac<sha1::Sha1>;

fn sign(key: &[u8], counter: u64) -> [u8; 20] {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(&counter.to_be_bytes());
    let mut digest = [0u8; 20];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    digest
}

/// Dynamic truncation of an HMAC-SHA1 digest, per [rfc-4226](https://tools.ietf.org/html/rfc4226#section-5.3).
fn truncate(digest: &[u8; 20]) -> u32 {
    let offset = (digest[19] & 0x0f) as usize;
    let mut word = [0u8; 4];
    word.copy_from_slice(&digest[offset..offset + 4]);
    u32::from_be_bytes(word) & 0x7fff_ffff
}

/// HOTP value of `counter` under an arbitrary length `key`.
pub fn hotp(key: &[u8], counter: u64) -> Code {
    Code::from_truncated(truncate(&sign(key, counter)))
}

/// Number of whole `interval`s since the epoch.
pub fn counter_from_time(epoch_seconds: u64, interval: NonZeroU64) -> u64 {
    epoch_seconds / interval.get()
}

/// Compute the code of `secret` for `counter`.
pub fn compute(secret: &RawSecret, counter: u64) -> Code {
    hotp(secret.as_ref(), counter)
}

/// Validate a hex key as typed by the user and turn it into the record to persist.
///
/// Whitespace around the key, like the trailing newline of a file, is ignored.
///
/// # Errors
///
/// Will return [KeyError::InvalidKeyFormat] unless the trimmed text is exactly 64 hex characters.
pub fn store_key(raw_key_text: &str) -> Result<StoredKeyRecord, KeyError> {
    let secret = secret::decode_hex(raw_key_text.trim())?;
    log::debug!("hex key accepted");
    Ok(secret::obfuscate(&secret))
}

/// Recover the secret from a stored record and compute the code for the window `epoch_seconds` falls in,
/// windows being `config`'s interval long.
///
/// # Errors
///
/// Will return [KeyError::CorruptStoredKey] if `record` doesn't hold a 32 bytes secret.
pub fn generate_code(
    record: &StoredKeyRecord,
    epoch_seconds: u64,
    config: &Config,
) -> Result<Code, KeyError> {
    let secret = secret::deobfuscate(record)?;
    let counter = counter_from_time(epoch_seconds, config.get_step());
    log::debug!("generating code for counter {}", counter);
    Ok(compute(&secret, counter))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC_KEY: &[u8] = b"12345678901234567890";

    fn a1_secret() -> RawSecret {
        RawSecret::from_bytes([0xa1; 32])
    }

    fn step(seconds: u64) -> NonZeroU64 {
        NonZeroU64::new(seconds).unwrap()
    }

    fn config(interval: u64) -> Config {
        Config::new(interval, DEFAULT_KEY_FILE).unwrap()
    }

    #[test]
    fn rfc4226_vectors() {
        let expected = [
            "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583",
            "399871", "520489",
        ];
        for (counter, code) in expected.iter().enumerate() {
            assert_eq!(hotp(RFC_KEY, counter as u64).to_string(), *code);
        }
    }

    #[test]
    fn rfc4226_truncation() {
        // Appendix D, count 0
        let digest = sign(RFC_KEY, 0);
        assert_eq!(
            digest,
            [
                0xcc, 0x93, 0xcf, 0x18, 0x50, 0x8d, 0x94, 0x93, 0x4c, 0x64, 0xb6, 0x5d, 0x8b,
                0xa7, 0x66, 0x7f, 0xb7, 0xcd, 0xe4, 0xb0
            ]
        );
        assert_eq!(truncate(&digest), 0x4c93_cf18);
        assert_eq!(truncate(&digest), 1_284_755_224);
    }

    #[test]
    fn truncate_last_offset() {
        // offset 15 reads the 4 bytes right before the offset nibble
        let mut digest = [0u8; 20];
        digest[15..19].copy_from_slice(&[0xff, 0x00, 0x00, 0x01]);
        digest[19] = 0x0f;
        assert_eq!(truncate(&digest), 0x7f00_0001);
    }

    #[test]
    fn truncate_masks_high_bit() {
        let mut digest = [0xffu8; 20];
        digest[19] = 0xf0;
        assert_eq!(truncate(&digest), 0x7fff_ffff);
    }

    #[test]
    fn rfc6238_sha1_vectors() {
        let expected = [
            (59, "287082"),
            (1_111_111_109, "081804"),
            (1_111_111_111, "050471"),
            (1_234_567_890, "005924"),
            (2_000_000_000, "279037"),
            (20_000_000_000, "353130"),
        ];
        for (time, code) in expected {
            assert_eq!(hotp(RFC_KEY, counter_from_time(time, step(30))).to_string(), code);
        }
    }

    #[test]
    fn counter_from_time_floors() {
        assert_eq!(counter_from_time(0, step(30)), 0);
        assert_eq!(counter_from_time(29, step(30)), 0);
        assert_eq!(counter_from_time(30, step(30)), 1);
        assert_eq!(counter_from_time(1_700_000_000, step(30)), 56_666_666);
        assert_eq!(counter_from_time(1_700_000_000, step(60)), 28_333_333);
        assert_eq!(counter_from_time(u64::MAX, step(1)), u64::MAX);
    }

    #[test]
    fn compute_a1_key() {
        let secret = a1_secret();
        assert_eq!(compute(&secret, 0).to_string(), "005562");
        assert_eq!(compute(&secret, 1).to_string(), "914064");
        assert_eq!(compute(&secret, 1 << 32).to_string(), "408723");
        // digest ends with 0x8f, offset 15
        assert_eq!(compute(&secret, 28_333_333).to_string(), "445354");
    }

    #[test]
    fn compute_is_deterministic_and_well_formed() {
        let secret = secret::decode_hex(
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        )
        .unwrap();
        assert_eq!(compute(&secret, 0).to_string(), "414783");
        assert_eq!(compute(&secret, 1).to_string(), "555770");
        for counter in [0, 1, 59, 1 << 31, 1 << 32, u64::MAX - 1, u64::MAX] {
            let code = compute(&secret, counter).to_string();
            assert_eq!(code, compute(&secret, counter).to_string());
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()), "{}", code);
        }
    }

    #[test]
    fn store_key_trims_input() {
        let record = store_key(&format!("  {}\n", "a1".repeat(32))).unwrap();
        assert_eq!(
            record.as_bytes(),
            b"UGQ2DINBUGQ2DINBUGQ2DINBUGQ2DINBUGQ2DINBUGQ2DINBUGQQ"
        );
    }

    #[test]
    fn store_key_rejects_bad_length() {
        let key = "a1".repeat(32);
        assert_eq!(store_key(&key[..63]), Err(KeyError::InvalidKeyFormat));
        assert_eq!(
            store_key(&format!("{}a", key)),
            Err(KeyError::InvalidKeyFormat)
        );
        assert_eq!(store_key(""), Err(KeyError::InvalidKeyFormat));
    }

    #[test]
    fn store_then_generate_twice() {
        let record = store_key(&"a1".repeat(32)).unwrap();
        let bytes = record.clone().into_bytes();

        let first = generate_code(&record, 1_000, &config(30)).unwrap();
        let second = generate_code(&StoredKeyRecord::from(bytes), 1_000, &config(30)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "606141");
    }

    #[test]
    fn generate_code_interval_is_explicit() {
        let record = store_key(&"a1".repeat(32)).unwrap();
        assert_eq!(
            generate_code(&record, 1_700_000_000, &Config::default())
                .unwrap()
                .to_string(),
            "060947"
        );
        assert_eq!(
            generate_code(&record, 1_700_000_000, &config(60))
                .unwrap()
                .to_string(),
            "445354"
        );
    }

    #[test]
    fn generate_code_zero_interval_is_refused() {
        // a zero interval can't reach the division
        assert_eq!(Config::new(0, DEFAULT_KEY_FILE), Err(ConfigError::ZeroInterval));
        let mut config = config(30);
        assert_eq!(config.interval(0), Err(ConfigError::ZeroInterval));

        let record = store_key(&"a1".repeat(32)).unwrap();
        assert_eq!(
            generate_code(&record, 1_000, &config).unwrap().to_string(),
            "606141"
        );
    }

    #[test]
    fn generate_code_window_edges() {
        let record = store_key(&"a1".repeat(32)).unwrap();
        let config = config(30);
        assert_eq!(generate_code(&record, 0, &config).unwrap().to_string(), "005562");
        assert_eq!(generate_code(&record, 29, &config).unwrap().to_string(), "005562");
        assert_eq!(generate_code(&record, 30, &config).unwrap().to_string(), "914064");
        assert!(generate_code(&record, u64::MAX, &config).is_ok());
    }

    #[test]
    fn generate_code_corrupt_record() {
        let record = StoredKeyRecord::from(&b"not a key"[..]);
        assert_eq!(
            generate_code(&record, 1_000, &config(30)),
            Err(KeyError::CorruptStoredKey)
        );
    }
}
