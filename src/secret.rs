//! Conversion between the hex key a user supplies, the raw secret fed to the
//! HMAC, and the record that ends up in the key file.
//!
//! # Examples
//!
//! ```
//! use ft_otp::secret::{self, StoredKeyRecord};
//!
//! let hex_key = "a1".repeat(32);
//! assert!(secret::validate(&hex_key));
//!
//! let raw = secret::decode_hex(&hex_key).unwrap();
//! let record = secret::obfuscate(&raw);
//! assert_eq!(record.as_bytes(), b"UGQ2DINBUGQ2DINBUGQ2DINBUGQ2DINBUGQ2DINBUGQ2DINBUGQQ");
//!
//! let back = secret::deobfuscate(&StoredKeyRecord::from(record.as_bytes())).unwrap();
//! assert_eq!(raw, back);
//! ```

use base32::{self, Alphabet};

use constant_time_eq::constant_time_eq;

/// Number of bytes in a secret.
pub const SECRET_LEN: usize = 32;

/// Number of hex characters in a key as typed by the user.
pub const HEX_KEY_LEN: usize = SECRET_LEN * 2;

const RECORD_ALPHABET: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Different ways a key failed to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyError {
    /// The key is not exactly 64 hexadecimal characters.
    InvalidKeyFormat,
    /// The stored record can't be turned back into a 32 bytes secret.
    CorruptStoredKey,
}

impl std::error::Error for KeyError {}

impl std::fmt::Display for KeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyError::InvalidKeyFormat => {
                write!(f, "key must be {} hexadecimal characters.", HEX_KEY_LEN)
            }
            KeyError::CorruptStoredKey => write!(
                f,
                "stored key is corrupt, it does not decode to a {} bytes secret.",
                SECRET_LEN
            ),
        }
    }
}

/// Decoded 256 bits secret, used as the HMAC key.
///
/// Its `Debug` output is redacted, and there is no `Display`: the secret is never meant to be printed.
#[derive(Clone, Eq)]
#[cfg_attr(feature = "zeroize", derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop))]
pub struct RawSecret([u8; SECRET_LEN]);

impl RawSecret {
    pub fn from_bytes(bytes: [u8; SECRET_LEN]) -> Self {
        RawSecret(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for RawSecret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for RawSecret {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for RawSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RawSecret(<redacted>)")
    }
}

/// What gets written to the key file.
///
/// The secret is re-encoded as unpadded RFC 4648 base32, so the file never holds the hex key the user typed.
/// This is obfuscation, not encryption: anyone who can read the file can recover the secret.
/// Protect the file itself with filesystem permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredKeyRecord(Vec<u8>);

impl StoredKeyRecord {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for StoredKeyRecord {
    fn from(bytes: Vec<u8>) -> Self {
        StoredKeyRecord(bytes)
    }
}

impl From<&[u8]> for StoredKeyRecord {
    fn from(bytes: &[u8]) -> Self {
        StoredKeyRecord(bytes.to_vec())
    }
}

/// Will check that `text` is exactly 64 characters long and only made of hex digits, either case.
pub fn validate(text: &str) -> bool {
    text.len() == HEX_KEY_LEN && text.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decode a validated hex key into its 32 bytes.
///
/// # Errors
///
/// Will return [KeyError::InvalidKeyFormat] if [validate] rejects `text`.
pub fn decode_hex(text: &str) -> Result<RawSecret, KeyError> {
    if !validate(text) {
        return Err(KeyError::InvalidKeyFormat);
    }
    let mut bytes = [0u8; SECRET_LEN];
    hex::decode_to_slice(text, &mut bytes).map_err(|_| KeyError::InvalidKeyFormat)?;
    Ok(RawSecret(bytes))
}

/// Turn a secret into the record to persist.
pub fn obfuscate(secret: &RawSecret) -> StoredKeyRecord {
    StoredKeyRecord(base32::encode(RECORD_ALPHABET, &secret.0).into_bytes())
}

/// Inverse of [obfuscate]. Leading and trailing ASCII whitespace in the record is ignored.
///
/// # Errors
///
/// Will return [KeyError::CorruptStoredKey] if the record isn't base32, doesn't hold exactly 32 bytes,
/// or isn't exactly what [obfuscate] writes for those bytes (lowercase, padding, stray trailing bits).
pub fn deobfuscate(record: &StoredKeyRecord) -> Result<RawSecret, KeyError> {
    let text = std::str::from_utf8(&record.0)
        .map_err(|_| KeyError::CorruptStoredKey)?
        .trim();
    let decoded = base32::decode(RECORD_ALPHABET, text).ok_or(KeyError::CorruptStoredKey)?;
    let bytes: [u8; SECRET_LEN] = decoded
        .as_slice()
        .try_into()
        .map_err(|_| KeyError::CorruptStoredKey)?;
    let secret = RawSecret(bytes);
    // the last character carries 4 unused bits, only the all zero form is ours
    if !constant_time_eq(obfuscate(&secret).as_bytes(), text.as_bytes()) {
        return Err(KeyError::CorruptStoredKey);
    }
    Ok(secret)
}
