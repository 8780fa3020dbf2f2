use core::fmt;

use constant_time_eq::constant_time_eq;

/// Number of digits in a code.
pub const DIGITS: usize = 6;

const MODULUS: u32 = 1_000_000;

/// A 6 digits one-time password, `000000` to `999999`.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Code(u32);

impl Code {
    /// Reduce a truncated HMAC value into a code.
    pub(crate) fn from_truncated(value: u32) -> Self {
        Code(value % MODULUS)
    }

    /// Numeric value of the code, without the leading zeros.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl PartialEq for Code {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.0.to_be_bytes(), &other.0.to_be_bytes())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{1:00$}", DIGITS, self.0)
    }
}
