use crate::{
    Result,
    constants::{MAX_DIGIT, PASSWORD_LENGTH},
    error::Error,
};
use std::fmt;
use subtle::ConstantTimeEq;

/// Five-digit door password.
///
/// Digits are stored as raw byte values `0..=9`, which is also their wire
/// encoding. Comparison is byte-for-byte with no normalization.
///
/// # Security
/// Equality is constant-time, and neither `Debug` nor `Display` reveal the
/// digits, so a password can be passed to `tracing` macros safely.
#[derive(Clone, Copy, Eq)]
pub struct Password([u8; PASSWORD_LENGTH]);

impl Password {
    /// Create a password from keypad digits.
    ///
    /// # Errors
    /// Returns `Error::InvalidDigit` if any value is greater than 9.
    pub fn new(digits: [u8; PASSWORD_LENGTH]) -> Result<Self> {
        if let Some((position, &value)) = digits
            .iter()
            .enumerate()
            .find(|(_, d)| **d > MAX_DIGIT)
        {
            return Err(Error::InvalidDigit { position, value });
        }
        Ok(Password(digits))
    }

    /// Wrap bytes received from the link.
    ///
    /// The protocol layer performs no validation, so neither does this.
    #[must_use]
    pub fn from_wire(bytes: [u8; PASSWORD_LENGTH]) -> Self {
        Password(bytes)
    }

    /// Raw bytes, in wire and storage order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PASSWORD_LENGTH] {
        &self.0
    }

    /// Byte at `position`, or `None` past the end.
    #[must_use]
    pub fn digit(&self, position: usize) -> Option<u8> {
        self.0.get(position).copied()
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Password(*****)")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&"*".repeat(PASSWORD_LENGTH))
    }
}

impl TryFrom<[u8; PASSWORD_LENGTH]> for Password {
    type Error = Error;

    fn try_from(digits: [u8; PASSWORD_LENGTH]) -> Result<Self> {
        Password::new(digits)
    }
}

impl std::str::FromStr for Password {
    type Err = Error;

    /// Parse a string of exactly five ASCII digits, e.g. `"12345"`.
    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != PASSWORD_LENGTH {
            return Err(Error::Config(format!(
                "Password must be {PASSWORD_LENGTH} digits, got {}",
                bytes.len()
            )));
        }

        let mut digits = [0u8; PASSWORD_LENGTH];
        for (position, (slot, &c)) in digits.iter_mut().zip(bytes).enumerate() {
            if !c.is_ascii_digit() {
                return Err(Error::InvalidDigit { position, value: c });
            }
            *slot = c - b'0';
        }
        Ok(Password(digits))
    }
}
