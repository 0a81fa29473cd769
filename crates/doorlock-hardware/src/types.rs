//! Value types exchanged with peripherals.

use std::fmt;

use crate::error::{HardwareError, Result};

/// Rows of the character display.
pub const LCD_ROWS: usize = 2;

/// Columns of the character display.
pub const LCD_COLUMNS: usize = 16;

/// A key on the 4x4 calculator-style keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadKey {
    /// Numeric digit (0-9).
    Digit(u8),

    /// `=`, confirms a password entry.
    Enter,

    /// `+`, selects "open door" in the menu.
    Plus,

    /// `-`, selects "change password" in the menu.
    Minus,

    /// `*`
    Multiply,

    /// `/`
    Divide,

    /// `ON/C`
    Clear,
}

impl KeypadKey {
    /// Create a digit key.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit is greater than 9.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_hardware::KeypadKey;
    ///
    /// assert_eq!(KeypadKey::digit(7).unwrap().as_digit(), Some(7));
    /// assert!(KeypadKey::digit(10).is_err());
    /// ```
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(HardwareError::invalid_data(format!(
                "Digit must be 0-9, got {}",
                d
            )));
        }
        Ok(Self::Digit(d))
    }

    /// Map a key glyph to a key.
    ///
    /// Accepts `0-9`, `=`, `+`, `-`, `*`, `/` and `c`/`C` for clear.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => c.to_digit(10).map(|d| Self::Digit(d as u8)),
            '=' => Some(Self::Enter),
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            'c' | 'C' => Some(Self::Clear),
            _ => None,
        }
    }

    /// Get the digit value if this is a digit key.
    pub fn as_digit(&self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for KeypadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{}", d),
            Self::Enter => f.write_str("="),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Multiply => f.write_str("*"),
            Self::Divide => f.write_str("/"),
            Self::Clear => f.write_str("ON/C"),
        }
    }
}

/// Direction of the door motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorDirection {
    /// Motor de-energized.
    Stop,

    /// Clockwise, opens the door.
    Forward,

    /// Anti-clockwise, closes the door.
    Reverse,
}

impl fmt::Display for MotorDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => f.write_str("stop"),
            Self::Forward => f.write_str("forward"),
            Self::Reverse => f.write_str("reverse"),
        }
    }
}
