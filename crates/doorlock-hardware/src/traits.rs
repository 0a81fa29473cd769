//! Peripheral trait definitions.
//!
//! These traits are the only way the node state machines touch hardware.
//! Each node owns its peripherals exclusively, so every mutating operation
//! takes `&mut self`.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.
//!
//! # Object Safety
//!
//! **NOTE**: These traits are NOT object-safe because `async fn` methods
//! return opaque futures. Take them as generic parameters:
//!
//! ```no_run
//! use doorlock_hardware::{KeypadKey, Result};
//! use doorlock_hardware::traits::Keypad;
//!
//! async fn wait_for_enter<K: Keypad>(keypad: &mut K) -> Result<()> {
//!     while keypad.read_key().await? != KeypadKey::Enter {}
//!     Ok(())
//! }
//! ```
//!
//! When the concrete device is picked at runtime, wrap the candidates in an
//! enum as [`AnyStore`](crate::devices::AnyStore) does.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{KeypadKey, MotorDirection};

/// Keypad of the HMI node.
pub trait Keypad: Send {
    /// Wait for the next debounced key press.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected.
    async fn read_key(&mut self) -> Result<KeypadKey>;

    /// Accept key presses again after [`disable`](Self::disable).
    async fn enable(&mut self) -> Result<()>;

    /// Ignore key presses until [`enable`](Self::enable) is called.
    ///
    /// Keys pressed while disabled are discarded, not queued.
    async fn disable(&mut self) -> Result<()>;
}

/// Character display of the HMI node.
pub trait Display: Send {
    /// Blank the screen and home the cursor.
    async fn clear(&mut self) -> Result<()>;

    /// Write `text` starting at `(row, col)` and leave the cursor after it.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the screen.
    async fn write_at(&mut self, row: usize, col: usize, text: &str) -> Result<()>;

    /// Write one character at the cursor.
    async fn write_char(&mut self, c: char) -> Result<()>;
}

/// Door motor of the Control node.
pub trait Motor: Send {
    /// Drive the motor. `speed` is a duty cycle percentage (0-100).
    async fn drive(&mut self, direction: MotorDirection, speed: u8) -> Result<()>;
}

/// Alarm buzzer of the Control node.
pub trait Buzzer: Send {
    async fn on(&mut self) -> Result<()>;
    async fn off(&mut self) -> Result<()>;
}

/// Byte-addressed non-volatile store of the Control node.
///
/// The part needs a settle delay after every operation before the next one
/// is issued. Implementations do not enforce it; callers do.
pub trait PersistentStore: Send {
    /// Read one byte.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::AddressOutOfRange` past the end of the part.
    async fn read_byte(&mut self, address: u16) -> Result<u8>;

    /// Write one byte.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::AddressOutOfRange` past the end of the part.
    async fn write_byte(&mut self, address: u16, value: u8) -> Result<()>;
}
