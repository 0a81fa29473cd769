//! Peripheral abstraction layer for the door lock nodes.
//!
//! The node state machines never touch hardware directly. They are generic
//! over the traits in [`traits`], and this crate provides the
//! implementations used on a host:
//!
//! - [`mock`]: scriptable keypad, virtual LCD, recording motor and buzzer,
//!   in-memory EEPROM, for tests and the simulator
//! - [`eeprom::FileEeprom`]: an EEPROM image persisted to disk
//! - [`devices::AnyStore`]: runtime choice between the two stores
//!
//! It also owns the [`PhaseTimer`], the one timing resource each node has.
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] with the
//! [`HardwareError`] type. Inside the nodes it converts into
//! `doorlock_core::Error` with `?`.

pub mod devices;
pub mod eeprom;
pub mod error;
pub mod mock;
pub mod timer;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use timer::{PhaseTick, PhaseTimer, TickCallback};
pub use traits::{Buzzer, Display, Keypad, Motor, PersistentStore};
pub use types::{KeypadKey, LCD_COLUMNS, LCD_ROWS, MotorDirection};
