//! Wire-level and timing constants shared by the Control and HMI nodes.
//!
//! The two nodes never negotiate anything: they agree on the opcode values,
//! the password length and the phase durations purely by convention. Every
//! value in this module is therefore part of the interoperability contract
//! and must be identical on both ends of the link.
//!
//! # Opcodes
//!
//! | Constant | Value | Sent by | Meaning |
//! |----------|-------|---------|---------|
//! | [`CONTROL_READY`] | `0x10` | Control | ready for the next payload |
//! | [`HMI_READY`] | `0x01` | HMI | about to issue a command |
//! | [`PASSWORDS_MATCHED`] | `0x0F` | Control | comparison succeeded |
//! | [`PASSWORDS_UNMATCHED`] | `0xF0` | Control | comparison failed |
//! | [`SET_PASSWORD`] | `0x33` | HMI | provision or change the password |
//! | [`CHECK_PASSWORD`] | `0x25` | HMI | verify a password |
//! | [`UNLOCK_DOOR`] | `0xCC` | HMI | run the unlock phase sequence |
//! | [`ALARM`] | `0x22` | HMI | run the alarm phase |
//!
//! # Usage
//!
//! ```
//! use doorlock_core::constants::*;
//!
//! let exchange = [HMI_READY, CHECK_PASSWORD];
//! assert_eq!(exchange, [0x01, 0x25]);
//! assert_eq!(PASSWORD_LENGTH, 5);
//! ```

// ============================================================================
// Handshake Tokens
// ============================================================================

/// Ready byte sent by the Control node before it accepts a payload.
pub const CONTROL_READY: u8 = 0x10;

/// Ready byte sent by the HMI node before it issues a command.
pub const HMI_READY: u8 = 0x01;

// ============================================================================
// Status Bytes
// ============================================================================

/// Comparison succeeded.
pub const PASSWORDS_MATCHED: u8 = 0x0F;

/// Comparison failed.
pub const PASSWORDS_UNMATCHED: u8 = 0xF0;

// ============================================================================
// Commands
// ============================================================================

/// Provision or change the stored password.
///
/// Followed by two 5-byte payloads (password, verification), each gated by a
/// [`CONTROL_READY`] from the Control node.
pub const SET_PASSWORD: u8 = 0x33;

/// Verify a password against the stored one.
pub const CHECK_PASSWORD: u8 = 0x25;

/// Begin the unlock phase sequence. No payload, no reply.
pub const UNLOCK_DOOR: u8 = 0xCC;

/// Begin the alarm phase. No payload, no reply.
pub const ALARM: u8 = 0x22;

// ============================================================================
// Password Layout
// ============================================================================

/// Number of digits in a password, and the size of every password payload.
///
/// The byte count of a payload is implied by the opcode; nothing on the wire
/// carries a length.
pub const PASSWORD_LENGTH: usize = 5;

/// Largest value a password digit may take.
pub const MAX_DIGIT: u8 = 9;

/// Store address of the first password byte.
///
/// The password occupies [`PASSWORD_LENGTH`] consecutive bytes starting here,
/// with no header, version or checksum.
pub const DEFAULT_PASSWORD_ADDRESS: u16 = 0x0111;

/// Capacity of the external EEPROM in bytes.
pub const STORE_CAPACITY: usize = 2048;

/// Value of an erased EEPROM cell.
pub const ERASED_BYTE: u8 = 0xFF;

// ============================================================================
// Phase Timing
// ============================================================================

/// Length of one timer overflow period in milliseconds.
///
/// The hardware timer cannot express multi-second delays directly, so every
/// phase is a whole number of these periods.
pub const DEFAULT_OVERFLOW_PERIOD_MS: u64 = 3000;

/// Periods the motor runs while opening or closing the door (15 s).
pub const DEFAULT_DOOR_MOTION_PERIODS: u32 = 5;

/// Periods the door is held open between opening and closing (3 s).
pub const DEFAULT_DOOR_HOLD_PERIODS: u32 = 1;

/// Periods the buzzer sounds during an alarm (60 s).
pub const DEFAULT_ALARM_PERIODS: u32 = 20;

/// Settle time after each EEPROM write, in milliseconds.
pub const DEFAULT_STORE_WRITE_SETTLE_MS: u64 = 10;

/// Settle time after each EEPROM read, in milliseconds.
pub const DEFAULT_STORE_READ_SETTLE_MS: u64 = 15;

/// Minimum time between two accepted key presses, in milliseconds.
///
/// A key held longer than this is read as a second press.
pub const DEFAULT_KEY_PRESS_GUARD_MS: u64 = 500;

// ============================================================================
// Attempt Policy
// ============================================================================

/// Wrong passwords tolerated before the alarm is raised.
///
/// Applies to unlock attempts and to password changes. First-time
/// provisioning is not limited.
pub const DEFAULT_MAX_ATTEMPTS: u8 = 3;

// ============================================================================
// Actuator Drive
// ============================================================================

/// Motor speed (percent) used while the door is moving.
pub const MOTOR_FULL_SPEED: u8 = 100;
