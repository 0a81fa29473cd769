//! Opcode definitions for the inter-node protocol.
//!
//! Every byte the protocol gives meaning to is an [`Opcode`]. Each node only
//! expects a subset at any point of an exchange, so the narrower views
//! [`Command`], [`Status`] and [`ReadyToken`] are used by the state machines.
//!
//! # Exchanges
//!
//! ```text
//! SetPassword    HMI: 01 33 ........... p1..p5 ......... v1..v5
//!                CTL: ......... 10 ............... 10 ........... 0F|F0
//!
//! CheckPassword  HMI: 01 25 ........... p1..p5
//!                CTL: ......... 10 .............. 10 0F|F0
//!
//! UnlockDoor     HMI: 01 CC
//! Alarm          HMI: 01 22
//! ```
//!
//! # Usage Examples
//!
//! ```
//! use doorlock_protocol::{Command, Opcode};
//!
//! let command = Command::try_from(0x25).unwrap();
//! assert_eq!(command, Command::CheckPassword);
//! assert_eq!(u8::from(command), 0x25);
//!
//! assert_eq!(Opcode::from_u8(0x10), Some(Opcode::ControlReady));
//! assert!(Command::try_from(0x10).is_err());
//! ```

use std::fmt;

use doorlock_core::constants::*;
use doorlock_core::{Error, Result};

/// Every byte value with protocol meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    ControlReady = CONTROL_READY,
    HmiReady = HMI_READY,
    PasswordsMatched = PASSWORDS_MATCHED,
    PasswordsUnmatched = PASSWORDS_UNMATCHED,
    SetPassword = SET_PASSWORD,
    CheckPassword = CHECK_PASSWORD,
    UnlockDoor = UNLOCK_DOOR,
    Alarm = ALARM,
}

impl Opcode {
    /// All opcodes in table order.
    pub const ALL: [Opcode; 8] = [
        Opcode::ControlReady,
        Opcode::HmiReady,
        Opcode::PasswordsMatched,
        Opcode::PasswordsUnmatched,
        Opcode::SetPassword,
        Opcode::CheckPassword,
        Opcode::UnlockDoor,
        Opcode::Alarm,
    ];

    /// Look up the opcode for a byte, or `None` if the byte has no meaning.
    #[inline]
    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| *op as u8 == byte)
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Symbolic name as used in the wire tables.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::ControlReady => "CONTROL_READY",
            Opcode::HmiReady => "HMI_READY",
            Opcode::PasswordsMatched => "PASSWORDS_MATCHED",
            Opcode::PasswordsUnmatched => "PASSWORDS_UNMATCHED",
            Opcode::SetPassword => "SET_PASSWORD",
            Opcode::CheckPassword => "CHECK_PASSWORD",
            Opcode::UnlockDoor => "UNLOCK_DOOR",
            Opcode::Alarm => "ALARM",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.to_u8())
    }
}

/// Commands the HMI issues after its ready byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    SetPassword = SET_PASSWORD,
    CheckPassword = CHECK_PASSWORD,
    UnlockDoor = UNLOCK_DOOR,
    Alarm = ALARM,
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            SET_PASSWORD => Ok(Command::SetPassword),
            CHECK_PASSWORD => Ok(Command::CheckPassword),
            UNLOCK_DOOR => Ok(Command::UnlockDoor),
            ALARM => Ok(Command::Alarm),
            other => Err(Error::UnknownOpcode(other)),
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}

impl From<Command> for Opcode {
    fn from(command: Command) -> Opcode {
        match command {
            Command::SetPassword => Opcode::SetPassword,
            Command::CheckPassword => Opcode::CheckPassword,
            Command::UnlockDoor => Opcode::UnlockDoor,
            Command::Alarm => Opcode::Alarm,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Opcode::from(*self).fmt(f)
    }
}

/// Result of a password comparison, as sent by the Control node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    Matched = PASSWORDS_MATCHED,
    Unmatched = PASSWORDS_UNMATCHED,
}

impl Status {
    /// Interpret a single status byte.
    ///
    /// Only [`PASSWORDS_MATCHED`] counts as a match; any other byte is a
    /// failed comparison.
    #[inline]
    pub fn from_byte_lenient(byte: u8) -> Self {
        if byte == PASSWORDS_MATCHED {
            Status::Matched
        } else {
            Status::Unmatched
        }
    }

    #[inline]
    pub fn is_matched(self) -> bool {
        matches!(self, Status::Matched)
    }
}

impl TryFrom<u8> for Status {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            PASSWORDS_MATCHED => Ok(Status::Matched),
            PASSWORDS_UNMATCHED => Ok(Status::Unmatched),
            other => Err(Error::UnknownOpcode(other)),
        }
    }
}

impl From<bool> for Status {
    fn from(matched: bool) -> Self {
        if matched {
            Status::Matched
        } else {
            Status::Unmatched
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status as u8
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Matched => Opcode::PasswordsMatched.fmt(f),
            Status::Unmatched => Opcode::PasswordsUnmatched.fmt(f),
        }
    }
}

/// Ready byte of each node role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReadyToken {
    /// Sent by the Control node before it accepts a payload.
    Control = CONTROL_READY,
    /// Sent by the HMI node before it issues a command.
    Hmi = HMI_READY,
}

impl From<ReadyToken> for u8 {
    fn from(token: ReadyToken) -> u8 {
        token as u8
    }
}

impl fmt::Display for ReadyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadyToken::Control => Opcode::ControlReady.fmt(f),
            ReadyToken::Hmi => Opcode::HmiReady.fmt(f),
        }
    }
}
