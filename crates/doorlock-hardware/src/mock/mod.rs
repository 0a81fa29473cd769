//! Mock device implementations for testing and simulation.
//!
//! Every mock comes with a cloneable handle that observes (or, for the
//! keypad, drives) the device from outside the node that owns it.

use std::collections::VecDeque;

pub mod actuators;
pub mod display;
pub mod eeprom;
pub mod keypad;

// Re-export commonly used types
pub use actuators::{BuzzerEvent, BuzzerHandle, MockBuzzer, MockMotor, MotorEvent, MotorHandle};
pub use display::{LcdEvent, LcdHandle, LcdOp, VirtualLcd};
pub use eeprom::{EepromHandle, MockEeprom, StoreAccess, StoreOp};
pub use keypad::{MockKeypad, MockKeypadHandle};

/// Entries kept in each mock's event log. Older entries are dropped first.
pub const LOG_CAPACITY: usize = 512;

fn record<T>(log: &mut VecDeque<T>, entry: T) {
    if log.len() == LOG_CAPACITY {
        log.pop_front();
    }
    log.push_back(entry);
}
