//! HMI node of the door lock.
//!
//! The HMI node owns the keypad and the display. It provisions the password
//! on first boot, then loops a two-choice menu: open the door (bounded
//! password attempts, then the alarm) or change the password (same bound).
//!
//! ```no_run
//! use doorlock_core::LockConfig;
//! use doorlock_hardware::mock::{MockKeypad, VirtualLcd};
//! use doorlock_hmi::HmiNode;
//! use doorlock_protocol::SerialLink;
//!
//! # async fn example() -> doorlock_core::Result<()> {
//! let (_control_end, hmi_end) = SerialLink::pair();
//! let (keypad, _keys) = MockKeypad::new();
//! let (lcd, _screen) = VirtualLcd::new();
//!
//! let mut node = HmiNode::new(hmi_end, keypad, lcd, LockConfig::default())?;
//! node.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod node;
pub mod screen;
pub mod state;

pub use node::{HmiNode, MenuOutcome};
pub use screen::Prompt;
pub use state::HmiState;
