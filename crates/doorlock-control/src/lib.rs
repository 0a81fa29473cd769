//! Control node of the door lock.
//!
//! The Control node owns the motor, the buzzer and the password store. It
//! never initiates an exchange: it waits for the HMI's ready byte, runs the
//! command that follows and goes back to waiting.
//!
//! ```no_run
//! use doorlock_control::ControlNode;
//! use doorlock_core::LockConfig;
//! use doorlock_hardware::mock::{MockBuzzer, MockEeprom, MockMotor};
//! use doorlock_protocol::SerialLink;
//!
//! # async fn example() -> doorlock_core::Result<()> {
//! let (control_end, _hmi_end) = SerialLink::pair();
//! let (store, _) = MockEeprom::new();
//! let (motor, _) = MockMotor::new();
//! let (buzzer, _) = MockBuzzer::new();
//!
//! let mut node = ControlNode::new(control_end, store, motor, buzzer, LockConfig::default())?;
//! node.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod node;
pub mod state;

pub use node::{ControlNode, Dispatch, Outcome};
pub use state::ControlState;
