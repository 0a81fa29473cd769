//! Shared vocabulary for the two-node door lock.
//!
//! Both the Control node and the HMI node depend on this crate for the wire
//! constants, the [`Password`] type, the [`LockConfig`] loaded at startup and
//! the [`StateMachine`] used to track each node's session state.

pub mod config;
pub mod constants;
pub mod error;
pub mod session;
pub mod types;

pub use config::{LockConfig, TimingConfig};
pub use error::{Error, Result};
pub use session::{NodeState, StateMachine, StateTransition};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
