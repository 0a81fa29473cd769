//! Error types for peripheral operations.
//!
//! Peripheral failures are environmental: a disconnected device, a store
//! address outside the part, a timer misused by the caller. The nodes
//! convert them into [`doorlock_core::Error::Hardware`] with `?`.

/// Result type alias for peripheral operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during peripheral operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Store address beyond the end of the part.
    #[error("Address 0x{address:04X} out of range (capacity {capacity} bytes)")]
    AddressOutOfRange { address: u16, capacity: usize },

    /// A phase was configured while the previous one is still running.
    #[error("Phase timer is still running")]
    TimerBusy,

    /// A phase was started without being configured.
    #[error("Phase timer has no phase configured")]
    TimerNotConfigured,

    /// Device configuration error.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Invalid data received from or sent to a device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn address_out_of_range(address: u16, capacity: usize) -> Self {
        Self::AddressOutOfRange { address, capacity }
    }

    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new generic error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<HardwareError> for doorlock_core::Error {
    fn from(error: HardwareError) -> Self {
        doorlock_core::Error::hardware(error.to_string())
    }
}
