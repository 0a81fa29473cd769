use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Link errors
    #[error("Serial link closed by peer")]
    LinkClosed,

    #[error("Unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    // Password errors
    #[error("Invalid digit {value} at position {position}")]
    InvalidDigit { position: usize, value: u8 },

    // Session errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Hardware errors
    #[error("Hardware operation failed: {message}")]
    Hardware { message: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a hardware error from any displayable cause.
    pub fn hardware(message: impl Into<String>) -> Self {
        Self::Hardware {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
