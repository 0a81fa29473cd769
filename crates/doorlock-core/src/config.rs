//! Lock configuration.
//!
//! Both nodes must be started with the same [`TimingConfig`]: the HMI mirrors
//! the Control node's door and alarm phases purely by running timers of the
//! same length, so diverging values desynchronize the display from the
//! actuators.
//!
//! Every field has a default matching the lock hardware, so an empty JSON
//! object is a valid configuration.
//!
//! ```
//! use doorlock_core::LockConfig;
//!
//! let config = LockConfig::from_json_str(r#"{ "timing": { "alarm_periods": 10 } }"#).unwrap();
//! assert_eq!(config.timing.alarm_periods, 10);
//! assert_eq!(config.max_attempts, 3);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::*;
use crate::{Error, Result};

/// Top-level configuration shared by both nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockConfig {
    /// Wrong passwords tolerated before the alarm, for unlock and change.
    pub max_attempts: u8,

    /// Store address of the first password byte.
    pub password_address: u16,

    /// Phase and settle timing.
    pub timing: TimingConfig,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            password_address: DEFAULT_PASSWORD_ADDRESS,
            timing: TimingConfig::default(),
        }
    }
}

impl LockConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// Returns `Error::Config` if the JSON is malformed or a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LockConfig =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, `Error::Config` if it is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".into()));
        }

        let end = self.password_address as usize + PASSWORD_LENGTH;
        if end > STORE_CAPACITY {
            return Err(Error::Config(format!(
                "password block 0x{:04X}..0x{end:04X} exceeds store capacity of {STORE_CAPACITY} bytes",
                self.password_address
            )));
        }

        self.timing.validate()
    }
}

/// Phase and settle timing.
///
/// Phases are expressed as a count of overflow periods, the way the timer
/// hardware composes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub overflow_period_ms: u64,
    pub door_motion_periods: u32,
    pub door_hold_periods: u32,
    pub alarm_periods: u32,
    pub store_write_settle_ms: u64,
    pub store_read_settle_ms: u64,
    pub key_press_guard_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            overflow_period_ms: DEFAULT_OVERFLOW_PERIOD_MS,
            door_motion_periods: DEFAULT_DOOR_MOTION_PERIODS,
            door_hold_periods: DEFAULT_DOOR_HOLD_PERIODS,
            alarm_periods: DEFAULT_ALARM_PERIODS,
            store_write_settle_ms: DEFAULT_STORE_WRITE_SETTLE_MS,
            store_read_settle_ms: DEFAULT_STORE_READ_SETTLE_MS,
            key_press_guard_ms: DEFAULT_KEY_PRESS_GUARD_MS,
        }
    }
}

impl TimingConfig {
    /// Check that every period and phase is non-zero.
    ///
    /// # Errors
    /// Returns `Error::Config` naming the zero field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("overflow_period_ms", self.overflow_period_ms),
            ("door_motion_periods", u64::from(self.door_motion_periods)),
            ("door_hold_periods", u64::from(self.door_hold_periods)),
            ("alarm_periods", u64::from(self.alarm_periods)),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(Error::Config(format!("{name} must be greater than zero")));
            }
        }
        Ok(())
    }

    pub fn overflow_period(&self) -> Duration {
        Duration::from_millis(self.overflow_period_ms)
    }

    pub fn store_write_settle(&self) -> Duration {
        Duration::from_millis(self.store_write_settle_ms)
    }

    pub fn store_read_settle(&self) -> Duration {
        Duration::from_millis(self.store_read_settle_ms)
    }

    pub fn key_press_guard(&self) -> Duration {
        Duration::from_millis(self.key_press_guard_ms)
    }

    /// Total length of a phase of `periods` overflow periods.
    pub fn phase_length(&self, periods: u32) -> Duration {
        self.overflow_period() * periods
    }
}
