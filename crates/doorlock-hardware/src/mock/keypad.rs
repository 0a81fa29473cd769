//! Mock keypad implementation for testing and simulation.
//!
//! Keys are injected through a [`MockKeypadHandle`]. While the keypad is
//! disabled the handle drops every key it is given, the same way the real
//! keypad loses presses while its input is masked.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::trace;

use crate::{HardwareError, KeypadKey, Result, traits::Keypad};

/// Depth of the injected key queue.
const KEY_QUEUE_DEPTH: usize = 64;

/// Mock keypad device.
///
/// # Examples
///
/// ```
/// use doorlock_hardware::mock::MockKeypad;
/// use doorlock_hardware::traits::Keypad;
/// use doorlock_hardware::KeypadKey;
///
/// #[tokio::main]
/// async fn main() -> doorlock_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.send_password(&[1, 2, 3, 4, 5]).await?;
///
///     for digit in 1..=5 {
///         assert_eq!(keypad.read_key().await?, KeypadKey::Digit(digit));
///     }
///     assert_eq!(keypad.read_key().await?, KeypadKey::Enter);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    key_rx: mpsc::Receiver<KeypadKey>,
    enabled: Arc<AtomicBool>,
}

impl MockKeypad {
    /// Create a new, enabled mock keypad and its handle.
    pub fn new() -> (Self, MockKeypadHandle) {
        let (key_tx, key_rx) = mpsc::channel(KEY_QUEUE_DEPTH);
        let enabled = Arc::new(AtomicBool::new(true));

        let keypad = Self {
            key_rx,
            enabled: Arc::clone(&enabled),
        };
        let handle = MockKeypadHandle { key_tx, enabled };

        (keypad, handle)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

impl Keypad for MockKeypad {
    async fn read_key(&mut self) -> Result<KeypadKey> {
        self.key_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected("Keypad input channel closed"))
    }

    async fn enable(&mut self) -> Result<()> {
        self.enabled.store(true, Ordering::Release);
        Ok(())
    }

    async fn disable(&mut self) -> Result<()> {
        self.enabled.store(false, Ordering::Release);
        Ok(())
    }
}

/// Handle for pressing keys on a [`MockKeypad`].
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    key_tx: mpsc::Sender<KeypadKey>,
    enabled: Arc<AtomicBool>,
}

impl MockKeypadHandle {
    /// Press one key.
    ///
    /// Returns `Ok(false)` if the keypad is disabled and the key was dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub async fn send_key(&self, key: KeypadKey) -> Result<bool> {
        if !self.enabled.load(Ordering::Acquire) {
            trace!(%key, "keypad disabled, key dropped");
            return Ok(false);
        }
        self.key_tx
            .send(key)
            .await
            .map_err(|_| HardwareError::disconnected("Keypad input channel closed"))?;
        Ok(true)
    }

    /// Press a sequence of digit keys.
    ///
    /// # Errors
    ///
    /// Returns an error if any digit is greater than 9 or the keypad has
    /// been dropped.
    pub async fn send_digits(&self, digits: &[u8]) -> Result<()> {
        for &digit in digits {
            self.send_key(KeypadKey::digit(digit)?).await?;
        }
        Ok(())
    }

    /// Press a full password entry: the digits followed by `=`.
    pub async fn send_password(&self, digits: &[u8]) -> Result<()> {
        self.send_digits(digits).await?;
        self.send_key(KeypadKey::Enter).await?;
        Ok(())
    }

    /// Press keys by glyph, skipping characters that are not keys.
    pub async fn send_str(&self, keys: &str) -> Result<()> {
        for key in keys.chars().filter_map(KeypadKey::from_char) {
            self.send_key(key).await?;
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}
