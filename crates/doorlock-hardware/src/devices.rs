//! Enum wrappers for runtime device selection.
//!
//! Native `async fn` in traits is not object-safe, so a device picked at
//! runtime (an in-memory store for the simulator, a file image for a
//! long-running Control node) is wrapped in an enum that forwards each
//! trait method to the concrete device.
//!
//! ```
//! use doorlock_hardware::devices::AnyStore;
//! use doorlock_hardware::mock::MockEeprom;
//! use doorlock_hardware::traits::PersistentStore;
//!
//! #[tokio::main]
//! async fn main() -> doorlock_hardware::Result<()> {
//!     let (eeprom, _handle) = MockEeprom::new();
//!     let mut store = AnyStore::Memory(eeprom);
//!
//!     store.write_byte(0x0111, 3).await?;
//!     assert_eq!(store.read_byte(0x0111).await?, 3);
//!     Ok(())
//! }
//! ```

use crate::Result;
use crate::eeprom::FileEeprom;
use crate::mock::MockEeprom;
use crate::traits::PersistentStore;

/// Either store implementation.
#[derive(Debug)]
pub enum AnyStore {
    /// Erased on every start.
    Memory(MockEeprom),
    /// Persisted to an image file.
    File(FileEeprom),
}

impl AnyStore {
    /// Short description for log output.
    pub fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "in-memory EEPROM".to_string(),
            Self::File(eeprom) => format!("EEPROM image {}", eeprom.path().display()),
        }
    }
}

impl PersistentStore for AnyStore {
    async fn read_byte(&mut self, address: u16) -> Result<u8> {
        match self {
            Self::Memory(eeprom) => eeprom.read_byte(address).await,
            Self::File(eeprom) => eeprom.read_byte(address).await,
        }
    }

    async fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        match self {
            Self::Memory(eeprom) => eeprom.write_byte(address, value).await,
            Self::File(eeprom) => eeprom.write_byte(address, value).await,
        }
    }
}
