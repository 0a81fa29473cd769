//! EEPROM image persisted to a file.
//!
//! Lets a host-side Control node keep its password across restarts. The file
//! is a raw image of the part, created erased on first use.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, info};

use doorlock_core::constants::{ERASED_BYTE, STORE_CAPACITY};

use crate::error::{HardwareError, Result};
use crate::traits::PersistentStore;

/// File-backed [`PersistentStore`].
///
/// Reads are served from an in-memory copy; every write goes through to the
/// file before returning.
#[derive(Debug)]
pub struct FileEeprom {
    path: PathBuf,
    file: File,
    image: Vec<u8>,
}

impl FileEeprom {
    /// Open an image, creating an erased one if `path` does not exist.
    ///
    /// # Errors
    ///
    /// - `HardwareError::Io` if the file cannot be opened or created
    /// - `HardwareError::InvalidData` if an existing file is not exactly one
    ///   part in size
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .await?;

        let mut image = Vec::with_capacity(STORE_CAPACITY);
        file.read_to_end(&mut image).await?;

        if image.is_empty() {
            info!("Creating erased EEPROM image at {}", path.display());
            image = vec![ERASED_BYTE; STORE_CAPACITY];
            file.write_all(&image).await?;
            file.sync_data().await?;
        } else if image.len() != STORE_CAPACITY {
            return Err(HardwareError::invalid_data(format!(
                "EEPROM image {} is {} bytes, expected {}",
                path.display(),
                image.len(),
                STORE_CAPACITY
            )));
        } else {
            debug!("Loaded EEPROM image from {}", path.display());
        }

        Ok(Self { path, file, image })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents of the part.
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    fn offset(address: u16) -> Result<usize> {
        let offset = usize::from(address);
        if offset >= STORE_CAPACITY {
            return Err(HardwareError::address_out_of_range(address, STORE_CAPACITY));
        }
        Ok(offset)
    }
}

impl PersistentStore for FileEeprom {
    async fn read_byte(&mut self, address: u16) -> Result<u8> {
        let offset = Self::offset(address)?;
        Ok(self.image[offset])
    }

    async fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        let offset = Self::offset(address)?;
        self.file.seek(SeekFrom::Start(offset as u64)).await?;
        self.file.write_all(&[value]).await?;
        self.file.sync_data().await?;
        self.image[offset] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_image_is_erased() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eeprom.bin");

        let mut eeprom = FileEeprom::open(&path).await.unwrap();
        assert_eq!(eeprom.read_byte(0x0111).await.unwrap(), 0xFF);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), STORE_CAPACITY as u64);
    }

    #[tokio::test]
    async fn test_writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eeprom.bin");

        {
            let mut eeprom = FileEeprom::open(&path).await.unwrap();
            for (i, digit) in [1u8, 2, 3, 4, 5].into_iter().enumerate() {
                eeprom.write_byte(0x0111 + i as u16, digit).await.unwrap();
            }
        }

        let mut eeprom = FileEeprom::open(&path).await.unwrap();
        let mut stored = Vec::new();
        for i in 0..5 {
            stored.push(eeprom.read_byte(0x0111 + i).await.unwrap());
        }
        assert_eq!(stored, vec![1, 2, 3, 4, 5]);
        assert_eq!(eeprom.image()[0x0110], 0xFF);
    }

    #[tokio::test]
    async fn test_out_of_range_address() {
        let dir = tempfile::tempdir().unwrap();
        let mut eeprom = FileEeprom::open(dir.path().join("eeprom.bin")).await.unwrap();

        assert!(matches!(
            eeprom.write_byte(0x0800, 1).await,
            Err(HardwareError::AddressOutOfRange { address: 0x0800, .. })
        ));
    }

    #[tokio::test]
    async fn test_wrong_size_image_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eeprom.bin");
        std::fs::write(&path, [0u8; 16]).unwrap();

        assert!(matches!(
            FileEeprom::open(&path).await,
            Err(HardwareError::InvalidData { .. })
        ));
    }
}
