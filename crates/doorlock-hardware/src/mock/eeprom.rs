//! In-memory EEPROM with an access log.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::Instant;

use doorlock_core::constants::{ERASED_BYTE, PASSWORD_LENGTH, STORE_CAPACITY};

use crate::traits::PersistentStore;
use crate::{HardwareError, Result};

/// One store access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Read { address: u16 },
    Write { address: u16, value: u8 },
}

/// A [`StoreOp`] with the time it was issued.
#[derive(Debug, Clone, Copy)]
pub struct StoreAccess {
    pub op: StoreOp,
    pub at: Instant,
}

#[derive(Debug)]
struct EepromState {
    image: Vec<u8>,
    log: VecDeque<StoreAccess>,
    reads: usize,
    writes: usize,
}

impl EepromState {
    fn record(&mut self, op: StoreOp) {
        match op {
            StoreOp::Read { .. } => self.reads += 1,
            StoreOp::Write { .. } => self.writes += 1,
        }
        super::record(
            &mut self.log,
            StoreAccess {
                op,
                at: Instant::now(),
            },
        );
    }
}

/// Erased 2048-byte EEPROM held in memory.
#[derive(Debug)]
pub struct MockEeprom {
    state: Arc<Mutex<EepromState>>,
}

impl MockEeprom {
    pub fn new() -> (Self, EepromHandle) {
        let state = Arc::new(Mutex::new(EepromState {
            image: vec![ERASED_BYTE; STORE_CAPACITY],
            log: VecDeque::with_capacity(super::LOG_CAPACITY),
            reads: 0,
            writes: 0,
        }));
        let handle = EepromHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }

    /// Create an EEPROM that already holds `bytes` at `address`.
    ///
    /// The preload is not recorded in the access log.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::AddressOutOfRange` if the bytes do not fit.
    pub fn with_contents(address: u16, bytes: &[u8]) -> Result<(Self, EepromHandle)> {
        let (eeprom, handle) = Self::new();
        let start = usize::from(address);
        let end = start + bytes.len();
        if end > STORE_CAPACITY {
            return Err(HardwareError::address_out_of_range(address, STORE_CAPACITY));
        }
        lock(&eeprom.state).image[start..end].copy_from_slice(bytes);
        Ok((eeprom, handle))
    }
}

fn lock(state: &Mutex<EepromState>) -> MutexGuard<'_, EepromState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn offset(address: u16) -> Result<usize> {
    let offset = usize::from(address);
    if offset >= STORE_CAPACITY {
        return Err(HardwareError::address_out_of_range(address, STORE_CAPACITY));
    }
    Ok(offset)
}

impl PersistentStore for MockEeprom {
    async fn read_byte(&mut self, address: u16) -> Result<u8> {
        let offset = offset(address)?;
        let mut state = lock(&self.state);
        state.record(StoreOp::Read { address });
        Ok(state.image[offset])
    }

    async fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        let offset = offset(address)?;
        let mut state = lock(&self.state);
        state.record(StoreOp::Write { address, value });
        state.image[offset] = value;
        Ok(())
    }
}

/// Inspection handle for a [`MockEeprom`].
#[derive(Debug, Clone)]
pub struct EepromHandle {
    state: Arc<Mutex<EepromState>>,
}

impl EepromHandle {
    /// Password-sized block starting at `address`, without logging a read.
    pub fn block(&self, address: u16) -> [u8; PASSWORD_LENGTH] {
        let state = lock(&self.state);
        let mut block = [ERASED_BYTE; PASSWORD_LENGTH];
        let start = usize::from(address);
        for (i, slot) in block.iter_mut().enumerate() {
            if let Some(&byte) = state.image.get(start + i) {
                *slot = byte;
            }
        }
        block
    }

    /// The most recent accesses, oldest first, up to
    /// [`LOG_CAPACITY`](super::LOG_CAPACITY).
    pub fn accesses(&self) -> Vec<StoreAccess> {
        lock(&self.state).log.iter().copied().collect()
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        lock(&self.state).log.iter().map(|access| access.op).collect()
    }

    /// Reads since creation or the last [`clear_log`](Self::clear_log).
    pub fn read_count(&self) -> usize {
        lock(&self.state).reads
    }

    /// Writes since creation or the last [`clear_log`](Self::clear_log).
    pub fn write_count(&self) -> usize {
        lock(&self.state).writes
    }

    pub fn clear_log(&self) {
        let mut state = lock(&self.state);
        state.log.clear();
        state.reads = 0;
        state.writes = 0;
    }
}
