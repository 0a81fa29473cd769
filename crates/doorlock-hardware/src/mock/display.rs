//! Virtual 2x16 character LCD.
//!
//! [`VirtualLcd`] keeps a character buffer and cursor like an HD44780-style
//! controller. A cloneable [`LcdHandle`] reads the screen from outside the
//! node: tests assert on it and the simulator renders it.
//!
//! # Character Encoding
//!
//! Only printable ASCII (0x20-0x7E) is accepted; anything else is rejected
//! with `HardwareError::InvalidData`, since the controller's character ROM
//! has no other glyphs the nodes can rely on.
//!
//! ```
//! use doorlock_hardware::mock::VirtualLcd;
//! use doorlock_hardware::traits::Display;
//!
//! #[tokio::main]
//! async fn main() -> doorlock_hardware::Result<()> {
//!     let (mut lcd, handle) = VirtualLcd::new();
//!
//!     lcd.write_at(0, 0, "Plz Enter Pass:").await?;
//!     lcd.write_at(1, 0, "").await?;
//!     lcd.write_char('*').await?;
//!
//!     assert_eq!(handle.line(0).trim_end(), "Plz Enter Pass:");
//!     assert_eq!(handle.line(1).trim_end(), "*");
//!     Ok(())
//! }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::Instant;

use crate::types::{LCD_COLUMNS, LCD_ROWS};
use crate::{HardwareError, Result, traits::Display};

/// One operation applied to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LcdOp {
    Clear,
    Text { row: usize, col: usize, text: String },
    Char(char),
}

/// An [`LcdOp`] with the time it was applied.
#[derive(Debug, Clone)]
pub struct LcdEvent {
    pub op: LcdOp,
    pub at: Instant,
}

#[derive(Debug)]
struct LcdState {
    cells: [[char; LCD_COLUMNS]; LCD_ROWS],
    cursor: (usize, usize),
    events: VecDeque<LcdEvent>,
    revision: usize,
}

impl LcdState {
    fn new() -> Self {
        Self {
            cells: [[' '; LCD_COLUMNS]; LCD_ROWS],
            cursor: (0, 0),
            events: VecDeque::with_capacity(super::LOG_CAPACITY),
            revision: 0,
        }
    }

    /// Put `c` at the cursor and advance it. Characters past the last
    /// column land in off-screen memory and are not shown.
    fn put(&mut self, c: char) {
        let (row, col) = self.cursor;
        if col < LCD_COLUMNS {
            self.cells[row][col] = c;
        }
        self.cursor = (row, col + 1);
    }

    fn record(&mut self, op: LcdOp) {
        self.revision += 1;
        super::record(
            &mut self.events,
            LcdEvent {
                op,
                at: Instant::now(),
            },
        );
    }
}

fn check_text(text: &str) -> Result<()> {
    match text.chars().find(|c| !(' '..='~').contains(c)) {
        Some(c) => Err(HardwareError::invalid_data(format!(
            "LCD accepts printable ASCII only, got {:?}",
            c
        ))),
        None => Ok(()),
    }
}

/// Virtual LCD device.
#[derive(Debug)]
pub struct VirtualLcd {
    state: Arc<Mutex<LcdState>>,
}

impl VirtualLcd {
    /// Create a blank display and a handle to observe it.
    pub fn new() -> (Self, LcdHandle) {
        let state = Arc::new(Mutex::new(LcdState::new()));
        let handle = LcdHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }

    fn state(&self) -> MutexGuard<'_, LcdState> {
        lock(&self.state)
    }
}

impl Display for VirtualLcd {
    async fn clear(&mut self) -> Result<()> {
        let mut state = self.state();
        state.cells = [[' '; LCD_COLUMNS]; LCD_ROWS];
        state.cursor = (0, 0);
        state.record(LcdOp::Clear);
        Ok(())
    }

    async fn write_at(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        if row >= LCD_ROWS || col >= LCD_COLUMNS {
            return Err(HardwareError::invalid_data(format!(
                "LCD position ({}, {}) outside {}x{} screen",
                row, col, LCD_ROWS, LCD_COLUMNS
            )));
        }
        check_text(text)?;

        let mut state = self.state();
        state.cursor = (row, col);
        for c in text.chars() {
            state.put(c);
        }
        state.record(LcdOp::Text {
            row,
            col,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn write_char(&mut self, c: char) -> Result<()> {
        check_text(c.encode_utf8(&mut [0; 4]))?;

        let mut state = self.state();
        state.put(c);
        state.record(LcdOp::Char(c));
        Ok(())
    }
}

/// Read-only view of a [`VirtualLcd`].
#[derive(Debug, Clone)]
pub struct LcdHandle {
    state: Arc<Mutex<LcdState>>,
}

impl LcdHandle {
    /// One row, padded to the full width.
    pub fn line(&self, row: usize) -> String {
        lock(&self.state)
            .cells
            .get(row)
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }

    /// All rows, padded to the full width.
    pub fn lines(&self) -> Vec<String> {
        (0..LCD_ROWS).map(|row| self.line(row)).collect()
    }

    /// Screen contents with trailing blanks removed, rows joined by `|`.
    pub fn snapshot(&self) -> String {
        self.lines()
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn cursor(&self) -> (usize, usize) {
        lock(&self.state).cursor
    }

    /// The most recent operations, oldest first, up to
    /// [`LOG_CAPACITY`](super::LOG_CAPACITY).
    pub fn events(&self) -> Vec<LcdEvent> {
        lock(&self.state).events.iter().cloned().collect()
    }

    /// Texts written with `write_at`, in order, from the retained events.
    pub fn texts(&self) -> Vec<String> {
        lock(&self.state)
            .events
            .iter()
            .filter_map(|event| match &event.op {
                LcdOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// When `text` was last written with `write_at`.
    pub fn last_written(&self, text: &str) -> Option<Instant> {
        lock(&self.state)
            .events
            .iter()
            .rev()
            .find(|event| matches!(&event.op, LcdOp::Text { text: t, .. } if t == text))
            .map(|event| event.at)
    }

    /// Number of operations applied so far, usable as a change counter.
    pub fn revision(&self) -> usize {
        lock(&self.state).revision
    }
}

/// The state is only mutated under the lock by plain assignments, so a
/// poisoned lock still holds a consistent screen.
fn lock(state: &Mutex<LcdState>) -> MutexGuard<'_, LcdState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
