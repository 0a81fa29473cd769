//! Recording motor and buzzer.
//!
//! Both mocks log every command with its (tokio) timestamp into a shared
//! journal, so tests running on paused time can assert exact phase lengths.
//! Journals keep the last [`LOG_CAPACITY`](super::LOG_CAPACITY) commands.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use crate::traits::{Buzzer, Motor};
use crate::{MotorDirection, Result};

/// A motor command and when it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorEvent {
    pub direction: MotorDirection,
    pub speed: u8,
    pub at: Instant,
}

/// A buzzer command and when it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuzzerEvent {
    pub on: bool,
    pub at: Instant,
}

type Journal<T> = Arc<Mutex<VecDeque<T>>>;

fn lock<T>(journal: &Mutex<VecDeque<T>>) -> MutexGuard<'_, VecDeque<T>> {
    journal.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock door motor.
#[derive(Debug)]
pub struct MockMotor {
    journal: Journal<MotorEvent>,
}

impl MockMotor {
    pub fn new() -> (Self, MotorHandle) {
        let journal: Journal<_> = Arc::new(Mutex::new(VecDeque::new()));
        let handle = MotorHandle {
            journal: Arc::clone(&journal),
        };
        (Self { journal }, handle)
    }
}

impl Motor for MockMotor {
    async fn drive(&mut self, direction: MotorDirection, speed: u8) -> Result<()> {
        info!(%direction, speed, "motor");
        super::record(
            &mut lock(&self.journal),
            MotorEvent {
                direction,
                speed,
                at: Instant::now(),
            },
        );
        Ok(())
    }
}

/// Read-only view of a [`MockMotor`]'s journal.
#[derive(Debug, Clone)]
pub struct MotorHandle {
    journal: Journal<MotorEvent>,
}

impl MotorHandle {
    pub fn events(&self) -> Vec<MotorEvent> {
        lock(&self.journal).iter().copied().collect()
    }

    /// Commands issued, without timestamps.
    pub fn commands(&self) -> Vec<(MotorDirection, u8)> {
        lock(&self.journal)
            .iter()
            .map(|event| (event.direction, event.speed))
            .collect()
    }

    /// Time between consecutive commands.
    pub fn intervals(&self) -> Vec<Duration> {
        let journal = lock(&self.journal);
        journal
            .iter()
            .zip(journal.iter().skip(1))
            .map(|(earlier, later)| later.at - earlier.at)
            .collect()
    }

    /// Last commanded direction, `Stop` if never driven.
    pub fn direction(&self) -> MotorDirection {
        lock(&self.journal)
            .back()
            .map_or(MotorDirection::Stop, |event| event.direction)
    }
}

/// Mock alarm buzzer.
#[derive(Debug)]
pub struct MockBuzzer {
    journal: Journal<BuzzerEvent>,
}

impl MockBuzzer {
    pub fn new() -> (Self, BuzzerHandle) {
        let journal: Journal<_> = Arc::new(Mutex::new(VecDeque::new()));
        let handle = BuzzerHandle {
            journal: Arc::clone(&journal),
        };
        (Self { journal }, handle)
    }

    fn set(&mut self, on: bool) {
        info!(on, "buzzer");
        super::record(
            &mut lock(&self.journal),
            BuzzerEvent {
                on,
                at: Instant::now(),
            },
        );
    }
}

impl Buzzer for MockBuzzer {
    async fn on(&mut self) -> Result<()> {
        self.set(true);
        Ok(())
    }

    async fn off(&mut self) -> Result<()> {
        self.set(false);
        Ok(())
    }
}

/// Read-only view of a [`MockBuzzer`]'s journal.
#[derive(Debug, Clone)]
pub struct BuzzerHandle {
    journal: Journal<BuzzerEvent>,
}

impl BuzzerHandle {
    pub fn events(&self) -> Vec<BuzzerEvent> {
        lock(&self.journal).iter().copied().collect()
    }

    pub fn is_on(&self) -> bool {
        lock(&self.journal).back().is_some_and(|event| event.on)
    }

    /// Length of each completed on/off cycle.
    pub fn on_durations(&self) -> Vec<Duration> {
        let journal = lock(&self.journal);
        let mut durations = Vec::new();
        let mut since = None;
        for event in journal.iter() {
            match (event.on, since) {
                (true, None) => since = Some(event.at),
                (false, Some(start)) => {
                    durations.push(event.at - start);
                    since = None;
                }
                _ => {}
            }
        }
        durations
    }
}
