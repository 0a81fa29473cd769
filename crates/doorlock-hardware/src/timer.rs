//! Phase timer composed from short overflow periods.
//!
//! The node timers can only count out one short overflow period (3 s on the
//! target MCU). Door motion and the alarm need 15 s and 60 s, so a phase
//! is expressed as a number of periods and counted by the tick handler.
//!
//! A tick task stands in for the overflow interrupt. It counts periods,
//! invokes the registered callback once per period and, when the target is
//! reached, clears the phase's active flag through a watch channel and exits.
//! Main-line code only ever sets the flag (by starting a phase) and the tick
//! task only ever clears it.
//!
//! ```
//! use std::time::Duration;
//! use doorlock_hardware::PhaseTimer;
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() -> doorlock_hardware::Result<()> {
//!     let mut timer = PhaseTimer::new();
//!     let started = tokio::time::Instant::now();
//!
//!     timer.run_phase(Duration::from_secs(3), 5, |_tick| {}).await?;
//!
//!     assert_eq!(started.elapsed(), Duration::from_secs(15));
//!     assert!(!timer.is_active());
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

use crate::error::{HardwareError, Result};

/// Progress reported to the tick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTick {
    /// Periods elapsed so far, including this one.
    pub elapsed: u32,
    /// Periods in the phase.
    pub target: u32,
}

impl PhaseTick {
    /// Whether this is the last tick of the phase.
    pub fn is_final(&self) -> bool {
        self.elapsed >= self.target
    }
}

/// Callback run by the tick task once per period. Keep it short.
pub type TickCallback = Box<dyn FnMut(PhaseTick) + Send + 'static>;

#[derive(Debug, Clone, Copy)]
struct PhasePlan {
    period: Duration,
    target: u32,
}

/// A single phase timer.
///
/// At most one phase runs at a time. A new phase may only be configured once
/// the previous one has been awaited with
/// [`await_completion`](Self::await_completion), which joins the tick task.
pub struct PhaseTimer {
    plan: Option<PhasePlan>,
    elapsed: Arc<AtomicU32>,
    active: Option<watch::Receiver<bool>>,
    task: Option<JoinHandle<()>>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self {
            plan: None,
            elapsed: Arc::new(AtomicU32::new(0)),
            active: None,
            task: None,
        }
    }

    /// Set up the next phase.
    ///
    /// # Errors
    ///
    /// - `HardwareError::TimerBusy` if the previous phase has not been awaited
    /// - `HardwareError::ConfigurationError` for a zero period or target
    pub fn configure(&mut self, period: Duration, target_periods: u32) -> Result<()> {
        if self.task.is_some() {
            return Err(HardwareError::TimerBusy);
        }
        if period.is_zero() {
            return Err(HardwareError::configuration("overflow period must be non-zero"));
        }
        if target_periods == 0 {
            return Err(HardwareError::configuration("phase must span at least one period"));
        }

        self.plan = Some(PhasePlan {
            period,
            target: target_periods,
        });
        self.elapsed.store(0, Ordering::Release);
        Ok(())
    }

    /// Register `callback` and start counting the configured phase.
    ///
    /// The first tick fires one full period after this call.
    ///
    /// # Errors
    ///
    /// - `HardwareError::TimerNotConfigured` if no phase is configured
    /// - `HardwareError::TimerBusy` if a phase is already running
    pub fn start<F>(&mut self, callback: F) -> Result<()>
    where
        F: FnMut(PhaseTick) + Send + 'static,
    {
        if self.task.is_some() {
            return Err(HardwareError::TimerBusy);
        }
        let plan = self.plan.ok_or(HardwareError::TimerNotConfigured)?;

        let (active_tx, active_rx) = watch::channel(true);
        let elapsed = Arc::clone(&self.elapsed);
        let callback: TickCallback = Box::new(callback);

        debug!(
            period_ms = plan.period.as_millis() as u64,
            target = plan.target,
            "phase started"
        );
        self.active = Some(active_rx);
        self.task = Some(tokio::spawn(tick_task(plan, elapsed, callback, active_tx)));
        Ok(())
    }

    /// Wait until the running phase completes and its tick task has exited.
    ///
    /// Returns immediately if no phase was started. Afterwards the timer is
    /// idle and unconfigured.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Other` if the tick task panicked.
    pub async fn await_completion(&mut self) -> Result<()> {
        if let Some(mut active) = self.active.take() {
            // A dropped sender means the task ended early; joining reports why.
            let _ = active.wait_for(|running| !*running).await;
        }

        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| HardwareError::other(format!("phase tick task failed: {e}")))?;
        }

        self.plan = None;
        debug!(elapsed = self.elapsed_periods(), "phase complete");
        Ok(())
    }

    /// Configure, start and await one phase.
    pub async fn run_phase<F>(&mut self, period: Duration, target_periods: u32, callback: F) -> Result<()>
    where
        F: FnMut(PhaseTick) + Send + 'static,
    {
        self.configure(period, target_periods)?;
        self.start(callback)?;
        self.await_completion().await
    }

    /// Whether a started phase has not yet reached its target.
    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Periods counted in the current or most recent phase.
    pub fn elapsed_periods(&self) -> u32 {
        self.elapsed.load(Ordering::Acquire)
    }
}

impl Default for PhaseTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhaseTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseTimer")
            .field("plan", &self.plan)
            .field("elapsed", &self.elapsed_periods())
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn tick_task(
    plan: PhasePlan,
    elapsed: Arc<AtomicU32>,
    mut callback: TickCallback,
    active: watch::Sender<bool>,
) {
    let mut interval = time::interval_at(Instant::now() + plan.period, plan.period);

    let mut count = 0;
    while count < plan.target {
        interval.tick().await;
        count += 1;
        elapsed.store(count, Ordering::Release);
        trace!(elapsed = count, target = plan.target, "phase tick");
        callback(PhaseTick {
            elapsed: count,
            target: plan.target,
        });
    }

    active.send_replace(false);
}
