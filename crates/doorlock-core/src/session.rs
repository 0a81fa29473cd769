//! Session state tracking for node state machines.
//!
//! Each node owns one [`StateMachine`] parameterized by its own state enum.
//! The machine enforces the node's transition table (supplied through
//! [`NodeState::can_transition_to`]) and keeps a bounded history of recent
//! transitions for diagnostics. Session state is never persisted; a node
//! restart always begins in [`NodeState::initial`].
//!
//! # Examples
//!
//! ```
//! use std::fmt;
//! use doorlock_core::{NodeState, StateMachine};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Light { Off, On }
//!
//! impl fmt::Display for Light {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "{self:?}")
//!     }
//! }
//!
//! impl NodeState for Light {
//!     fn initial() -> Self { Light::Off }
//!     fn can_transition_to(&self, target: &Self) -> bool { self != target }
//! }
//!
//! let mut machine = StateMachine::<Light>::new();
//! machine.transition_to(Light::On).unwrap();
//! assert!(machine.transition_to(Light::On).is_err());
//! assert_eq!(machine.history().len(), 1);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::{Error, Result};

/// Maximum number of state transitions to keep in history.
///
/// A full unlock cycle on the HMI is four transitions, so this holds the
/// last couple of dozen user interactions.
const MAX_HISTORY_SIZE: usize = 100;

/// A node's state enum.
pub trait NodeState: Copy + Eq + fmt::Debug + fmt::Display {
    /// State a freshly started node is in.
    fn initial() -> Self;

    /// Transition table of the node.
    fn can_transition_to(&self, target: &Self) -> bool;
}

/// A single state transition with timestamp.
#[derive(Debug, Clone)]
pub struct StateTransition<S> {
    /// The state transitioned from.
    pub from: S,

    /// The state transitioned to.
    pub to: S,

    /// When the transition occurred.
    pub timestamp: Instant,
}

impl<S: NodeState> StateTransition<S> {
    pub fn new(from: S, to: S) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    /// Time elapsed since this transition occurred.
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// Validating state machine with bounded transition history.
///
/// # Thread Safety
///
/// This struct is not thread-safe by design. Each node owns its machine and
/// drives it from a single task.
#[derive(Debug)]
pub struct StateMachine<S> {
    current_state: S,
    state_entered_at: Instant,
    history: VecDeque<StateTransition<S>>,
}

impl<S: NodeState> StateMachine<S> {
    /// Create a machine in the node's initial state.
    pub fn new() -> Self {
        Self {
            current_state: S::initial(),
            state_entered_at: Instant::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Time since the last transition, on the tokio clock.
    pub fn time_in_current_state(&self) -> Duration {
        self.state_entered_at.elapsed()
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition<S>> {
        &self.history
    }

    /// The most recent `count` transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition<S>> {
        let skip = self.history.len().saturating_sub(count);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Sequence of states visited, starting with the oldest recorded `from`.
    pub fn visited(&self) -> Vec<S> {
        let mut states: Vec<S> = self.history.front().map(|t| t.from).into_iter().collect();
        states.extend(self.history.iter().map(|t| t.to));
        states
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the node's transition table
    /// does not allow moving from the current state to `new_state`. The
    /// machine is left unchanged in that case.
    pub fn transition_to(&mut self, new_state: S) -> Result<StateTransition<S>> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        self.perform_state_change(new_state, transition.clone());
        Ok(transition)
    }

    /// Force the machine back to the initial state regardless of the table.
    pub fn reset(&mut self) -> StateTransition<S> {
        self.reset_to(S::initial())
    }

    /// Force the machine into `state` regardless of the table. Used to
    /// recover a session after a failed cycle.
    pub fn reset_to(&mut self, state: S) -> StateTransition<S> {
        let transition = StateTransition::new(self.current_state, state);
        self.perform_state_change(state, transition.clone());
        transition
    }

    fn perform_state_change(&mut self, new_state: S, transition: StateTransition<S>) {
        self.current_state = new_state;
        self.state_entered_at = Instant::now();

        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl<S: NodeState> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}
