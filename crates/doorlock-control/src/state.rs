//! Control node session states.

use std::fmt;

use doorlock_core::NodeState;

/// Where the Control node is in its command cycle.
///
/// ```text
/// Idle -> Dispatching -> SettingPassword  -> Idle
///                     -> CheckingPassword -> Idle
///                     -> Unlocking        -> Idle
///                     -> Alarming         -> Idle
///                     -> Idle   (unrecognized command)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlState {
    /// Polling for the HMI ready byte.
    Idle,
    /// Ready byte seen, reading the command.
    Dispatching,
    SettingPassword,
    CheckingPassword,
    /// Running the door phase plan.
    Unlocking,
    /// Buzzer phase.
    Alarming,
}

impl ControlState {
    /// Whether a command handler is running.
    pub fn is_handling(&self) -> bool {
        !matches!(self, Self::Idle | Self::Dispatching)
    }
}

impl NodeState for ControlState {
    fn initial() -> Self {
        Self::Idle
    }

    fn can_transition_to(&self, target: &Self) -> bool {
        use ControlState::*;

        match (self, target) {
            (Idle, Dispatching) => true,
            (Dispatching, Idle) => true,
            (Dispatching, SettingPassword | CheckingPassword | Unlocking | Alarming) => true,
            (SettingPassword | CheckingPassword | Unlocking | Alarming, Idle) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Dispatching => "DISPATCHING",
            Self::SettingPassword => "SETTING_PASSWORD",
            Self::CheckingPassword => "CHECKING_PASSWORD",
            Self::Unlocking => "UNLOCKING",
            Self::Alarming => "ALARMING",
        };
        f.write_str(name)
    }
}
