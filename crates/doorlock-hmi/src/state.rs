//! HMI node session states.

use std::fmt;

use doorlock_core::NodeState;

/// Where the HMI node is in its interaction loop.
///
/// ```text
/// Provisioning -> MainMenu -> UnlockAttempt  -> DoorUnlocking -> MainMenu
///                                            -> Alarm         -> MainMenu
///                          -> ChangePassword -> MainMenu
///                                            -> Alarm         -> MainMenu
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HmiState {
    /// First-run password setup, repeated until it succeeds.
    Provisioning,
    MainMenu,
    /// Collecting passwords for CheckPassword, bounded attempts.
    UnlockAttempt,
    /// Collecting a new password for SetPassword, bounded attempts.
    ChangePassword,
    /// Showing the door phases while the Control node moves the door.
    DoorUnlocking,
    /// Showing the alarm while the Control node sounds it.
    Alarm,
}

impl NodeState for HmiState {
    fn initial() -> Self {
        Self::Provisioning
    }

    fn can_transition_to(&self, target: &Self) -> bool {
        use HmiState::*;

        matches!(
            (self, target),
            (Provisioning, MainMenu)
                | (MainMenu, UnlockAttempt | ChangePassword)
                | (UnlockAttempt, DoorUnlocking | Alarm)
                | (ChangePassword, MainMenu | Alarm)
                | (DoorUnlocking | Alarm, MainMenu)
        )
    }
}

impl fmt::Display for HmiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Provisioning => "PROVISIONING",
            Self::MainMenu => "MAIN_MENU",
            Self::UnlockAttempt => "UNLOCK_ATTEMPT",
            Self::ChangePassword => "CHANGE_PASSWORD",
            Self::DoorUnlocking => "DOOR_UNLOCKING",
            Self::Alarm => "ALARM",
        };
        f.write_str(name)
    }
}
