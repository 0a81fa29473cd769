//! The HMI node interaction loop.
//!
//! The HMI node initiates every exchange. It collects passwords on the
//! keypad, hands them to the Control node and reacts to the status byte.
//! For the door and alarm phases it runs timers of the same length as the
//! Control node's, so the screen follows the actuators without any further
//! messages on the link.

use std::fmt;

use tokio::time;
use tracing::{debug, info, trace, warn};

use doorlock_core::constants::PASSWORD_LENGTH;
use doorlock_core::{Error, LockConfig, Password, Result, StateMachine};
use doorlock_hardware::{Display, Keypad, KeypadKey, PhaseTimer};
use doorlock_protocol::{
    Channel, Command, ReadyToken, Status, await_token, issue_command, read_status,
};

use crate::screen::{self, Prompt};
use crate::state::HmiState;

/// Result of one [`HmiNode::menu_cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// A password was accepted and the door cycle was shown.
    DoorUnlocked,
    /// A new password was stored.
    PasswordChanged,
    /// Attempts ran out and the alarm was shown.
    AlarmRaised,
    /// The key pressed was not a menu choice.
    Redrawn,
}

/// HMI node.
///
/// Generic over its link, keypad and display.
pub struct HmiNode<C, K, D> {
    channel: C,
    keypad: K,
    display: D,
    timer: PhaseTimer,
    config: LockConfig,
    machine: StateMachine<HmiState>,
}

impl<C, K, D> HmiNode<C, K, D>
where
    C: Channel,
    K: Keypad,
    D: Display,
{
    /// Assemble a node.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` does not validate.
    pub fn new(channel: C, keypad: K, display: D, config: LockConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            channel,
            keypad,
            display,
            timer: PhaseTimer::new(),
            config,
            machine: StateMachine::new(),
        })
    }

    pub fn state(&self) -> HmiState {
        self.machine.current_state()
    }

    /// Session tracker, for diagnostics.
    pub fn session(&self) -> &StateMachine<HmiState> {
        &self.machine
    }

    /// Provision a password, then serve the menu until the link closes.
    ///
    /// # Errors
    ///
    /// Returns any error other than `Error::LinkClosed`.
    pub async fn run(&mut self) -> Result<()> {
        info!("HMI node starting");
        match self.serve().await {
            Err(Error::LinkClosed) => {
                info!("Link closed, HMI node stopping");
                Ok(())
            }
            other => other,
        }
    }

    async fn serve(&mut self) -> Result<()> {
        self.provision().await?;
        loop {
            let outcome = self.menu_cycle().await?;
            debug!(?outcome, "menu cycle complete");
        }
    }

    /// First-run setup: collect a password and its verification until the
    /// Control node accepts them. There is no attempt limit.
    ///
    /// Returns the number of rounds it took. Only valid on a fresh node.
    pub async fn provision(&mut self) -> Result<u32> {
        let mut rounds = 0;
        loop {
            rounds += 1;
            if self.set_password_round().await?.is_matched() {
                break;
            }
            warn!(rounds, "Passwords did not match, provisioning again");
        }

        self.machine.transition_to(HmiState::MainMenu)?;
        info!(rounds, "Password provisioned");
        Ok(rounds)
    }

    /// Show the menu, read one choice and carry it out.
    ///
    /// On error the session is put back in the main menu, with the keypad
    /// re-enabled if the alarm was interrupted, before the error is returned.
    pub async fn menu_cycle(&mut self) -> Result<MenuOutcome> {
        let result = self.serve_menu().await;
        if result.is_err() && self.state() != HmiState::MainMenu {
            self.recover().await;
        }
        result
    }

    async fn recover(&mut self) {
        if self.state() == HmiState::Alarm {
            if let Err(e) = self.keypad.enable().await {
                warn!("Could not re-enable keypad: {}", e);
            }
        }
        let transition = self.machine.reset_to(HmiState::MainMenu);
        warn!(from = %transition.from, "Menu cycle failed, back to main menu");
    }

    async fn serve_menu(&mut self) -> Result<MenuOutcome> {
        screen::draw_menu(&mut self.display).await?;

        match self.keypad.read_key().await? {
            KeypadKey::Plus => self.open_door().await,
            KeypadKey::Minus => self.change_password().await,
            other => {
                trace!(key = %other, "not a menu choice");
                Ok(MenuOutcome::Redrawn)
            }
        }
    }

    async fn open_door(&mut self) -> Result<MenuOutcome> {
        self.machine.transition_to(HmiState::UnlockAttempt)?;

        for attempt in 1..=self.config.max_attempts {
            let password = self.read_entry(Prompt::Enter).await?;
            self.display.clear().await?;

            if self.check_password(password).await?.is_matched() {
                info!(attempt, "Password accepted");
                self.machine.transition_to(HmiState::DoorUnlocking)?;
                self.door_cycle().await?;
                self.machine.transition_to(HmiState::MainMenu)?;
                return Ok(MenuOutcome::DoorUnlocked);
            }
            warn!(attempt, max = self.config.max_attempts, "Wrong password");
        }

        self.raise_alarm().await?;
        Ok(MenuOutcome::AlarmRaised)
    }

    async fn change_password(&mut self) -> Result<MenuOutcome> {
        self.machine.transition_to(HmiState::ChangePassword)?;

        for attempt in 1..=self.config.max_attempts {
            if self.set_password_round().await?.is_matched() {
                info!(attempt, "Password changed");
                self.machine.transition_to(HmiState::MainMenu)?;
                return Ok(MenuOutcome::PasswordChanged);
            }
            warn!(attempt, max = self.config.max_attempts, "New passwords did not match");
        }

        self.raise_alarm().await?;
        Ok(MenuOutcome::AlarmRaised)
    }

    /// Collect a password and its verification, then run SetPassword.
    async fn set_password_round(&mut self) -> Result<Status> {
        let password = self.read_entry(Prompt::Enter).await?;
        let verification = self.read_entry(Prompt::Repeat).await?;
        self.display.clear().await?;

        issue_command(&mut self.channel, Command::SetPassword).await?;
        await_token(&mut self.channel, ReadyToken::Control).await?;
        self.channel.send_buffer(password.as_bytes()).await?;
        await_token(&mut self.channel, ReadyToken::Control).await?;
        self.channel.send_buffer(verification.as_bytes()).await?;

        // Exactly one status byte follows; anything but MATCHED is a failure.
        let byte = self.channel.receive_byte().await?;
        Ok(Status::from_byte_lenient(byte))
    }

    async fn check_password(&mut self, password: Password) -> Result<Status> {
        issue_command(&mut self.channel, Command::CheckPassword).await?;
        await_token(&mut self.channel, ReadyToken::Control).await?;
        self.channel.send_buffer(password.as_bytes()).await?;
        await_token(&mut self.channel, ReadyToken::Control).await?;
        read_status(&mut self.channel).await
    }

    /// Read one password entry from the keypad.
    ///
    /// Digits fill the slots one by one, each shown as a mask character;
    /// other keys leave the slot empty. The key after the last digit must be
    /// `=`, otherwise the entry starts over from a redrawn prompt.
    async fn read_entry(&mut self, prompt: Prompt) -> Result<Password> {
        let guard = self.config.timing.key_press_guard();

        loop {
            screen::draw_prompt(&mut self.display, prompt).await?;

            let mut digits = [0u8; PASSWORD_LENGTH];
            let mut filled = 0;
            while filled < PASSWORD_LENGTH {
                let key = self.keypad.read_key().await?;
                match key.as_digit() {
                    Some(digit) => {
                        digits[filled] = digit;
                        filled += 1;
                        self.display.write_char(screen::DIGIT_MASK).await?;
                    }
                    None => trace!(%key, "non-digit in digit slot"),
                }
                time::sleep(guard).await;
            }

            let confirm = self.keypad.read_key().await?;
            time::sleep(guard).await;
            if confirm == KeypadKey::Enter {
                return Password::new(digits);
            }
            debug!(key = %confirm, ?prompt, "entry not confirmed, restarting");
        }
    }

    /// Screen side of the door cycle: open, hold, close.
    async fn door_cycle(&mut self) -> Result<()> {
        let timing = self.config.timing.clone();
        let period = timing.overflow_period();

        screen::show_message(&mut self.display, screen::DOOR_UNLOCKING).await?;
        issue_command(&mut self.channel, Command::UnlockDoor).await?;
        self.timer
            .run_phase(period, timing.door_motion_periods, |_| {})
            .await?;

        self.display.clear().await?;
        self.timer
            .run_phase(period, timing.door_hold_periods, |_| {})
            .await?;

        self.display.write_at(0, 0, screen::DOOR_LOCKING).await?;
        self.timer
            .run_phase(period, timing.door_motion_periods, |_| {})
            .await?;

        info!("Door cycle complete");
        Ok(())
    }

    /// Show the alarm with the keypad locked for the alarm phase.
    async fn raise_alarm(&mut self) -> Result<()> {
        self.machine.transition_to(HmiState::Alarm)?;
        warn!("Attempts exhausted, raising alarm");

        screen::show_message(&mut self.display, screen::ALARM).await?;
        self.keypad.disable().await?;
        issue_command(&mut self.channel, Command::Alarm).await?;

        let timing = &self.config.timing;
        let (period, periods) = (timing.overflow_period(), timing.alarm_periods);
        self.timer.run_phase(period, periods, |_| {}).await?;

        self.keypad.enable().await?;
        self.machine.transition_to(HmiState::MainMenu)?;
        info!("Alarm cleared, keypad enabled");
        Ok(())
    }
}

impl<C, K, D> fmt::Debug for HmiNode<C, K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmiNode")
            .field("state", &self.machine.current_state())
            .field("timer", &self.timer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
