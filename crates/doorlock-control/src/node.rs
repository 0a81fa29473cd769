//! The Control node command loop.
//!
//! The node owns the link end, the password store, both actuators and its
//! single [`PhaseTimer`]. It serves one command at a time: poll for the HMI
//! ready byte, read the command, run its handler to completion, return to
//! idle. There is no timeout anywhere; a peer that stops mid-exchange leaves
//! the node waiting until it resumes or closes the link.

use std::fmt;

use tokio::time;
use tracing::{debug, info, trace, warn};

use doorlock_core::constants::{MOTOR_FULL_SPEED, PASSWORD_LENGTH};
use doorlock_core::{Error, LockConfig, Password, Result, StateMachine};
use doorlock_hardware::{Buzzer, Motor, MotorDirection, PersistentStore, PhaseTimer};
use doorlock_protocol::{Channel, Command, ReadyToken, Status, await_token, send_token};

use crate::state::ControlState;

/// Result of a completed command handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Password exchange answered with `PASSWORDS_MATCHED`.
    Matched,
    /// Password exchange answered with `PASSWORDS_UNMATCHED`.
    Unmatched,
    /// Full open/hold/close cycle ran.
    DoorCycled,
    /// Alarm phase ran.
    AlarmSounded,
}

impl From<Status> for Outcome {
    fn from(status: Status) -> Self {
        match status {
            Status::Matched => Outcome::Matched,
            Status::Unmatched => Outcome::Unmatched,
        }
    }
}

/// What one [`ControlNode::serve_one`] cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A recognized command ran to completion.
    Handled(Command, Outcome),
    /// The byte after the ready byte was not a command; nothing was sent.
    Ignored(u8),
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Handled(command, outcome) => write!(f, "{} -> {:?}", command, outcome),
            Dispatch::Ignored(byte) => write!(f, "ignored 0x{:02X}", byte),
        }
    }
}

/// Control node.
///
/// Generic over its link and peripherals so the same code runs against
/// mocks, a duplex pipe or a TCP stream.
pub struct ControlNode<C, S, M, B> {
    channel: C,
    store: S,
    motor: M,
    buzzer: B,
    timer: PhaseTimer,
    config: LockConfig,
    machine: StateMachine<ControlState>,
}

impl<C, S, M, B> ControlNode<C, S, M, B>
where
    C: Channel,
    S: PersistentStore,
    M: Motor,
    B: Buzzer,
{
    /// Assemble a node.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` does not validate.
    pub fn new(channel: C, store: S, motor: M, buzzer: B, config: LockConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            channel,
            store,
            motor,
            buzzer,
            timer: PhaseTimer::new(),
            config,
            machine: StateMachine::new(),
        })
    }

    pub fn state(&self) -> ControlState {
        self.machine.current_state()
    }

    /// Session tracker, for diagnostics.
    pub fn session(&self) -> &StateMachine<ControlState> {
        &self.machine
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    /// Serve commands until the HMI closes the link.
    ///
    /// # Errors
    ///
    /// Returns any error other than `Error::LinkClosed`.
    pub async fn run(&mut self) -> Result<()> {
        info!("Control node serving");
        loop {
            match self.serve_one().await {
                Ok(dispatch) => debug!("cycle complete: {}", dispatch),
                Err(Error::LinkClosed) => {
                    info!("Link closed, control node stopping");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Serve exactly one ready+command cycle.
    ///
    /// On error the session is reset to idle before the error is returned.
    pub async fn serve_one(&mut self) -> Result<Dispatch> {
        let result = self.dispatch().await;
        if result.is_err() && self.state() != ControlState::Idle {
            self.machine.reset();
        }
        result
    }

    async fn dispatch(&mut self) -> Result<Dispatch> {
        await_token(&mut self.channel, ReadyToken::Hmi).await?;
        self.machine.transition_to(ControlState::Dispatching)?;

        let byte = self.channel.receive_byte().await?;
        let command = match Command::try_from(byte) {
            Ok(command) => command,
            Err(_) => {
                warn!("Ignoring unknown command byte 0x{:02X}", byte);
                self.machine.transition_to(ControlState::Idle)?;
                return Ok(Dispatch::Ignored(byte));
            }
        };

        let handler = match command {
            Command::SetPassword => ControlState::SettingPassword,
            Command::CheckPassword => ControlState::CheckingPassword,
            Command::UnlockDoor => ControlState::Unlocking,
            Command::Alarm => ControlState::Alarming,
        };
        self.machine.transition_to(handler)?;
        debug!("dispatching {}", command);

        let outcome = match command {
            Command::SetPassword => self.set_password().await?,
            Command::CheckPassword => self.check_password().await?,
            Command::UnlockDoor => self.unlock_door().await?,
            Command::Alarm => self.sound_alarm().await?,
        };

        let busy = self.machine.time_in_current_state();
        self.machine.transition_to(ControlState::Idle)?;
        info!(%command, ?outcome, ?busy, "command handled");
        Ok(Dispatch::Handled(command, outcome))
    }

    /// Receive a password and its verification; store it if they agree.
    async fn set_password(&mut self) -> Result<Outcome> {
        send_token(&mut self.channel, ReadyToken::Control).await?;
        let password = Password::from_wire(self.channel.receive_buffer().await?);

        send_token(&mut self.channel, ReadyToken::Control).await?;
        let verification = Password::from_wire(self.channel.receive_buffer().await?);

        if password != verification {
            self.channel.send_byte(Status::Unmatched.into()).await?;
            warn!("Password verification mismatch, store unchanged");
            return Ok(Outcome::Unmatched);
        }

        self.channel.send_byte(Status::Matched.into()).await?;

        let settle = self.config.timing.store_write_settle();
        let addresses = password_addresses(self.config.password_address);
        for (address, &byte) in addresses.zip(password.as_bytes()) {
            self.store.write_byte(address, byte).await?;
            time::sleep(settle).await;
        }
        info!("Password stored at 0x{:04X}", self.config.password_address);
        Ok(Outcome::Matched)
    }

    /// Compare a received password with the stored one, byte by byte.
    ///
    /// Stops reading the store at the first differing byte.
    async fn check_password(&mut self) -> Result<Outcome> {
        send_token(&mut self.channel, ReadyToken::Control).await?;
        let candidate = self.channel.receive_buffer().await?;

        let settle = self.config.timing.store_read_settle();
        let addresses = password_addresses(self.config.password_address);
        let mut status = Status::Matched;
        for (position, address) in addresses.enumerate() {
            let stored = self.store.read_byte(address).await?;
            if stored != candidate[position] {
                debug!(position, "password differs");
                status = Status::Unmatched;
                break;
            }
            time::sleep(settle).await;
        }

        send_token(&mut self.channel, ReadyToken::Control).await?;
        self.channel.send_byte(status.into()).await?;

        if !status.is_matched() {
            warn!("Password check failed");
        }
        Ok(status.into())
    }

    /// Open the door, hold it, close it.
    async fn unlock_door(&mut self) -> Result<Outcome> {
        let timing = self.config.timing.clone();
        let plan = [
            (MotorDirection::Forward, MOTOR_FULL_SPEED, timing.door_motion_periods),
            (MotorDirection::Stop, 0, timing.door_hold_periods),
            (MotorDirection::Reverse, MOTOR_FULL_SPEED, timing.door_motion_periods),
        ];

        for (direction, speed, periods) in plan {
            debug!(%direction, periods, "door phase");
            self.motor.drive(direction, speed).await?;
            self.timer
                .run_phase(timing.overflow_period(), periods, move |tick| {
                    trace!(%direction, elapsed = tick.elapsed, "door tick");
                })
                .await?;
        }

        self.motor.drive(MotorDirection::Stop, 0).await?;
        Ok(Outcome::DoorCycled)
    }

    async fn sound_alarm(&mut self) -> Result<Outcome> {
        let timing = &self.config.timing;
        let (period, periods) = (timing.overflow_period(), timing.alarm_periods);

        warn!("Alarm raised");
        self.buzzer.on().await?;
        self.timer.run_phase(period, periods, |_| {}).await?;
        self.buzzer.off().await?;
        info!("Alarm cleared");
        Ok(Outcome::AlarmSounded)
    }

}

/// Store addresses of the password block starting at `base`.
fn password_addresses(base: u16) -> impl Iterator<Item = u16> {
    (0..PASSWORD_LENGTH as u16).map(move |offset| base + offset)
}

impl<C, S, M, B> fmt::Debug for ControlNode<C, S, M, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlNode")
            .field("state", &self.machine.current_state())
            .field("timer", &self.timer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
