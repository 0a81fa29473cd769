//! Handshake primitives shared by both nodes.
//!
//! Each helper is a single step of an exchange. None of them retries or
//! times out: a primitive that waits for a byte waits until the byte arrives
//! or the link closes. Retry limits belong to the callers.

use tracing::{debug, trace};

use doorlock_core::Result;

use crate::link::Channel;
use crate::opcode::{Command, ReadyToken, Status};

/// Send a ready byte.
pub async fn send_token<C: Channel>(channel: &mut C, token: ReadyToken) -> Result<()> {
    trace!("sending {}", token);
    channel.send_byte(token.into()).await
}

/// Poll the link until `token` arrives, discarding every other byte.
///
/// Returns the number of bytes discarded before the token.
pub async fn await_token<C: Channel>(channel: &mut C, token: ReadyToken) -> Result<usize> {
    let expected = u8::from(token);
    let mut discarded = 0;

    loop {
        let byte = channel.receive_byte().await?;
        if byte == expected {
            if discarded > 0 {
                debug!("{} arrived after {} stray bytes", token, discarded);
            }
            return Ok(discarded);
        }
        trace!("discarding 0x{:02X} while awaiting {}", byte, token);
        discarded += 1;
    }
}

/// Start an exchange from the HMI side: ready byte, then the command.
pub async fn issue_command<C: Channel>(channel: &mut C, command: Command) -> Result<()> {
    debug!("issuing {}", command);
    send_token(channel, ReadyToken::Hmi).await?;
    channel.send_byte(command.into()).await
}

/// Poll the link until a comparison status arrives, discarding other bytes.
pub async fn read_status<C: Channel>(channel: &mut C) -> Result<Status> {
    loop {
        let byte = channel.receive_byte().await?;
        match Status::try_from(byte) {
            Ok(status) => return Ok(status),
            Err(_) => trace!("discarding 0x{:02X} while awaiting status", byte),
        }
    }
}
