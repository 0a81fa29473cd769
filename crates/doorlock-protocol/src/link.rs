//! Point-to-point byte link between the two nodes.
//!
//! [`Channel`] is the capability both node state machines are written
//! against. [`SerialLink`] implements it over any tokio byte stream: a
//! `TcpStream` between processes, or an in-memory duplex pipe created with
//! [`SerialLink::pair`] for tests and the simulator.
//!
//! All receive operations wait for as long as it takes. There is no read
//! timeout; the only failure is the peer closing the stream, reported as
//! [`Error::LinkClosed`].

#![allow(async_fn_in_trait)]

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream};
use tokio_util::codec::Framed;
use tracing::trace;

use doorlock_core::constants::PASSWORD_LENGTH;
use doorlock_core::{Error, Result};

use crate::codec::ByteCodec;

/// Capacity of each direction of an in-memory link.
const PAIR_BUFFER_SIZE: usize = 64;

/// Byte-oriented serial channel.
///
/// Like the hardware traits, this uses native `async fn` and is therefore
/// not object-safe; nodes take it as a generic parameter.
pub trait Channel: Send {
    /// Transmit one byte.
    async fn send_byte(&mut self, byte: u8) -> Result<()>;

    /// Wait for the next byte from the peer.
    ///
    /// # Errors
    ///
    /// Returns `Error::LinkClosed` if the peer has closed the link.
    async fn receive_byte(&mut self) -> Result<u8>;

    /// Transmit a password-sized payload, in order.
    async fn send_buffer(&mut self, buffer: &[u8; PASSWORD_LENGTH]) -> Result<()> {
        for &byte in buffer {
            self.send_byte(byte).await?;
        }
        Ok(())
    }

    /// Wait for a password-sized payload.
    async fn receive_buffer(&mut self) -> Result<[u8; PASSWORD_LENGTH]> {
        let mut buffer = [0u8; PASSWORD_LENGTH];
        for slot in buffer.iter_mut() {
            *slot = self.receive_byte().await?;
        }
        Ok(buffer)
    }
}

/// [`Channel`] over a tokio byte stream.
#[derive(Debug)]
pub struct SerialLink<T> {
    framed: Framed<T, ByteCodec>,
    name: &'static str,
}

impl<T> SerialLink<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a byte stream.
    pub fn new(io: T) -> Self {
        Self::with_name(io, "link")
    }

    /// Wrap a byte stream, tagging trace output with `name`.
    pub fn with_name(io: T, name: &'static str) -> Self {
        Self {
            framed: Framed::new(io, ByteCodec::new()),
            name,
        }
    }

    /// Name used in trace output.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Release the underlying stream.
    pub fn into_inner(self) -> T {
        self.framed.into_inner()
    }
}

impl SerialLink<DuplexStream> {
    /// Create two connected in-memory links.
    ///
    /// The first end is conventionally given to the Control node and the
    /// second to the HMI node; the link itself is symmetric.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorlock_protocol::{Channel, SerialLink};
    ///
    /// #[tokio::main]
    /// async fn main() -> doorlock_core::Result<()> {
    ///     let (mut control, mut hmi) = SerialLink::pair();
    ///
    ///     hmi.send_byte(0x01).await?;
    ///     assert_eq!(control.receive_byte().await?, 0x01);
    ///     Ok(())
    /// }
    /// ```
    pub fn pair() -> (Self, Self) {
        let (a, b) = tokio::io::duplex(PAIR_BUFFER_SIZE);
        (Self::with_name(a, "control"), Self::with_name(b, "hmi"))
    }
}

impl<T> Channel for SerialLink<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send_byte(&mut self, byte: u8) -> Result<()> {
        trace!(link = self.name, "tx 0x{:02X}", byte);
        self.framed.send(byte).await
    }

    async fn receive_byte(&mut self) -> Result<u8> {
        match self.framed.next().await {
            Some(Ok(byte)) => {
                trace!(link = self.name, "rx 0x{:02X}", byte);
                Ok(byte)
            }
            Some(Err(e)) => Err(e),
            None => Err(Error::LinkClosed),
        }
    }

    async fn send_buffer(&mut self, buffer: &[u8; PASSWORD_LENGTH]) -> Result<()> {
        trace!(link = self.name, "tx {} payload bytes", buffer.len());
        for &byte in buffer {
            self.framed.feed(byte).await?;
        }
        self.framed.flush().await
    }
}
