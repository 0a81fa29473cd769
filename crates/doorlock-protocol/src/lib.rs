//! Inter-node protocol for the door lock.
//!
//! The protocol is a fixed vocabulary of single-byte opcodes exchanged over a
//! point-to-point byte stream. Every exchange starts with the initiator's
//! ready byte; payloads have a length implied by the opcode and no framing,
//! length or checksum of their own.
//!
//! - [`opcode`]: the byte values and their typed views
//! - [`codec`]: the one-byte tokio codec used on the stream
//! - [`link`]: the [`Channel`] capability and its [`SerialLink`] implementation
//! - [`exchange`]: handshake primitives shared by both nodes

pub mod codec;
pub mod exchange;
pub mod link;
pub mod opcode;

pub use codec::ByteCodec;
pub use exchange::{await_token, issue_command, read_status, send_token};
pub use link::{Channel, SerialLink};
pub use opcode::{Command, Opcode, ReadyToken, Status};
