//! Tokio codec for the single-byte wire format.
//!
//! The link has no frames: each byte is either an opcode or one digit of a
//! password payload, and only the receiver's position in an exchange tells
//! which. [`ByteCodec`] therefore yields bytes one at a time and leaves all
//! interpretation to the exchange layer.
//!
//! ```
//! use bytes::BytesMut;
//! use tokio_util::codec::{Decoder, Encoder};
//! use doorlock_protocol::ByteCodec;
//!
//! let mut codec = ByteCodec::new();
//! let mut buffer = BytesMut::new();
//! codec.encode(0x01, &mut buffer).unwrap();
//! codec.encode(0x25, &mut buffer).unwrap();
//!
//! assert_eq!(codec.decode(&mut buffer).unwrap(), Some(0x01));
//! assert_eq!(codec.decode(&mut buffer).unwrap(), Some(0x25));
//! assert_eq!(codec.decode(&mut buffer).unwrap(), None);
//! ```

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use doorlock_core::{Error, Result};

/// One-byte codec for the inter-node link.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteCodec {
    _private: (),
}

impl ByteCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for ByteCodec {
    type Item = u8;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<u8>> {
        if src.has_remaining() {
            Ok(Some(src.get_u8()))
        } else {
            Ok(None)
        }
    }
}

impl Encoder<u8> for ByteCodec {
    type Error = Error;

    fn encode(&mut self, item: u8, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(1);
        dst.put_u8(item);
        Ok(())
    }
}
