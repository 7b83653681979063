use std::convert::TryFrom;

use thiserror::Error;

use crate::ConnectReturnCode;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed packet")]
    MalformedPacket,

    #[error("short read: expected 4 bytes, got {0}")]
    ShortRead(usize),

    #[error("unexpected packet type: {0:#04x}")]
    UnexpectedPacketType(u8),

    #[error("unexpected remaining length: {0}")]
    UnexpectedRemainingLength(u8),

    #[error("connection refused, return code: {0}")]
    ConnectionRefused(u8),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// The broker's CONNACK return code, if this error is a refusal with a
    /// code defined by MQTT 3.1.1.
    pub fn refused_reason(&self) -> Option<ConnectReturnCode> {
        match self {
            DecodeError::ConnectionRefused(code) => ConnectReturnCode::try_from(*code).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{field} too long: {len} bytes")]
    FieldTooLong { field: &'static str, len: usize },

    #[error("packet too large")]
    PacketTooLarge,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
