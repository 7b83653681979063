use bytes::{BufMut, Bytes, BytesMut};
use bytestring::ByteString;
use serde::{Deserialize, Serialize};

use crate::packet::PUBLISH;
use crate::writer::{bytes_remaining_length, field_length, PacketWriter};
use crate::EncodeError;

/// Publish message, QoS 0 without DUP or RETAIN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Publish {
    pub topic: ByteString,
    #[serde(default)]
    pub payload: Bytes,
}

impl Publish {
    pub fn new(topic: impl Into<ByteString>, payload: impl Into<Bytes>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    #[inline]
    fn variable_header_length(&self) -> Result<usize, EncodeError> {
        field_length("topic", self.topic.as_bytes())
    }

    #[inline]
    fn payload_length(&self) -> usize {
        self.payload.len()
    }

    /// The remaining length covers the two-byte topic prefix as well as the
    /// topic and payload bytes.
    pub(crate) fn encode(&self, data: &mut BytesMut, max_size: usize) -> Result<(), EncodeError> {
        let size = self.variable_header_length()? + self.payload_length();
        ensure!(size < max_size, EncodeError::PacketTooLarge);
        data.reserve(1 + bytes_remaining_length(size)? + size);

        data.put_u8(PUBLISH << 4);
        data.write_remaining_length(size)?;
        data.write_string("topic", &self.topic)?;
        data.put_slice(&self.payload);
        Ok(())
    }
}
