use bytes::{BufMut, Bytes, BytesMut};
use bytestring::ByteString;
use serde::{Deserialize, Serialize};

use crate::packet::{CONNECT, PROTOCOL_LEVEL, PROTOCOL_NAME};
use crate::writer::{bytes_remaining_length, field_length, PacketWriter};
use crate::EncodeError;

const CF_USERNAME: u8 = 0b10000000;
const CF_PASSWORD: u8 = 0b01000000;
const CF_CLEAN_SESSION: u8 = 0b00000010;

/// Connection Request
///
/// An empty username or password counts as absent: neither its flag nor
/// its field is written. A password without a username is encoded as
/// given; MQTT 3.1.1 forbids it but brokers are left to reject it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Connect {
    #[serde(default = "default_keep_alive")]
    pub keep_alive: u16,
    #[serde(default = "default_clean_session")]
    pub clean_session: bool,
    pub client_id: ByteString,
    pub username: Option<ByteString>,
    pub password: Option<Bytes>,
}

fn default_keep_alive() -> u16 {
    60
}

fn default_clean_session() -> bool {
    true
}

impl Connect {
    pub fn new(client_id: impl Into<ByteString>) -> Self {
        Self {
            keep_alive: default_keep_alive(),
            clean_session: default_clean_session(),
            client_id: client_id.into(),
            username: None,
            password: None,
        }
    }

    #[inline]
    fn username(&self) -> Option<&ByteString> {
        self.username.as_ref().filter(|username| !username.is_empty())
    }

    #[inline]
    fn password(&self) -> Option<&Bytes> {
        self.password.as_ref().filter(|password| !password.is_empty())
    }

    #[inline]
    fn flags(&self) -> u8 {
        let mut flag = 0;
        if self.clean_session {
            flag |= CF_CLEAN_SESSION;
        }
        if self.username().is_some() {
            flag |= CF_USERNAME;
        }
        if self.password().is_some() {
            flag |= CF_PASSWORD;
        }
        flag
    }

    #[inline]
    fn variable_header_length(&self) -> usize {
        // protocol
        2 + PROTOCOL_NAME.len() +
        // level
        1 +
        // flags
        1 +
        // keep alive
        2
    }

    #[inline]
    fn payload_length(&self) -> Result<usize, EncodeError> {
        let mut len = field_length("client id", self.client_id.as_bytes())?;
        if let Some(username) = self.username() {
            len += field_length("username", username.as_bytes())?;
        }
        if let Some(password) = self.password() {
            len += field_length("password", password)?;
        }
        Ok(len)
    }

    pub(crate) fn encode(&self, data: &mut BytesMut, max_size: usize) -> Result<(), EncodeError> {
        let size = self.variable_header_length() + self.payload_length()?;
        ensure!(size < max_size, EncodeError::PacketTooLarge);
        data.reserve(1 + bytes_remaining_length(size)? + size);

        data.put_u8(CONNECT << 4);
        data.write_remaining_length(size)?;

        // write variable header
        data.write_string("protocol name", PROTOCOL_NAME)?;
        data.put_u8(PROTOCOL_LEVEL);
        data.put_u8(self.flags());
        data.put_u16(self.keep_alive);

        // write payload
        data.write_string("client id", &self.client_id)?;

        if let Some(username) = self.username() {
            data.write_string("username", username)?;
        }
        if let Some(password) = self.password() {
            data.write_binary("password", password)?;
        }

        Ok(())
    }
}
