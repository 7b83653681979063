use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::packet::CONNACK;
use crate::DecodeError;

/// Size of a CONNACK on the wire: fixed header, remaining length of 2,
/// acknowledge flags and return code.
pub const CONNACK_LEN: usize = 4;

/// CONNACK return codes defined by MQTT 3.1.1.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, IntoPrimitive, TryFromPrimitive, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum ConnectReturnCode {
    Accepted = 0x00,
    UnacceptableProtocolVersion = 0x01,
    IdentifierRejected = 0x02,
    ServerUnavailable = 0x03,
    BadUserNameOrPassword = 0x04,
    NotAuthorized = 0x05,
}

impl ConnectReturnCode {
    #[inline]
    pub fn is_success(&self) -> bool {
        *self == ConnectReturnCode::Accepted
    }
}

impl Display for ConnectReturnCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Accepted => "connection accepted",
            Self::UnacceptableProtocolVersion => "unacceptable protocol version",
            Self::IdentifierRejected => "identifier rejected",
            Self::ServerUnavailable => "server unavailable",
            Self::BadUserNameOrPassword => "bad user name or password",
            Self::NotAuthorized => "not authorized",
        };
        write!(f, "{}", value)
    }
}

/// Connect acknowledgment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConnAck {
    pub session_present: bool,
    pub return_code: u8,
}

impl ConnAck {
    /// Validates the four bytes of a CONNACK.
    ///
    /// The remaining length is compared as a raw byte against 2 rather than
    /// varint-decoded. A nonzero return code is an error carrying the code.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        ensure!(data.len() >= CONNACK_LEN, DecodeError::ShortRead(data.len()));
        ensure!(data.len() == CONNACK_LEN, DecodeError::MalformedPacket);

        let (flag, remaining_length, ack_flags, return_code) = (data[0], data[1], data[2], data[3]);

        ensure!(flag == CONNACK << 4, DecodeError::UnexpectedPacketType(flag));
        ensure!(
            remaining_length == 2,
            DecodeError::UnexpectedRemainingLength(remaining_length)
        );
        ensure!(
            return_code == u8::from(ConnectReturnCode::Accepted),
            DecodeError::ConnectionRefused(return_code)
        );

        Ok(Self {
            session_present: ack_flags & 0x01 > 0,
            return_code,
        })
    }

    /// Symbolic return code, when it is one MQTT 3.1.1 defines.
    pub fn reason(&self) -> Option<ConnectReturnCode> {
        ConnectReturnCode::try_from(self.return_code).ok()
    }
}
