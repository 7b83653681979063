use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::{Connect, Disconnect, EncodeError, Publish};

pub const CONNECT: u8 = 1;
pub const CONNACK: u8 = 2;
pub const PUBLISH: u8 = 3;
pub const DISCONNECT: u8 = 14;

pub const PROTOCOL_NAME: &str = "MQTT";

/// MQTT 3.1.1
pub const PROTOCOL_LEVEL: u8 = 4;

/// Packets a publish-only client sends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Packet {
    Connect(Connect),
    Publish(Publish),
    Disconnect(Disconnect),
}

impl Packet {
    pub fn encode(&self, data: &mut BytesMut, max_size: usize) -> Result<(), EncodeError> {
        match self {
            Packet::Connect(connect) => connect.encode(data, max_size),
            Packet::Publish(publish) => publish.encode(data, max_size),
            Packet::Disconnect(disconnect) => disconnect.encode(data, max_size),
        }
    }

    /// Encodes the packet into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Bytes, EncodeError> {
        let mut data = BytesMut::new();
        self.encode(&mut data, usize::MAX)?;
        Ok(data.freeze())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Packet::Connect(_) => "CONNECT",
            Packet::Publish(_) => "PUBLISH",
            Packet::Disconnect(_) => "DISCONNECT",
        }
    }
}

impl From<Connect> for Packet {
    fn from(connect: Connect) -> Self {
        Packet::Connect(connect)
    }
}

impl From<Publish> for Packet {
    fn from(publish: Publish) -> Self {
        Packet::Publish(publish)
    }
}

impl From<Disconnect> for Packet {
    fn from(disconnect: Disconnect) -> Self {
        Packet::Disconnect(disconnect)
    }
}
