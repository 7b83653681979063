//! MQTT 3.1.1 packet codec for a publish-only client.
//!
//! Encodes CONNECT, PUBLISH (QoS 0) and DISCONNECT, and validates the
//! four-byte CONNACK a broker answers CONNECT with.

#![forbid(unsafe_code)]
#![warn(clippy::default_trait_access)]

#[macro_use]
mod macros;
mod codec;
mod connack;
mod connect;
mod disconnect;
mod error;
mod packet;
mod publish;
mod writer;

use bytes::{Bytes, BytesMut};

pub use codec::Codec;
pub use connack::{ConnAck, ConnectReturnCode, CONNACK_LEN};
pub use connect::Connect;
pub use disconnect::Disconnect;
pub use error::{DecodeError, EncodeError};
pub use packet::{Packet, PROTOCOL_LEVEL, PROTOCOL_NAME};
pub use publish::Publish;
pub use writer::{
    bytes_remaining_length, encode_remaining_length, PacketWriter, MAX_FIELD_LENGTH,
    MAX_REMAINING_LENGTH,
};

pub fn encode_connect(connect: &Connect) -> Result<Bytes, EncodeError> {
    let mut data = BytesMut::new();
    connect.encode(&mut data, usize::MAX)?;
    Ok(data.freeze())
}

pub fn decode_conn_ack(data: &[u8]) -> Result<ConnAck, DecodeError> {
    ConnAck::decode(data)
}

pub fn encode_publish(publish: &Publish) -> Result<Bytes, EncodeError> {
    let mut data = BytesMut::new();
    publish.encode(&mut data, usize::MAX)?;
    Ok(data.freeze())
}

pub fn encode_disconnect() -> Bytes {
    Bytes::from_static(&[packet::DISCONNECT << 4, 0])
}
