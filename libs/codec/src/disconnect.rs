use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::packet::DISCONNECT;
use crate::EncodeError;

/// Disconnect notification
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Disconnect;

impl Disconnect {
    pub(crate) fn encode(&self, data: &mut BytesMut, max_size: usize) -> Result<(), EncodeError> {
        ensure!(max_size > 0, EncodeError::PacketTooLarge);
        data.put_slice(&[DISCONNECT << 4, 0]);
        Ok(())
    }
}
