use bytes::Bytes;
use bytestring::ByteString;
use codec::{Packet, Publish};

use crate::{Client, Result};

/// Builds a QoS 0 PUBLISH and sends it on the client's connection.
pub struct PublishBuilder<'a> {
    client: &'a mut Client,
    topic: ByteString,
    payload: Bytes,
}

impl<'a> PublishBuilder<'a> {
    pub(crate) fn new(client: &'a mut Client, topic: ByteString) -> Self {
        Self {
            client,
            topic,
            payload: Bytes::new(),
        }
    }

    #[inline]
    pub fn payload(self, payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            ..self
        }
    }

    pub async fn send(self) -> Result<()> {
        let topic = self.topic.clone();
        let packet = Packet::Publish(Publish {
            topic: self.topic,
            payload: self.payload,
        });
        self.client.send(&packet).await?;
        tracing::info!(topic = %topic, "message published");
        Ok(())
    }
}
