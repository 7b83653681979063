use bytes::Bytes;
use bytestring::ByteString;
use codec::{ConnAck, Connect, Disconnect, Packet};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::{PublishBuilder, Result};

type Codec = codec::Codec<Box<dyn AsyncRead + Send + Unpin>, Box<dyn AsyncWrite + Send + Unpin>>;

pub struct ClientBuilder<A> {
    addrs: A,
    connect: Connect,
    max_packet_size: Option<usize>,
}

impl<A> ClientBuilder<A> {
    fn new(addrs: A) -> Self {
        Self {
            addrs,
            connect: Connect::new(ByteString::new()),
            max_packet_size: None,
        }
    }

    #[inline]
    pub fn keep_alive(mut self, seconds: u16) -> Self {
        self.connect.keep_alive = seconds;
        self
    }

    #[inline]
    pub fn clean_session(mut self, clean_session: bool) -> Self {
        self.connect.clean_session = clean_session;
        self
    }

    #[inline]
    pub fn client_id(mut self, client_id: impl Into<ByteString>) -> Self {
        self.connect.client_id = client_id.into();
        self
    }

    #[inline]
    pub fn login(self, user: impl Into<ByteString>, password: impl Into<Bytes>) -> Self {
        self.username(user).password(password)
    }

    #[inline]
    pub fn username(mut self, user: impl Into<ByteString>) -> Self {
        self.connect.username = Some(user.into());
        self
    }

    #[inline]
    pub fn password(mut self, password: impl Into<Bytes>) -> Self {
        self.connect.password = Some(password.into());
        self
    }

    #[inline]
    pub fn max_packet_size(mut self, size: usize) -> Self {
        self.max_packet_size = Some(size);
        self
    }

    /// Sends CONNECT over an already open stream and waits for the CONNACK.
    pub async fn handshake<R, W>(self, reader: R, writer: W) -> Result<Client>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let mut codec = Codec::new(Box::new(reader), Box::new(writer));
        if let Some(size) = self.max_packet_size {
            codec.set_output_max_size(size);
        }

        send_packet(&mut codec, &Packet::Connect(self.connect)).await?;

        let conn_ack = codec.read_conn_ack().await?;
        tracing::info!(
            session_present = conn_ack.session_present,
            "connection accepted",
        );

        Ok(Client { codec, conn_ack })
    }
}

impl<A: ToSocketAddrs> ClientBuilder<A> {
    /// Connects over TCP and performs the handshake.
    pub async fn build(self) -> Result<Client> {
        let stream = TcpStream::connect(&self.addrs).await?;
        if let Ok(addr) = stream.peer_addr() {
            tracing::info!(remote_addr = %addr, "connected to broker");
        }
        let (reader, writer) = stream.into_split();
        self.handshake(reader, writer).await
    }
}

/// One accepted MQTT session.
pub struct Client {
    codec: Codec,
    conn_ack: ConnAck,
}

impl Client {
    pub fn new<A: ToSocketAddrs>(addrs: A) -> ClientBuilder<A> {
        ClientBuilder::new(addrs)
    }

    #[inline]
    pub fn session_present(&self) -> bool {
        self.conn_ack.session_present
    }

    pub fn publish(&mut self, topic: impl Into<ByteString>) -> PublishBuilder<'_> {
        PublishBuilder::new(self, topic.into())
    }

    pub(crate) async fn send(&mut self, packet: &Packet) -> Result<()> {
        send_packet(&mut self.codec, packet).await
    }

    /// Sends DISCONNECT and closes the stream.
    ///
    /// The session is over either way, so a failed DISCONNECT is only
    /// logged.
    pub async fn disconnect(mut self) {
        if let Err(err) = send_packet(&mut self.codec, &Packet::Disconnect(Disconnect)).await {
            tracing::warn!(
                error = %err,
                "failed to send disconnect",
            );
        }
        if let Err(err) = self.codec.shutdown().await {
            tracing::debug!(
                error = %err,
                "failed to shutdown connection",
            );
        }
    }
}

async fn send_packet(codec: &mut Codec, packet: &Packet) -> Result<()> {
    let size = codec.encode(packet).await?;
    tracing::debug!(packet = packet.name(), size, "send packet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use codec::{DecodeError, EncodeError};
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

    use super::*;
    use crate::Error;

    async fn read_packet(broker: &mut DuplexStream) -> Vec<u8> {
        let mut header = [0; 2];
        broker.read_exact(&mut header).await.unwrap();
        assert!(header[1] < 0x80, "test packets fit a one byte length");
        let mut packet = header.to_vec();
        packet.resize(2 + header[1] as usize, 0);
        broker.read_exact(&mut packet[2..]).await.unwrap();
        packet
    }

    fn builder() -> ClientBuilder<&'static str> {
        Client::new("localhost:1883")
            .client_id("pdp11")
            .login("MQTT", "Password")
    }

    #[tokio::test]
    async fn test_session() {
        let (client, mut broker) = tokio::io::duplex(1024);
        let broker_task = tokio::spawn(async move {
            let connect = read_packet(&mut broker).await;
            broker.write_all(&[0x20, 0x02, 0x01, 0x00]).await.unwrap();
            let publish = read_packet(&mut broker).await;
            let disconnect = read_packet(&mut broker).await;
            (connect, publish, disconnect)
        });

        let (reader, writer) = tokio::io::split(client);
        let mut client = builder().keep_alive(30).handshake(reader, writer).await.unwrap();
        assert!(client.session_present());
        client
            .publish("pdp11/cpu_usage")
            .payload("42.5%")
            .send()
            .await
            .unwrap();
        client.disconnect().await;

        let (connect, publish, disconnect) = broker_task.await.unwrap();
        assert_eq!(connect[0], 0x10);
        assert_eq!(connect[9], 0xc2);
        assert_eq!(&connect[10..12], &[0x00, 30]);
        assert_eq!(&connect[12..19], b"\x00\x05pdp11");
        assert_eq!(&publish[..], b"\x30\x16\x00\x0fpdp11/cpu_usage42.5%");
        assert_eq!(&disconnect[..], &[0xe0, 0x00]);
    }

    #[tokio::test]
    async fn test_refused() {
        let (client, mut broker) = tokio::io::duplex(1024);
        tokio::spawn(async move {
            read_packet(&mut broker).await;
            broker.write_all(&[0x20, 0x02, 0x00, 0x05]).await.unwrap();
        });

        let (reader, writer) = tokio::io::split(client);
        let err = builder().handshake(reader, writer).await.err().unwrap();
        match err {
            Error::Protocol(err) => {
                assert!(matches!(err, DecodeError::ConnectionRefused(5)));
                assert_eq!(
                    err.refused_reason(),
                    Some(codec::ConnectReturnCode::NotAuthorized)
                );
            }
            err => panic!("unexpected error: {}", err),
        }
    }

    #[tokio::test]
    async fn test_closed_before_conn_ack() {
        let (client, mut broker) = tokio::io::duplex(1024);
        tokio::spawn(async move {
            read_packet(&mut broker).await;
            broker.write_all(&[0x20]).await.unwrap();
        });

        let (reader, writer) = tokio::io::split(client);
        let err = builder().handshake(reader, writer).await.err().unwrap();
        assert!(matches!(err, Error::Protocol(DecodeError::ShortRead(1))));
    }

    #[tokio::test]
    async fn test_disconnect_failure_is_not_fatal() {
        let (client, mut broker) = tokio::io::duplex(1024);
        let (reader, writer) = tokio::io::split(client);
        let broker_task = tokio::spawn(async move {
            read_packet(&mut broker).await;
            broker.write_all(&[0x20, 0x02, 0x00, 0x00]).await.unwrap();
        });

        let client = builder().handshake(reader, writer).await.unwrap();
        broker_task.await.unwrap();

        // the broker side is gone, so DISCONNECT cannot be written
        client.disconnect().await;
    }

    #[tokio::test]
    async fn test_publish_validation() {
        let (client, mut broker) = tokio::io::duplex(1024);
        tokio::spawn(async move {
            read_packet(&mut broker).await;
            broker.write_all(&[0x20, 0x02, 0x00, 0x00]).await.unwrap();
            let mut rest = Vec::new();
            broker.read_to_end(&mut rest).await.unwrap();
        });

        let (reader, writer) = tokio::io::split(client);
        let mut client = builder()
            .max_packet_size(64)
            .handshake(reader, writer)
            .await
            .unwrap();

        let err = client
            .publish("t".repeat(70_000))
            .send()
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Validation(EncodeError::FieldTooLong { field: "topic", .. })
        ));

        let err = client
            .publish("t")
            .payload(vec![0u8; 64])
            .send()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::Validation(EncodeError::PacketTooLarge)));
    }
}
