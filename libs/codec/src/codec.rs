use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::connack::CONNACK_LEN;
use crate::{ConnAck, DecodeError, EncodeError, Packet};

pub struct Codec<R, W> {
    reader: R,
    writer: W,
    output_max_size: usize,
    read_buf: BytesMut,
    write_buf: BytesMut,
}

impl<R, W> Codec<R, W>
where
    R: AsyncRead + Send + Unpin,
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            output_max_size: usize::MAX,
            read_buf: BytesMut::with_capacity(CONNACK_LEN),
            write_buf: BytesMut::new(),
        }
    }

    pub fn set_output_max_size(&mut self, size: usize) {
        self.output_max_size = size;
    }

    /// Reads exactly the four bytes of a CONNACK, across as many partial
    /// reads as the stream hands out, and validates them.
    pub async fn read_conn_ack(&mut self) -> Result<ConnAck, DecodeError> {
        while self.read_buf.len() < CONNACK_LEN {
            let mut chunk = [0; CONNACK_LEN];
            let want = CONNACK_LEN - self.read_buf.len();
            let n = self.reader.read(&mut chunk[..want]).await?;
            if n == 0 {
                let got = self.read_buf.len();
                self.read_buf.clear();
                return Err(DecodeError::ShortRead(got));
            }
            self.read_buf.extend_from_slice(&chunk[..n]);
        }

        let data = self.read_buf.split_to(CONNACK_LEN);
        ConnAck::decode(&data)
    }

    /// Writes the whole encoded packet and flushes the stream.
    pub async fn encode(&mut self, packet: &Packet) -> Result<usize, EncodeError> {
        self.write_buf.clear();
        packet.encode(&mut self.write_buf, self.output_max_size)?;
        self.writer.write_all(&self.write_buf).await?;
        self.writer.flush().await?;
        let size = self.write_buf.len();
        self.write_buf.clear();
        Ok(size)
    }

    /// Shuts down the write half.
    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        self.writer.shutdown().await
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
