mod client;
mod error;
mod publish;

pub use client::{Client, ClientBuilder};
pub use codec::{ConnAck, ConnectReturnCode, DecodeError, EncodeError};
pub use error::{Error, Result};
pub use publish::PublishBuilder;
