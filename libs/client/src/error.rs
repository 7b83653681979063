use codec::{DecodeError, EncodeError};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The socket failed to send or receive.
    #[error("transport: {0}")]
    Transport(#[from] std::io::Error),

    /// The broker answered with something other than an accepting CONNACK.
    #[error("protocol: {0}")]
    Protocol(DecodeError),

    /// A packet could not be encoded.
    #[error("validation: {0}")]
    Validation(EncodeError),
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Io(err) => Error::Transport(err),
            err => Error::Protocol(err),
        }
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Io(err) => Error::Transport(err),
            err => Error::Validation(err),
        }
    }
}
