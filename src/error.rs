use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("message too short for a DNS header")]
    ErrShortHeader,
    /// The socket was closed or invalidated while a receive was in flight.
    ///
    /// [`PacketSocket`](crate::PacketSocket) implementations return this (or
    /// an [`Io`](Error::Io) equivalent) when the engine tears the transport
    /// down; it is how a blocked listener learns about shutdown or recovery.
    #[error("use of closed socket")]
    ErrSocketClosed,
    #[error("{0}")]
    Io(#[source] IoError),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
#[error("io error: {0}")]
pub struct IoError(#[from] pub io::Error);

// Workaround for wanting PartialEq for io::Error.
impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind() == other.0.kind()
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(IoError(e))
    }
}
