use std::io::Error as IoError;
use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[cfg(test)]
    #[error(transparent)]
    FromHexError(#[from] hex::FromHexError),

    #[error(transparent)]
    IoError(#[from] IoError),

    #[error(transparent)]
    Protocol(#[from] crate::protocol::Error),

    #[error("data parse error: {0}")]
    BinRwError(#[from] binrw::Error),

    #[error("not connected")]
    NotConnected,

    #[error("disconnected by camera")]
    Disconnected,

    #[error("channel unavailable, likely dropped")]
    ChannelUnavailable,

    #[error("timeout waiting for connection")]
    Timeout,

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("parameter out of valid range")]
    ParameterOutOfRange,
}
