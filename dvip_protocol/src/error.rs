use thiserror::Error;

/// Error types.
#[derive(Debug, Error)]
pub enum Error {
    #[cfg(test)]
    #[error(transparent)]
    FromHexError(#[from] hex::FromHexError),

    #[error("invalid command format")]
    InvalidFormat,

    #[error("index {0} out of range")]
    IndexOutOfRange(usize),

    #[error("choice {0:#04x} not found")]
    NotFound(u8),

    #[error("payload too large for frame: {0} bytes")]
    PayloadTooLarge(usize),

    #[error("invalid device address {0}, must be 1..=7")]
    InvalidAddress(u8),

    #[error("parameter out of valid range")]
    ParameterOutOfRange,

    #[error("data parse error: {0}")]
    BinRwError(#[from] binrw::Error),
}
