//! Caller-supplied raw commands.
use crate::{Error, Result};
use binrw::{binrw, helpers::until_eof};
use std::{fmt, str::FromStr};

/// A raw VISCA command, sent verbatim after the device address.
///
/// Custom commands are entered as hex strings, with optional whitespace
/// between digits (eg: `"81 01 04 00 02 FF"`). The first byte must be a VISCA
/// header (`8x`), and there must be a whole number of bytes.
#[binrw]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CustomCommand {
    #[br(parse_with = until_eof)]
    bytes: Vec<u8>,
}

impl CustomCommand {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl FromStr for CustomCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() < 3
            || !digits.starts_with('8')
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            debug!("invalid custom command: {s:?}");
            return Err(Error::InvalidFormat);
        }

        let bytes = hex::decode(&digits).map_err(|e| {
            debug!("invalid custom command {s:?}: {e}");
            Error::InvalidFormat
        })?;
        Ok(Self { bytes })
    }
}

impl fmt::Debug for CustomCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomCommand")
            .field(&hex::encode(&self.bytes))
            .finish()
    }
}

impl fmt::Display for CustomCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(&self.bytes))
    }
}
