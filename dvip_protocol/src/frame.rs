//! # DVIP transport framing
//!
//! Datavideo's DVIP transport carries VISCA packets over a TCP stream. Each
//! packet is prefixed with a big-endian length, and the VISCA header byte
//! addressing one camera on the (virtual) VISCA bus.
//!
//! ## Packet format
//!
//! * `u16`: length, see [LengthMode]
//! * `u8`: VISCA header, `0x80 | device address`
//! * payload: a VISCA [command][crate::Command] or inquiry, normally
//!   terminated with `0xff`
//!
//! The camera acknowledges accepted commands with [ACK_PACKET]. Other replies
//! are not decoded.
use crate::{Error, Result};
use binrw::{binrw, BinRead, BinWrite};
#[cfg(feature = "clap")]
use clap::ValueEnum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Default DVIP TCP port.
pub const DEFAULT_PORT: u16 = 5002;

/// Acknowledgement sent by the camera for accepted commands.
pub const ACK_PACKET: [u8; 8] = [0x00, 0x08, 0x81, 0x09, 0x7e, 0x7e, 0x70, 0xff];

/// Returns `true` if `data` is exactly an [ACK_PACKET].
pub fn is_acknowledgement(data: &[u8]) -> bool {
    data == ACK_PACKET
}

/// What the [Frame] length field counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LengthMode {
    /// The header byte and payload.
    #[default]
    Body,

    /// The whole packet, including the two length bytes.
    ///
    /// This is what Datavideo's own controllers send, and matches the length
    /// of [ACK_PACKET].
    Packet,
}

impl LengthMode {
    /// Number of bytes counted by the length field in addition to the header
    /// byte and payload.
    const fn overhead(self) -> usize {
        match self {
            Self::Body => 0,
            Self::Packet => 2,
        }
    }

    /// Value of the length field for a payload of `payload_len` bytes.
    fn length(self, payload_len: usize) -> Result<u16> {
        (payload_len + 1 + self.overhead())
            .try_into()
            .map_err(|_| {
                error!("{payload_len} byte payload does not fit in a {self:?} frame");
                Error::PayloadTooLarge(payload_len)
            })
    }
}

/// A VISCA payload addressed to one device, wrapped for the DVIP transport.
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(big)]
#[br(import(mode: LengthMode))]
#[bw(import(mode: LengthMode))]
pub struct Frame {
    #[br(temp, assert(usize::from(length) > mode.overhead()))]
    #[bw(try_calc(mode.length(self.payload.len())))]
    length: u16,

    /// VISCA header, `0x80 | address`.
    #[br(temp, assert(
        header & 0xf8 == 0x80
            && (Self::MIN_ADDRESS..=Self::MAX_ADDRESS).contains(&(header & 0x07)),
        "invalid VISCA header {:#04x}",
        header
    ))]
    #[bw(calc = self.header())]
    header: u8,

    /// Device address (`1..=7`).
    #[br(calc = header & 0x07)]
    #[bw(ignore)]
    pub address: u8,

    /// VISCA payload.
    #[br(count = usize::from(length) - 1 - mode.overhead())]
    pub payload: Vec<u8>,
}

impl Frame {
    /// Lowest valid device address.
    pub const MIN_ADDRESS: u8 = 1;
    /// Highest valid device address.
    pub const MAX_ADDRESS: u8 = 7;

    /// Wraps a VISCA `payload` for the device at `address`.
    ///
    /// ## Errors
    ///
    /// * [`Error::InvalidAddress`] when `address` is not in `1..=7`
    /// * [`Error::PayloadTooLarge`] when the length field would overflow
    pub fn new(address: u8, payload: Vec<u8>) -> Result<Self> {
        if !(Self::MIN_ADDRESS..=Self::MAX_ADDRESS).contains(&address) {
            error!("device address {address} out of range");
            return Err(Error::InvalidAddress(address));
        }
        LengthMode::Body.length(payload.len())?;
        Ok(Self { address, payload })
    }

    /// The VISCA header byte for this frame.
    pub const fn header(&self) -> u8 {
        0x80 | self.address
    }

    /// Encodes the frame for the wire.
    ///
    /// ## Errors
    ///
    /// * [`Error::PayloadTooLarge`] when the length field would overflow
    ///   with the given `mode`
    pub fn to_bytes(&self, mode: LengthMode) -> Result<Vec<u8>> {
        let length = mode.length(self.payload.len())?;
        let mut out = Cursor::new(Vec::with_capacity(usize::from(length) + 2));
        self.write_args(&mut out, (mode,))?;
        Ok(out.into_inner())
    }

    /// Decodes a single frame from `data`.
    pub fn parse(data: &[u8], mode: LengthMode) -> Result<Self> {
        Ok(Self::read_args(&mut Cursor::new(data), (mode,))?)
    }
}
