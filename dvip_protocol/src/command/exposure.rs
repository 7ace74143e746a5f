//! Exposure commands: AE mode, iris and shutter.
use super::TERMINATOR;
use crate::{Error, Result};
use binrw::binrw;
#[cfg(feature = "clap")]
use clap::ValueEnum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Automatic exposure mode.
#[binrw]
#[brw(repr = u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExposureMode {
    #[default]
    FullAuto = 0x00,
    Manual = 0x03,
    ShutterPriority = 0x0a,
    IrisPriority = 0x0b,
    Bright = 0x0d,
}

impl ExposureMode {
    /// Modes in option order.
    pub const OPTIONS: [Self; 5] = [
        Self::FullAuto,
        Self::Manual,
        Self::ShutterPriority,
        Self::IrisPriority,
        Self::Bright,
    ];

    /// Gets a mode by its option index (`0..=4`).
    ///
    /// ## Errors
    ///
    /// * [`Error::ParameterOutOfRange`] for any other index
    pub fn from_option(index: usize) -> Result<Self> {
        Self::OPTIONS
            .get(index)
            .copied()
            .ok_or(Error::ParameterOutOfRange)
    }
}

/// `CAM_AE`: `01 04 39 pp ff`
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetExposureMode {
    pub mode: ExposureMode,

    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

impl SetExposureMode {
    pub const fn new(mode: ExposureMode) -> Self {
        Self { mode }
    }
}

/// Step direction for iris and shutter.
#[binrw]
#[brw(repr = u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Adjust {
    Up = 0x02,
    Down = 0x03,
}

/// `CAM_Iris Up/Down` and `CAM_Shutter Up/Down`: `01 04 0b pp ff` /
/// `01 04 0a pp ff`
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustStep {
    pub adjust: Adjust,

    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

impl AdjustStep {
    pub const fn new(adjust: Adjust) -> Self {
        Self { adjust }
    }
}

/// `CAM_Iris Direct` and `CAM_Shutter Direct`: `01 04 4b 00 00 0p 0q ff` /
/// `01 04 4a 00 00 0p 0q ff`
///
/// The position is split over two nibbles, high nibble first. See
/// [IRIS][crate::choice::IRIS] and [SHUTTER][crate::choice::SHUTTER] for
/// values.
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectPosition {
    #[brw(pad_before = 2)]
    #[br(temp, assert(high <= 0x0f))]
    #[bw(calc = (self.position & 0xf0) >> 4)]
    high: u8,

    #[br(temp, assert(low <= 0x0f))]
    #[bw(calc = self.position & 0x0f)]
    low: u8,

    #[br(calc = (high << 4) | low)]
    #[bw(ignore)]
    pub position: u8,

    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

impl DirectPosition {
    pub const fn new(position: u8) -> Self {
        Self { position }
    }
}
