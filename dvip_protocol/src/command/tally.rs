use super::TERMINATOR;
use crate::{Error, Result};
use binrw::binrw;
#[cfg(feature = "clap")]
use clap::ValueEnum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tally lamp state.
#[binrw]
#[brw(repr = u16, big)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TallyColour {
    /// Program
    Red = 0x0203,
    /// Preview
    Green = 0x0302,
    #[default]
    Off = 0x0303,
}

impl TallyColour {
    pub const OPTIONS: [Self; 3] = [Self::Red, Self::Green, Self::Off];

    /// Gets a colour by its option index (`0..=2`).
    pub fn from_option(index: usize) -> Result<Self> {
        Self::OPTIONS
            .get(index)
            .copied()
            .ok_or(Error::ParameterOutOfRange)
    }
}

/// Datavideo tally extension: `01 7e 01 0a 00 pp qq ff`
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub colour: TallyColour,

    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

impl Tally {
    pub const fn new(colour: TallyColour) -> Self {
        Self { colour }
    }
}
