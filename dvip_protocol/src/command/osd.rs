//! On-screen display (camera menu) commands.
//!
//! Most menu navigation is done by sending pan/tilt drives at fixed speeds
//! while the menu is shown.
use super::{Command, PanTiltDirection, PanTiltDrive, TERMINATOR};
use crate::{Error, Result};
use binrw::binrw;
#[cfg(feature = "clap")]
use clap::ValueEnum;
use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[binrw]
#[brw(repr = u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OnOff {
    On = 0x02,
    Off = 0x03,
}

/// `OSD On/Off`: `01 06 06 pp ff`
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsdDisplay {
    pub state: OnOff,

    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

impl OsdDisplay {
    pub const fn new(state: OnOff) -> Self {
        Self { state }
    }
}

/// Datavideo menu "enter" extension: `01 7e 01 02 00 01 ff`
#[binrw]
#[brw(big)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OsdEnter {
    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

/// Menu button, in option order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OsdButton {
    On = 0,
    Off = 1,
    Enter = 2,
    Back = 3,
    Up = 4,
    Down = 5,
    Left = 6,
    Right = 7,
    Release = 8,
}

impl OsdButton {
    /// Gets a button by its option index (`0..=8`).
    pub fn from_option(index: usize) -> Result<Self> {
        Self::from_usize(index).ok_or(Error::ParameterOutOfRange)
    }

    /// The command sent for this button.
    pub const fn command(self) -> Command {
        match self {
            Self::On => Command::OsdDisplay(OsdDisplay::new(OnOff::On)),
            Self::Off => Command::OsdDisplay(OsdDisplay::new(OnOff::Off)),
            Self::Enter => Command::OsdEnter(OsdEnter {}),
            Self::Back => Command::PanTiltDrive(PanTiltDrive::new(0x09, PanTiltDirection::Left)),
            Self::Up => Command::PanTiltDrive(PanTiltDrive::new(0x0a, PanTiltDirection::Up)),
            Self::Down => Command::PanTiltDrive(PanTiltDrive::new(0x0a, PanTiltDirection::Down)),
            Self::Left => Command::PanTiltDrive(PanTiltDrive::new(0x0a, PanTiltDirection::Left)),
            Self::Right => Command::PanTiltDrive(PanTiltDrive::new(0x0a, PanTiltDirection::Right)),
            Self::Release => Command::PanTiltDrive(PanTiltDrive::new(0x01, PanTiltDirection::Stop)),
        }
    }
}

impl From<OsdButton> for Command {
    fn from(button: OsdButton) -> Self {
        button.command()
    }
}
