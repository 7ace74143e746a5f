//! Pan-tilter commands.
use super::TERMINATOR;
use binrw::binrw;
#[cfg(feature = "clap")]
use clap::ValueEnum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pan/tilt drive direction, as the two trailing `xx yy` bytes.
#[binrw]
#[brw(repr = u16, big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PanTiltDirection {
    Up = 0x0301,
    Down = 0x0302,
    Left = 0x0103,
    Right = 0x0203,
    UpLeft = 0x0101,
    UpRight = 0x0201,
    DownLeft = 0x0102,
    DownRight = 0x0202,
    Stop = 0x0303,
}

impl PanTiltDirection {
    pub const ALL: [Self; 9] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::UpLeft,
        Self::UpRight,
        Self::DownLeft,
        Self::DownRight,
        Self::Stop,
    ];
}

/// `Pan-tiltDrive`: `01 06 01 vv ww xx yy ff`
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanTiltDrive {
    /// Pan speed (`vv`).
    pub pan_speed: u8,
    /// Tilt speed (`ww`).
    pub tilt_speed: u8,
    pub direction: PanTiltDirection,

    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

impl PanTiltDrive {
    /// Fastest tilt speed the pan-tilter accepts.
    pub const MAX_TILT_SPEED: u8 = 0x14;

    /// Drives in `direction` at `speed`.
    ///
    /// Tilt speed is capped at [`MAX_TILT_SPEED`][Self::MAX_TILT_SPEED]; pan
    /// speed is sent as-is.
    pub const fn new(speed: u8, direction: PanTiltDirection) -> Self {
        let tilt_speed = if speed > Self::MAX_TILT_SPEED {
            Self::MAX_TILT_SPEED
        } else {
            speed
        };

        Self {
            pan_speed: speed,
            tilt_speed,
            direction,
        }
    }
}

/// `Pan-tiltDrive Home`: `01 06 04 ff`
#[binrw]
#[brw(big)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Home {
    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

pub const HOME: Home = Home {};
