//! Zoom and focus commands.
use super::TERMINATOR;
use binrw::binrw;
#[cfg(feature = "clap")]
use clap::ValueEnum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `CAM_Zoom`: `01 04 07 pp ff`
///
/// `pp` is `0x00` to stop, `0x2p` to zoom in (tele) or `0x3p` to zoom out
/// (wide) at speed `p`.
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom {
    pub value: u8,

    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

impl Zoom {
    pub const STOP: Self = Self { value: 0x00 };

    /// Zoom in at `speed`.
    ///
    /// `speed` is added to `0x20` modulo 256, so values above `0x0f` spill
    /// into the command nibble and are not meaningful to the camera.
    pub const fn tele(speed: u8) -> Self {
        Self {
            value: speed.wrapping_add(0x20),
        }
    }

    /// Zoom out at `speed`, see [`Zoom::tele`].
    pub const fn wide(speed: u8) -> Self {
        Self {
            value: speed.wrapping_add(0x30),
        }
    }
}

/// Focus drive direction.
#[binrw]
#[brw(repr = u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Focus {
    Stop = 0x00,
    Far = 0x02,
    Near = 0x03,
}

/// `CAM_Focus`: `01 04 08 pp ff`
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusDrive {
    pub focus: Focus,

    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

impl FocusDrive {
    pub const fn new(focus: Focus) -> Self {
        Self { focus }
    }
}

#[binrw]
#[brw(repr = u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[cfg_attr(feature = "clap", derive(ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FocusMode {
    Auto = 0x02,
    Manual = 0x03,
}

impl FocusMode {
    /// `true` selects manual focus.
    pub const fn from_manual(manual: bool) -> Self {
        if manual {
            Self::Manual
        } else {
            Self::Auto
        }
    }
}

/// `CAM_Focus Auto/Manual`: `01 04 38 pp ff`
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetFocusMode {
    pub mode: FocusMode,

    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

impl SetFocusMode {
    pub const fn new(mode: FocusMode) -> Self {
        Self { mode }
    }
}
