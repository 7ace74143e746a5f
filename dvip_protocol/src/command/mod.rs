//! # VISCA commands
//!
//! A VISCA packet sent to a camera is a short byte string: a message type
//! (`0x01` command, `0x09` inquiry), a category (`0x04` camera, `0x06`
//! pan-tilter, `0x7e` vendor extension), a command code, parameters, and a
//! `0xff` terminator.
//!
//! The [VISCA header][crate::Frame::header] (device address) byte is *not*
//! part of a [Command]; it is added by the [Frame][crate::Frame].
//!
//! Each command family is modelled as its own structure in a submodule, and
//! [Command] ties them together with their command prefix as `magic`.
//!
//! Parameter nibbles (`0p`) are sent in the low 4 bits of each byte, so an
//! 8-bit value is split over two bytes (see [DirectPosition]).
//!
//! ## Command prefixes
//!
//! Prefix | Command
//! ------ | -------
//! `01 06 01` | [PanTiltDrive]
//! `01 06 04` | [Home]
//! `01 06 06` | [OsdDisplay]
//! `01 04 07` | [Zoom]
//! `01 04 08` | [FocusDrive]
//! `01 04 38` | [SetFocusMode]
//! `01 04 39` | [SetExposureMode]
//! `01 04 0b` | Iris [AdjustStep]
//! `01 04 4b` | Iris [DirectPosition]
//! `01 04 0a` | Shutter [AdjustStep]
//! `01 04 4a` | Shutter [DirectPosition]
//! `01 04 3f` | [Preset]
//! `01 7e 01 0b` | [PresetDriveSpeed]
//! `01 7e 01 0a 00` | [Tally]
//! `01 7e 01 02 00 01` | [OsdEnter]
//! `09 7e 7e 70` | [FullStatusInquiry]

mod custom;
mod exposure;
mod inquiry;
mod lens;
mod osd;
mod pan_tilt;
mod preset;
mod tally;

use crate::Result;
use binrw::{binrw, BinRead, BinWrite};
use std::{fmt::Debug, io::Cursor};

pub use self::{
    custom::CustomCommand,
    exposure::{Adjust, AdjustStep, DirectPosition, ExposureMode, SetExposureMode},
    inquiry::{FullStatusInquiry, FULL_STATUS_INQUIRY},
    lens::{Focus, FocusDrive, FocusMode, SetFocusMode, Zoom},
    osd::{OnOff, OsdButton, OsdDisplay, OsdEnter},
    pan_tilt::{Home, PanTiltDirection, PanTiltDrive, HOME},
    preset::{Preset, PresetAction, PresetDriveSpeed},
    tally::{Tally, TallyColour},
};

/// VISCA packet terminator.
pub(crate) const TERMINATOR: u8 = 0xff;

/// A VISCA command or inquiry, without the device address.
#[binrw]
#[brw(big)]
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    #[brw(magic = b"\x01\x06\x01")]
    PanTiltDrive(PanTiltDrive),
    #[brw(magic = b"\x01\x06\x04")]
    Home(Home),
    #[brw(magic = b"\x01\x06\x06")]
    OsdDisplay(OsdDisplay),
    #[brw(magic = b"\x01\x04\x07")]
    Zoom(Zoom),
    #[brw(magic = b"\x01\x04\x08")]
    FocusDrive(FocusDrive),
    #[brw(magic = b"\x01\x04\x38")]
    SetFocusMode(SetFocusMode),
    #[brw(magic = b"\x01\x04\x39")]
    SetExposureMode(SetExposureMode),
    #[brw(magic = b"\x01\x04\x0b")]
    Iris(AdjustStep),
    #[brw(magic = b"\x01\x04\x4b")]
    SetIris(DirectPosition),
    #[brw(magic = b"\x01\x04\x0a")]
    Shutter(AdjustStep),
    #[brw(magic = b"\x01\x04\x4a")]
    SetShutter(DirectPosition),
    #[brw(magic = b"\x01\x04\x3f")]
    Preset(Preset),
    #[brw(magic = b"\x01\x7e\x01\x0b")]
    PresetDriveSpeed(PresetDriveSpeed),
    #[brw(magic = b"\x01\x7e\x01\x0a\x00")]
    Tally(Tally),
    #[brw(magic = b"\x01\x7e\x01\x02\x00\x01")]
    OsdEnter(OsdEnter),
    #[brw(magic = b"\x09\x7e\x7e\x70")]
    FullStatusInquiry(FullStatusInquiry),
    /// Raw bytes, sent verbatim.
    ///
    /// When parsing, anything which isn't a known command ends up here.
    Custom(CustomCommand),
}

macro_rules! command_payloads {
    (
        $($variant:ident($payload:ident),)*
    ) => {
        $(
            impl From<$payload> for Command {
                fn from(p: $payload) -> Command {
                    Command::$variant(p)
                }
            }
        )*
    }
}

command_payloads!(
    PanTiltDrive(PanTiltDrive),
    Home(Home),
    OsdDisplay(OsdDisplay),
    Zoom(Zoom),
    FocusDrive(FocusDrive),
    SetFocusMode(SetFocusMode),
    SetExposureMode(SetExposureMode),
    Preset(Preset),
    PresetDriveSpeed(PresetDriveSpeed),
    Tally(Tally),
    OsdEnter(OsdEnter),
    FullStatusInquiry(FullStatusInquiry),
    Custom(CustomCommand),
);

impl Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PanTiltDrive(v) => f.debug_tuple("PanTiltDrive").field(v).finish(),
            Self::Home(v) => f.debug_tuple("Home").field(v).finish(),
            Self::OsdDisplay(v) => f.debug_tuple("OsdDisplay").field(v).finish(),
            Self::Zoom(v) => f.debug_tuple("Zoom").field(v).finish(),
            Self::FocusDrive(v) => f.debug_tuple("FocusDrive").field(v).finish(),
            Self::SetFocusMode(v) => f.debug_tuple("SetFocusMode").field(v).finish(),
            Self::SetExposureMode(v) => f.debug_tuple("SetExposureMode").field(v).finish(),
            Self::Iris(v) => f.debug_tuple("Iris").field(v).finish(),
            Self::SetIris(v) => f.debug_tuple("SetIris").field(v).finish(),
            Self::Shutter(v) => f.debug_tuple("Shutter").field(v).finish(),
            Self::SetShutter(v) => f.debug_tuple("SetShutter").field(v).finish(),
            Self::Preset(v) => f.debug_tuple("Preset").field(v).finish(),
            Self::PresetDriveSpeed(v) => f.debug_tuple("PresetDriveSpeed").field(v).finish(),
            Self::Tally(v) => f.debug_tuple("Tally").field(v).finish(),
            Self::OsdEnter(v) => f.debug_tuple("OsdEnter").field(v).finish(),
            Self::FullStatusInquiry(v) => f.debug_tuple("FullStatusInquiry").field(v).finish(),
            Self::Custom(v) => f.debug_tuple("Custom").field(v).finish(),
        }
    }
}

impl Command {
    /// Encodes the command as a raw VISCA payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::with_capacity(8));
        self.write(&mut out)?;
        Ok(out.into_inner())
    }

    /// Decodes a raw VISCA payload.
    ///
    /// Unknown payloads are returned as [Command::Custom].
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(Self::read(&mut Cursor::new(data))?)
    }

    /// Returns `true` if this is an inquiry rather than a command.
    pub fn is_inquiry(&self) -> bool {
        matches!(self, Self::FullStatusInquiry(_))
    }
}
