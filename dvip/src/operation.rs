//! Camera operations, and how they turn into VISCA commands.
use crate::{
    protocol::{
        choice::{IRIS, SHUTTER},
        command::{
            Adjust, AdjustStep, DirectPosition, ExposureMode, Focus, FocusDrive, FocusMode,
            OsdButton, PanTiltDirection, PanTiltDrive, Preset, PresetDriveSpeed, SetExposureMode,
            SetFocusMode, Tally, TallyColour, Zoom, FULL_STATUS_INQUIRY, HOME,
        },
        Command, CustomCommand,
    },
    state::SpeedState,
    Error, Result,
};
use std::time::Duration;

/// Zoom speed used for timed zoom operations.
const TIMED_ZOOM_SPEED: u8 = 7;

/// Longest duration for a single step of a timed zoom.
pub const MAX_ZOOM_DURATION: Duration = Duration::from_millis(99_999);

fn check_duration(d: Duration) -> Result<Duration> {
    if d > MAX_ZOOM_DURATION {
        error!("zoom duration {d:?} > {MAX_ZOOM_DURATION:?}");
        return Err(Error::ParameterOutOfRange);
    }
    Ok(d)
}

/// Change to a session speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedChange {
    /// Set to a speed id.
    Set(u8),
    /// One step faster.
    Up,
    /// One step slower.
    Down,
}

/// Something the controller can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Drive at the current pan/tilt speed.
    PanTilt(PanTiltDirection),
    Home,
    PanTiltSpeed(SpeedChange),
    ZoomSpeed(SpeedChange),
    /// Zoom in at the current zoom speed.
    ZoomIn,
    /// Zoom out at the current zoom speed.
    ZoomOut,
    ZoomStop,
    /// Zoom in for a while, then stop.
    ZoomInFor(Duration),
    /// Zoom out for a while, then stop.
    ZoomOutFor(Duration),
    /// Zoom in, then zoom out, then stop.
    ///
    /// For heads without direct zoom positioning.
    ZoomInThenOut {
        zoom_in: Duration,
        zoom_out: Duration,
    },
    Focus(Focus),
    FocusMode(FocusMode),
    ExposureMode(ExposureMode),
    Iris(Adjust),
    /// Sets an [IRIS] position.
    SetIris(u8),
    Shutter(Adjust),
    /// Sets a [SHUTTER] position.
    SetShutter(u8),
    SavePreset(u8),
    RecallPreset(u8),
    PresetDriveSpeed {
        slot: u8,
        speed: u8,
    },
    Tally(TallyColour),
    Osd(OsdButton),
    Custom(CustomCommand),
    /// Status inquiry, as sent by the poll timer.
    RequestState,
}

/// What to send for an [Operation].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Only session state changed.
    None,
    /// Send a single command.
    Immediate(Command),
    /// Send `first`, then each command in `then` after its delay (relative to
    /// the previous step).
    Sequence {
        first: Command,
        then: Vec<(Duration, Command)>,
    },
}

impl From<Command> for Dispatch {
    fn from(cmd: Command) -> Self {
        Self::Immediate(cmd)
    }
}

impl Operation {
    /// Returns `true` for operations which start or stop zooming.
    ///
    /// These replace any timed zoom still in progress.
    pub fn is_zoom(&self) -> bool {
        matches!(
            self,
            Self::ZoomIn
                | Self::ZoomOut
                | Self::ZoomStop
                | Self::ZoomInFor(_)
                | Self::ZoomOutFor(_)
                | Self::ZoomInThenOut { .. }
        )
    }

    /// Applies the operation to session state, and works out what to send.
    ///
    /// `speed` is only modified when this returns `Ok`.
    ///
    /// ## Errors
    ///
    /// * [`ParameterOutOfRange`][Error::ParameterOutOfRange] when a zoom
    ///   duration is longer than [MAX_ZOOM_DURATION]
    /// * [`Protocol`][Error::Protocol] for unknown speed, iris or shutter
    ///   ids, and out of range preset slots
    pub fn dispatch(&self, speed: &mut SpeedState) -> Result<Dispatch> {
        Ok(match self {
            Self::PanTilt(direction) => {
                Command::from(PanTiltDrive::new(speed.pan_tilt_speed(), *direction)).into()
            }
            Self::Home => Command::from(HOME).into(),

            Self::PanTiltSpeed(change) => {
                match change {
                    SpeedChange::Set(id) => speed.set_pan_tilt_speed(*id)?,
                    SpeedChange::Up => speed.step_pan_tilt_speed(1),
                    SpeedChange::Down => speed.step_pan_tilt_speed(-1),
                }
                Dispatch::None
            }
            Self::ZoomSpeed(change) => {
                match change {
                    SpeedChange::Set(id) => speed.set_zoom_speed(*id)?,
                    SpeedChange::Up => speed.step_zoom_speed(1),
                    SpeedChange::Down => speed.step_zoom_speed(-1),
                }
                Dispatch::None
            }

            Self::ZoomIn => Command::from(Zoom::tele(speed.zoom_speed())).into(),
            Self::ZoomOut => Command::from(Zoom::wide(speed.zoom_speed())).into(),
            Self::ZoomStop => Command::from(Zoom::STOP).into(),
            Self::ZoomInFor(d) => Dispatch::Sequence {
                first: Zoom::tele(TIMED_ZOOM_SPEED).into(),
                then: vec![(check_duration(*d)?, Zoom::STOP.into())],
            },
            Self::ZoomOutFor(d) => Dispatch::Sequence {
                first: Zoom::wide(TIMED_ZOOM_SPEED).into(),
                then: vec![(check_duration(*d)?, Zoom::STOP.into())],
            },
            Self::ZoomInThenOut { zoom_in, zoom_out } => Dispatch::Sequence {
                first: Zoom::tele(TIMED_ZOOM_SPEED).into(),
                then: vec![
                    (check_duration(*zoom_in)?, Zoom::wide(TIMED_ZOOM_SPEED).into()),
                    (check_duration(*zoom_out)?, Zoom::STOP.into()),
                ],
            },

            Self::Focus(focus) => Command::from(FocusDrive::new(*focus)).into(),
            Self::FocusMode(mode) => Command::from(SetFocusMode::new(*mode)).into(),
            Self::ExposureMode(mode) => Command::from(SetExposureMode::new(*mode)).into(),
            Self::Iris(adjust) => Command::Iris(AdjustStep::new(*adjust)).into(),
            Self::SetIris(position) => {
                IRIS.index_of(*position)?;
                Command::SetIris(DirectPosition::new(*position)).into()
            }
            Self::Shutter(adjust) => Command::Shutter(AdjustStep::new(*adjust)).into(),
            Self::SetShutter(position) => {
                SHUTTER.index_of(*position)?;
                Command::SetShutter(DirectPosition::new(*position)).into()
            }

            Self::SavePreset(slot) => Command::from(Preset::save(*slot)?).into(),
            Self::RecallPreset(slot) => Command::from(Preset::recall(*slot)?).into(),
            Self::PresetDriveSpeed {
                slot,
                speed: drive_speed,
            } => Command::from(PresetDriveSpeed::new(*slot, *drive_speed)?).into(),

            Self::Tally(colour) => Command::from(Tally::new(*colour)).into(),
            Self::Osd(button) => button.command().into(),
            Self::Custom(cmd) => Command::from(cmd.clone()).into(),
            Self::RequestState => Command::from(FULL_STATUS_INQUIRY).into(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol;

    fn immediate(op: Operation, speed: &mut SpeedState) -> Result<Vec<u8>> {
        match op.dispatch(speed)? {
            Dispatch::Immediate(cmd) => Ok(cmd.to_bytes()?),
            d => panic!("expected immediate command, got {d:?}"),
        }
    }

    #[test]
    fn pan_tilt_uses_session_speed() -> Result<()> {
        let mut speed = SpeedState::default();
        assert_eq!(
            hex::decode("0106010c0c0103ff")?,
            immediate(Operation::PanTilt(PanTiltDirection::Left), &mut speed)?
        );

        assert_eq!(
            Dispatch::None,
            Operation::PanTiltSpeed(SpeedChange::Set(0x18)).dispatch(&mut speed)?
        );
        assert_eq!(
            hex::decode("01060118140302ff")?,
            immediate(Operation::PanTilt(PanTiltDirection::Down), &mut speed)?
        );

        Operation::PanTiltSpeed(SpeedChange::Up).dispatch(&mut speed)?;
        assert_eq!(0x18, speed.pan_tilt_speed());
        Operation::PanTiltSpeed(SpeedChange::Down).dispatch(&mut speed)?;
        assert_eq!(0x17, speed.pan_tilt_speed());

        assert_eq!(
            hex::decode("010604ff")?,
            immediate(Operation::Home, &mut speed)?
        );
        Ok(())
    }

    #[test]
    fn unknown_speed() {
        let mut speed = SpeedState::default();
        for op in [
            Operation::PanTiltSpeed(SpeedChange::Set(0x19)),
            Operation::ZoomSpeed(SpeedChange::Set(0x08)),
        ] {
            assert!(matches!(
                op.dispatch(&mut speed),
                Err(Error::Protocol(protocol::Error::NotFound(_)))
            ));
        }
        assert_eq!(SpeedState::default(), speed);
    }

    #[test]
    fn zoom_uses_session_speed() -> Result<()> {
        let mut speed = SpeedState::default();
        assert_eq!(
            hex::decode("01040727ff")?,
            immediate(Operation::ZoomIn, &mut speed)?
        );

        Operation::ZoomSpeed(SpeedChange::Set(0x02)).dispatch(&mut speed)?;
        Operation::ZoomSpeed(SpeedChange::Up).dispatch(&mut speed)?;
        assert_eq!(
            hex::decode("01040733ff")?,
            immediate(Operation::ZoomOut, &mut speed)?
        );
        assert_eq!(
            hex::decode("01040700ff")?,
            immediate(Operation::ZoomStop, &mut speed)?
        );
        Ok(())
    }

    #[test]
    fn timed_zoom() -> Result<()> {
        // Timed zoom ignores the session zoom speed
        let mut speed = SpeedState::new(0x0c, 0x01);
        let d = Operation::ZoomInFor(Duration::from_millis(1000)).dispatch(&mut speed)?;
        assert_eq!(
            Dispatch::Sequence {
                first: Zoom::tele(7).into(),
                then: vec![(Duration::from_millis(1000), Zoom::STOP.into())],
            },
            d
        );

        let d = Operation::ZoomOutFor(Duration::ZERO).dispatch(&mut speed)?;
        assert_eq!(
            Dispatch::Sequence {
                first: Zoom::wide(7).into(),
                then: vec![(Duration::ZERO, Zoom::STOP.into())],
            },
            d
        );

        let d = Operation::ZoomInThenOut {
            zoom_in: Duration::from_millis(2500),
            zoom_out: Duration::from_millis(1000),
        }
        .dispatch(&mut speed)?;
        let Dispatch::Sequence { first, then } = d else {
            panic!("expected sequence");
        };
        assert_eq!(hex::decode("01040727ff")?, first.to_bytes()?);
        assert_eq!(2, then.len());
        assert_eq!(Duration::from_millis(2500), then[0].0);
        assert_eq!(hex::decode("01040737ff")?, then[0].1.to_bytes()?);
        assert_eq!(Duration::from_millis(1000), then[1].0);
        assert_eq!(hex::decode("01040700ff")?, then[1].1.to_bytes()?);

        assert!(Operation::ZoomInFor(MAX_ZOOM_DURATION)
            .dispatch(&mut speed)
            .is_ok());
        assert!(matches!(
            Operation::ZoomInFor(Duration::from_millis(100_000)).dispatch(&mut speed),
            Err(Error::ParameterOutOfRange)
        ));
        assert!(matches!(
            Operation::ZoomInThenOut {
                zoom_in: Duration::from_millis(1),
                zoom_out: Duration::from_secs(200),
            }
            .dispatch(&mut speed),
            Err(Error::ParameterOutOfRange)
        ));
        Ok(())
    }

    #[test]
    fn lens_and_exposure() -> Result<()> {
        let mut speed = SpeedState::default();
        for (op, hex) in [
            (Operation::Focus(Focus::Near), "01040803ff"),
            (Operation::Focus(Focus::Far), "01040802ff"),
            (Operation::Focus(Focus::Stop), "01040800ff"),
            (Operation::FocusMode(FocusMode::Auto), "01043802ff"),
            (Operation::FocusMode(FocusMode::Manual), "01043803ff"),
            (Operation::ExposureMode(ExposureMode::Bright), "0104390dff"),
            (Operation::Iris(Adjust::Up), "01040b02ff"),
            (Operation::Iris(Adjust::Down), "01040b03ff"),
            (Operation::SetIris(0x11), "01044b00000101ff"),
            (Operation::Shutter(Adjust::Up), "01040a02ff"),
            (Operation::SetShutter(0x15), "01044a00000105ff"),
        ] {
            assert_eq!(hex::decode(hex)?, immediate(op, &mut speed)?, "{hex}");
        }

        assert!(matches!(
            Operation::SetIris(0x2a).dispatch(&mut speed),
            Err(Error::Protocol(protocol::Error::NotFound(0x2a)))
        ));
        assert!(matches!(
            Operation::SetShutter(0x00).dispatch(&mut speed),
            Err(Error::Protocol(protocol::Error::NotFound(0x00)))
        ));
        Ok(())
    }

    #[test]
    fn presets_and_extensions() -> Result<()> {
        let mut speed = SpeedState::default();
        for (op, hex) in [
            (Operation::SavePreset(0x05), "01043f0105ff"),
            (Operation::RecallPreset(0x3f), "01043f023fff"),
            (
                Operation::PresetDriveSpeed {
                    slot: 0x01,
                    speed: 0x18,
                },
                "017e010b0118ff",
            ),
            (Operation::Tally(TallyColour::Red), "017e010a000203ff"),
            (Operation::Osd(OsdButton::Back), "01060109090103ff"),
            (Operation::RequestState, "097e7e70ff"),
            (
                Operation::Custom("81 01 04 00 02 FF".parse()?),
                "8101040002ff",
            ),
        ] {
            assert_eq!(hex::decode(hex)?, immediate(op, &mut speed)?, "{hex}");
        }

        assert!(matches!(
            Operation::RecallPreset(0x40).dispatch(&mut speed),
            Err(Error::Protocol(protocol::Error::ParameterOutOfRange))
        ));
        Ok(())
    }

    #[test]
    fn zoom_operations() {
        assert!(Operation::ZoomStop.is_zoom());
        assert!(Operation::ZoomInFor(Duration::ZERO).is_zoom());
        assert!(!Operation::Home.is_zoom());
        assert!(!Operation::ZoomSpeed(SpeedChange::Up).is_zoom());
    }
}
