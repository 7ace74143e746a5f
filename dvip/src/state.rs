use crate::{
    protocol::choice::{
        ChoiceTable, DEFAULT_PAN_TILT_SPEED, DEFAULT_ZOOM_SPEED, PAN_TILT_SPEED, ZOOM_SPEED,
    },
    Result,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
    pub struct StateUpdate: u32 {
        const CONNECTION_STATE = 1;
        const PAN_TILT_SPEED   = 1 << 1;
        const ZOOM_SPEED       = 1 << 2;

        const SPEED = Self::PAN_TILT_SPEED.bits() | Self::ZOOM_SPEED.bits();
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// The last connection attempt failed.
    Error,
}

/// Session speed settings, as indexes into [PAN_TILT_SPEED] and
/// [ZOOM_SPEED].
///
/// Indexes are always valid for their table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpeedState {
    pan_tilt: usize,
    zoom: usize,
}

/// Looks up `id`, falling back to `default` (which must be in the table).
fn index_or_default(table: &ChoiceTable, name: &str, id: u8, default: u8) -> usize {
    match table.index_of(id) {
        Ok(i) => i,
        Err(_) => {
            warn!("unknown {name} {id:#04x}, using default {default:#04x}");
            table.index_of(default).unwrap_or_default()
        }
    }
}

impl Default for SpeedState {
    fn default() -> Self {
        Self::new(DEFAULT_PAN_TILT_SPEED, DEFAULT_ZOOM_SPEED)
    }
}

impl SpeedState {
    /// Starts a session at the given speed ids.
    ///
    /// Unknown ids fall back to the default speed.
    pub fn new(pan_tilt_speed: u8, zoom_speed: u8) -> Self {
        Self {
            pan_tilt: index_or_default(
                &PAN_TILT_SPEED,
                "pan/tilt speed",
                pan_tilt_speed,
                DEFAULT_PAN_TILT_SPEED,
            ),
            zoom: index_or_default(&ZOOM_SPEED, "zoom speed", zoom_speed, DEFAULT_ZOOM_SPEED),
        }
    }

    pub fn pan_tilt_index(&self) -> usize {
        self.pan_tilt
    }

    pub fn zoom_index(&self) -> usize {
        self.zoom
    }

    /// Current pan/tilt speed, as sent on the wire.
    pub fn pan_tilt_speed(&self) -> u8 {
        PAN_TILT_SPEED.choices()[self.pan_tilt].id
    }

    /// Current zoom speed, as sent on the wire.
    pub fn zoom_speed(&self) -> u8 {
        ZOOM_SPEED.choices()[self.zoom].id
    }

    /// Sets the pan/tilt speed by id.
    ///
    /// ## Errors
    ///
    /// * [`NotFound`][crate::protocol::Error::NotFound] when `id` is not a
    ///   pan/tilt speed; the current speed is kept
    pub fn set_pan_tilt_speed(&mut self, id: u8) -> Result {
        self.pan_tilt = PAN_TILT_SPEED.index_of(id)?;
        Ok(())
    }

    /// Sets the zoom speed by id.
    ///
    /// ## Errors
    ///
    /// * [`NotFound`][crate::protocol::Error::NotFound] when `id` is not a
    ///   zoom speed; the current speed is kept
    pub fn set_zoom_speed(&mut self, id: u8) -> Result {
        self.zoom = ZOOM_SPEED.index_of(id)?;
        Ok(())
    }

    /// Moves the pan/tilt speed `delta` steps faster (or slower, when
    /// negative), holding at either end.
    pub fn step_pan_tilt_speed(&mut self, delta: isize) {
        self.pan_tilt = PAN_TILT_SPEED.step(self.pan_tilt, delta);
    }

    /// Moves the zoom speed `delta` steps faster (or slower, when negative),
    /// holding at either end.
    pub fn step_zoom_speed(&mut self, delta: isize) {
        self.zoom = ZOOM_SPEED.step(self.zoom, delta);
    }

    /// Which speeds differ between `self` and `other`.
    pub fn changes(&self, other: &Self) -> StateUpdate {
        let mut updated = StateUpdate::empty();
        if self.pan_tilt != other.pan_tilt {
            updated |= StateUpdate::PAN_TILT_SPEED;
        }
        if self.zoom != other.zoom {
            updated |= StateUpdate::ZOOM_SPEED;
        }
        updated
    }
}

/// Snapshot of a [DvipController][crate::DvipController] session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DvipState {
    pub connection: ConnectionState,
    pub speed: SpeedState,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{protocol, Error};

    #[test]
    fn defaults() {
        let s = SpeedState::default();
        assert_eq!(11, s.pan_tilt_index());
        assert_eq!(0x0c, s.pan_tilt_speed());
        assert_eq!(7, s.zoom_index());
        assert_eq!(0x07, s.zoom_speed());

        // Unknown ids fall back to defaults
        assert_eq!(s, SpeedState::new(0x19, 0x08));
        assert_eq!(0x01, SpeedState::new(0x01, 0x08).pan_tilt_speed());
    }

    #[test]
    fn set() -> Result<()> {
        let mut s = SpeedState::default();
        s.set_pan_tilt_speed(0x18)?;
        assert_eq!(23, s.pan_tilt_index());
        s.set_zoom_speed(0x00)?;
        assert_eq!(0, s.zoom_index());

        let before = s;
        assert!(matches!(
            s.set_pan_tilt_speed(0x00),
            Err(Error::Protocol(protocol::Error::NotFound(0x00)))
        ));
        assert!(matches!(
            s.set_zoom_speed(0x08),
            Err(Error::Protocol(protocol::Error::NotFound(0x08)))
        ));
        assert_eq!(before, s);
        Ok(())
    }

    #[test]
    fn step() {
        let mut s = SpeedState::default();
        s.step_pan_tilt_speed(1);
        assert_eq!(0x0d, s.pan_tilt_speed());
        assert_eq!(StateUpdate::PAN_TILT_SPEED, s.changes(&SpeedState::default()));

        // Zoom starts at the fastest speed
        s.step_zoom_speed(1);
        assert_eq!(0x07, s.zoom_speed());
        s.step_zoom_speed(-1);
        assert_eq!(0x06, s.zoom_speed());
        assert_eq!(StateUpdate::SPEED, s.changes(&SpeedState::default()));

        for _ in 0..30 {
            s.step_pan_tilt_speed(-1);
            s.step_zoom_speed(-1);
        }
        assert_eq!(0, s.pan_tilt_index());
        assert_eq!(0, s.zoom_index());

        for _ in 0..30 {
            s.step_pan_tilt_speed(1);
        }
        assert_eq!(23, s.pan_tilt_index());
        assert_eq!(0x18, s.pan_tilt_speed());
    }
}
