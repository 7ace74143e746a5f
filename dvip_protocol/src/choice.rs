//! # Stepped settings
//!
//! A [ChoiceTable] is an ordered list of [Choice]s, each mapping a protocol
//! byte to a human readable label. The table order defines stepping order:
//! stepping never wraps around, it holds at the first or last entry.
//!
//! Speed tables here are ordered slowest first, so "stepping up" a speed moves
//! towards the end of the table.
use crate::{Error, Result};
use std::fmt;

/// A single entry in a [ChoiceTable].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Choice {
    /// Value sent on the wire.
    pub id: u8,
    pub label: &'static str,
}

impl Choice {
    pub const fn new(id: u8, label: &'static str) -> Self {
        Self { id, label }
    }

    /// The id as a two-digit, upper-case hex string (eg: `"0C"`).
    pub fn id_str(&self) -> String {
        format!("{:02X}", self.id)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:02X})", self.label, self.id)
    }
}

/// Ordered table of [Choice]s for a discrete, stepped setting.
///
/// Tables are built once from static data, and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceTable {
    choices: &'static [Choice],
}

impl ChoiceTable {
    pub const fn new(choices: &'static [Choice]) -> Self {
        Self { choices }
    }

    pub const fn len(&self) -> usize {
        self.choices.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub const fn choices(&self) -> &'static [Choice] {
        self.choices
    }

    /// Finds the index of the entry with the given `id`.
    ///
    /// ## Errors
    ///
    /// * [`Error::NotFound`] when no entry has that `id`
    pub fn index_of(&self, id: u8) -> Result<usize> {
        self.choices
            .iter()
            .position(|c| c.id == id)
            .ok_or(Error::NotFound(id))
    }

    /// Finds the index of an entry by its hex string id (eg: `"0C"`).
    ///
    /// ## Errors
    ///
    /// * [`Error::InvalidFormat`] when `id` is not one or two hex digits
    /// * [`Error::NotFound`] when no entry has that `id`
    pub fn index_of_str(&self, id: &str) -> Result<usize> {
        let id = id.trim();
        if id.is_empty() || id.len() > 2 {
            return Err(Error::InvalidFormat);
        }
        let id = u8::from_str_radix(id, 16).map_err(|_| Error::InvalidFormat)?;
        self.index_of(id)
    }

    /// Gets the entry at `index`.
    ///
    /// ## Errors
    ///
    /// * [`Error::IndexOutOfRange`] when `index >= len()`
    pub fn at(&self, index: usize) -> Result<&'static Choice> {
        self.choices.get(index).ok_or(Error::IndexOutOfRange(index))
    }

    /// Clamps `index` into `[0, len - 1]`.
    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.len().saturating_sub(1))
    }

    /// Moves `delta` entries from `index`, saturating at either end of the
    /// table.
    pub fn step(&self, index: usize, delta: isize) -> usize {
        self.clamp(self.clamp(index).saturating_add_signed(delta))
    }
}

/// Pan/tilt drive speeds, slowest first.
pub const PAN_TILT_SPEED: ChoiceTable = ChoiceTable::new(&PAN_TILT_SPEED_CHOICES);

const PAN_TILT_SPEED_CHOICES: [Choice; 24] = [
    Choice::new(0x01, "Speed 1 (Slow)"),
    Choice::new(0x02, "Speed 2"),
    Choice::new(0x03, "Speed 3"),
    Choice::new(0x04, "Speed 4"),
    Choice::new(0x05, "Speed 5"),
    Choice::new(0x06, "Speed 6"),
    Choice::new(0x07, "Speed 7"),
    Choice::new(0x08, "Speed 8"),
    Choice::new(0x09, "Speed 9"),
    Choice::new(0x0a, "Speed 10"),
    Choice::new(0x0b, "Speed 11"),
    Choice::new(0x0c, "Speed 12"),
    Choice::new(0x0d, "Speed 13"),
    Choice::new(0x0e, "Speed 14"),
    Choice::new(0x0f, "Speed 15"),
    Choice::new(0x10, "Speed 16"),
    Choice::new(0x11, "Speed 17"),
    Choice::new(0x12, "Speed 18"),
    Choice::new(0x13, "Speed 19"),
    Choice::new(0x14, "Speed 20"),
    Choice::new(0x15, "Speed 21"),
    Choice::new(0x16, "Speed 22"),
    Choice::new(0x17, "Speed 23"),
    Choice::new(0x18, "Speed 24 (Fast)"),
];

/// Default pan/tilt speed, `0x0C`.
pub const DEFAULT_PAN_TILT_SPEED: u8 = 0x0c;

/// Variable zoom speeds, slowest first.
pub const ZOOM_SPEED: ChoiceTable = ChoiceTable::new(&ZOOM_SPEED_CHOICES);

const ZOOM_SPEED_CHOICES: [Choice; 8] = [
    Choice::new(0x00, "Zoom speed 0 (Slow)"),
    Choice::new(0x01, "Zoom speed 1"),
    Choice::new(0x02, "Zoom speed 2"),
    Choice::new(0x03, "Zoom speed 3"),
    Choice::new(0x04, "Zoom speed 4"),
    Choice::new(0x05, "Zoom speed 5"),
    Choice::new(0x06, "Zoom speed 6"),
    Choice::new(0x07, "Zoom speed 7 (Fast)"),
];

/// Default zoom speed, `0x07`.
pub const DEFAULT_ZOOM_SPEED: u8 = 0x07;

/// Iris positions for [SetIris][crate::command::Command::SetIris], widest
/// aperture first.
pub const IRIS: ChoiceTable = ChoiceTable::new(&IRIS_CHOICES);

const IRIS_CHOICES: [Choice; 14] = [
    Choice::new(0x11, "F1.6"),
    Choice::new(0x10, "F2"),
    Choice::new(0x0f, "F2.4"),
    Choice::new(0x0e, "F2.8"),
    Choice::new(0x0d, "F3.4"),
    Choice::new(0x0c, "F4"),
    Choice::new(0x0b, "F4.8"),
    Choice::new(0x0a, "F5.6"),
    Choice::new(0x09, "F6.8"),
    Choice::new(0x08, "F8"),
    Choice::new(0x07, "F9.6"),
    Choice::new(0x06, "F11"),
    Choice::new(0x05, "F14"),
    Choice::new(0x00, "Closed"),
];

/// Shutter positions for
/// [SetShutter][crate::command::Command::SetShutter], fastest first.
pub const SHUTTER: ChoiceTable = ChoiceTable::new(&SHUTTER_CHOICES);

const SHUTTER_CHOICES: [Choice; 21] = [
    Choice::new(0x15, "1/10000"),
    Choice::new(0x14, "1/6000"),
    Choice::new(0x13, "1/4000"),
    Choice::new(0x12, "1/3000"),
    Choice::new(0x11, "1/2000"),
    Choice::new(0x10, "1/1500"),
    Choice::new(0x0f, "1/1000"),
    Choice::new(0x0e, "1/725"),
    Choice::new(0x0d, "1/500"),
    Choice::new(0x0c, "1/350"),
    Choice::new(0x0b, "1/250"),
    Choice::new(0x0a, "1/180"),
    Choice::new(0x09, "1/125"),
    Choice::new(0x08, "1/100"),
    Choice::new(0x07, "1/90"),
    Choice::new(0x06, "1/60"),
    Choice::new(0x05, "1/30"),
    Choice::new(0x04, "1/15"),
    Choice::new(0x03, "1/8"),
    Choice::new(0x02, "1/4"),
    Choice::new(0x01, "1/2"),
];
