#![doc = include_str!("../README.md")]

#[macro_use]
extern crate num_derive;

#[macro_use]
extern crate tracing;

pub mod choice;
pub mod command;
mod error;
mod frame;

pub use crate::{
    choice::{Choice, ChoiceTable},
    command::{Command, CustomCommand},
    error::Error,
    frame::{is_acknowledgement, Frame, LengthMode, ACK_PACKET, DEFAULT_PORT},
};

/// Result type.
pub type Result<T = ()> = std::result::Result<T, Error>;
