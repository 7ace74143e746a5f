#![doc = include_str!("../README.md")]

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate tracing;

mod config;
mod controller;
mod error;
mod operation;
mod state;
mod tcp;

pub use {
    crate::{
        config::DvipConfig,
        controller::DvipController,
        error::Error,
        operation::{Dispatch, Operation, SpeedChange, MAX_ZOOM_DURATION},
        state::{ConnectionState, DvipState, SpeedState, StateUpdate},
        tcp::DvipTcpChannel,
    },
    dvip_protocol as protocol,
};
pub type Result<T = ()> = std::result::Result<T, Error>;
