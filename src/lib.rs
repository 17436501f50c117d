#![cfg_attr(not(test), no_std)]

//! Remote switch for an accessory light on an RC receiver output.
//!
//! The receiver channel's pulse width selects one of five light behaviours.
//! Two interrupt handlers feed a [`decoder::Decoder`] and the idle loop runs a
//! [`supervisor::Dispatcher`] over a [`channel::Snapshot`] of the shared state.

pub mod channel;
pub mod config;
pub mod decoder;
pub mod error;
pub mod pattern;
pub mod supervisor;

pub use channel::{ChannelReader, ChannelState, ChannelWriter, Snapshot};
pub use decoder::{Decoder, PulseTimer};
pub use error::DecodeError;
pub use pattern::Mode;
pub use supervisor::{Dispatcher, Outputs};
