//! Client driver for one magnetometer behind a shared sensor-hub
//! microcontroller.
//!
//! The hub aggregates several physical sensors behind a single transport.
//! This crate decodes the hub's wire payload for the magnetometer, exposes
//! per-axis calibrated readings and participates in streamed delivery when
//! the consumer enables continuous sampling. The transport itself — how
//! the hub is discovered and how its link is framed — stays behind the
//! [`transport::HubTransport`] trait.
//!
//! Samples arrive in one of two mutually exclusive modes:
//!
//! - **Direct**: [`HubMagnetometer::read_axis`] enables the sensor for a
//!   single sample, reads one full payload and disables it again.
//! - **Streaming**: the hub pushes payloads asynchronously; the client
//!   packs the channels selected by the active mask and appends one record
//!   per sample to the session's [`stream::SampleSink`].
//!
//! # Example
//!
//! ```rust,no_run
//! use hub_magn::channel::{ChannelId, ChannelMask};
//! use hub_magn::config::Configuration;
//! use hub_magn::stream::SampleBuffer;
//! use hub_magn::transport::{HubTransport, SensorIndex};
//! use hub_magn::{HubMagnResult, HubMagnetometer};
//!
//! # async fn demo<T: HubTransport>(hub: T) -> HubMagnResult<(), T::Error> {
//! let buffer: SampleBuffer<16> = SampleBuffer::new();
//! let mut mag =
//!     HubMagnetometer::attach(hub, buffer, SensorIndex(1), Configuration::default()).await?;
//!
//! // One-shot read of the X axis.
//! let x = mag.read_axis(ChannelId::X).await?;
//!
//! // Or stream every channel into the buffer.
//! mag.start_streaming(ChannelMask::all()).await?;
//! # Ok(()) }
//! ```
#![no_std]

pub mod channel;
pub mod command;
pub mod config;
pub mod error;
mod magnetometer;
pub mod stream;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{HubMagnError, HubMagnResult};
pub use magnetometer::HubMagnetometer;
