//! Errors that can occur when driving the hub-attached magnetometer.
//!
//! This module provides an error type that encapsulates all possible errors that can occur while talking to the hub.
//! It is generic over the underlying hub transport's error type. Transport failures are wrapped verbatim and never
//! retried here; the caller decides retry and recovery policy.

/// This represents all possible errors reported by the magnetometer client.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum HubMagnError<TransportError> {
    /// The hub transport failed to carry out a command submission, an
    /// enable/disable transition or a payload read.
    Transport(TransportError),

    /// A direct read or streaming start was attempted while the device is
    /// already held by streaming mode. No transport call was made.
    Busy,

    /// The hub reported a payload size that does not match the declared
    /// channel layout.
    ///
    /// Indicates mismatched hub firmware rather than a runtime fault.
    PayloadSizeMismatch {
        /// Payload length implied by the channel descriptor table.
        expected: usize,
        /// Payload length the hub reported for this device.
        actual: usize,
    },
}

/// Type alias used to simplify return types throughout the driver.
pub type HubMagnResult<T, TransportError> = Result<T, HubMagnError<TransportError>>;
