use core::future::Future;

/// Slot a sensor occupies on the hub.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SensorIndex(pub u8);

/// Static per-device metadata held by the hub.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SensorInfo {
    /// Calibrated scale of the axis channels, in micro-gauss per least
    /// significant bit.
    pub gain_micro: u32,
    /// Length of the raw payload the hub produces for one sample of this
    /// device.
    pub payload_bytes: usize,
}

/// The shared transport aggregating several sensors behind one
/// communication channel to the hub microcontroller.
///
/// A session usually borrows the transport (`&mut Hub`) rather than owning
/// it, since other sensor clients share the same hub.
pub trait HubTransport {
    type Error;

    /// Submits a raw command to the hub firmware, resolving once the hub
    /// has accepted it. Returns the number of bytes taken.
    fn send_command(&mut self, command: &[u8]) -> impl Future<Output = Result<usize, Self::Error>>;

    /// Switches sampling for `sensor` on or off. `oneshot` requests a
    /// single on-demand sample instead of continuous streamed delivery.
    fn set_enable(
        &mut self,
        sensor: SensorIndex,
        enable: bool,
        oneshot: bool,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Reads one full raw payload for `sensor` into `out`, resolving once
    /// the hub has produced it. May sleep for a full sampling period.
    fn read_payload(
        &mut self,
        sensor: SensorIndex,
        out: &mut [u8],
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Static calibration metadata for `sensor`.
    fn sensor_info(&self, sensor: SensorIndex) -> SensorInfo;

    /// Announces that streamed samples for `sensor` have a consumer. The
    /// host routes every asynchronous delivery for a registered index to
    /// that consumer's push entry point.
    fn register_listener(&mut self, sensor: SensorIndex);

    /// Withdraws the subscription made by
    /// [`register_listener`](Self::register_listener).
    fn unregister_listener(&mut self, sensor: SensorIndex);
}

impl<T: HubTransport + ?Sized> HubTransport for &mut T {
    type Error = T::Error;

    async fn send_command(&mut self, command: &[u8]) -> Result<usize, Self::Error> {
        (**self).send_command(command).await
    }

    async fn set_enable(
        &mut self,
        sensor: SensorIndex,
        enable: bool,
        oneshot: bool,
    ) -> Result<(), Self::Error> {
        (**self).set_enable(sensor, enable, oneshot).await
    }

    async fn read_payload(&mut self, sensor: SensorIndex, out: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_payload(sensor, out).await
    }

    fn sensor_info(&self, sensor: SensorIndex) -> SensorInfo {
        (**self).sensor_info(sensor)
    }

    fn register_listener(&mut self, sensor: SensorIndex) {
        (**self).register_listener(sensor)
    }

    fn unregister_listener(&mut self, sensor: SensorIndex) {
        (**self).unregister_listener(sensor)
    }
}
