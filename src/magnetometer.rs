use crate::channel::{ChannelDesc, ChannelId, ChannelMask, DATA_CHANNELS, PAYLOAD_BYTES};
use crate::command::{HubCommand, MAX_COMMAND_BYTES};
use crate::config::{Configuration, SamplingFrequency};
use crate::error::{HubMagnError, HubMagnResult};
use crate::stream::{PushClient, SampleSink};
use crate::transport::{HubTransport, SensorIndex};

/// Delivery mode currently holding the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    /// On-demand single-sample reads only.
    Direct,
    /// Continuous streamed delivery under the session's channel mask.
    Streaming(ChannelMask),
}

/// Client for one magnetometer behind a shared sensor-hub transport.
///
/// The device is driven in one of two mutually exclusive modes:
///
/// - **Direct mode**: [`read_axis`](Self::read_axis) enables the sensor,
///   performs one full-payload read and disables it again, returning a
///   single channel value.
/// - **Streaming mode**: after [`start_streaming`](Self::start_streaming)
///   the hub delivers payloads asynchronously; [`push`](Self::push)
///   decodes each one and forwards the packed record to the session's
///   [`SampleSink`].
///
/// The transport is usually borrowed (`&mut Hub`) since other sensor
/// clients share the same hub. The `&mut self` receivers make one session
/// non-reentrant by construction; hosts that share a session across
/// execution contexts must wrap it in their own mutex.
pub struct HubMagnetometer<T, S> {
    transport: T,
    sink: S,
    sensor: SensorIndex,
    gain_micro: u32,
    payload_bytes: usize,
    sampling_frequency: SamplingFrequency,
    scratch: [u8; PAYLOAD_BYTES],
    mode: Mode,
}

impl<T, S> HubMagnetometer<T, S>
where
    T: HubTransport,
    S: SampleSink,
{
    /// Opens a session for the magnetometer at `sensor`.
    ///
    /// This function will:
    /// - Validate the hub's payload metadata against the declared channel
    ///   layout.
    /// - Apply the configured sampling frequency through the command path.
    /// - Register the push listener for streamed delivery.
    ///
    /// Registration happens last, so a failed attach leaves nothing
    /// registered on the hub.
    pub async fn attach(
        transport: T,
        sink: S,
        sensor: SensorIndex,
        config: Configuration,
    ) -> HubMagnResult<Self, T::Error> {
        let info = transport.sensor_info(sensor);
        if info.payload_bytes != PAYLOAD_BYTES {
            return Err(HubMagnError::PayloadSizeMismatch {
                expected: PAYLOAD_BYTES,
                actual: info.payload_bytes,
            });
        }

        let mut device = Self {
            transport,
            sink,
            sensor,
            gain_micro: info.gain_micro,
            payload_bytes: info.payload_bytes,
            sampling_frequency: config.sampling_frequency,
            scratch: [0; PAYLOAD_BYTES],
            mode: Mode::Direct,
        };

        device.dispatch(config.sampling_frequency.command()).await?;
        device.transport.register_listener(sensor);

        Ok(device)
    }

    /// Tears the session down, releasing the transport handle and sink.
    ///
    /// Unregisters the push listener. Any active streaming session should
    /// be stopped first; detach itself makes no enable/disable calls and
    /// is safe to call at any point after a successful attach.
    pub fn detach(self) -> (T, S) {
        let Self {
            mut transport,
            sink,
            sensor,
            ..
        } = self;

        transport.unregister_listener(sensor);

        (transport, sink)
    }

    /// Encodes and submits a command, waiting for the hub to accept it.
    async fn dispatch(&mut self, command: HubCommand) -> HubMagnResult<(), T::Error> {
        let mut buffer = [0u8; MAX_COMMAND_BYTES];
        let len = command.encode(&mut buffer);
        self.transport
            .send_command(&buffer[..len])
            .await
            .map_err(HubMagnError::Transport)?;

        Ok(())
    }

    /// Requests a single forced calibration cycle in the device.
    ///
    /// Resolves once the hub has accepted the command. The calibration
    /// itself runs inside the device; its completion is not reported back
    /// and no session state changes.
    pub async fn force_calibration(&mut self) -> HubMagnResult<(), T::Error> {
        self.dispatch(HubCommand::ForceCalibration).await
    }

    /// Starts the device's built-in self test.
    pub async fn self_test(&mut self) -> HubMagnResult<(), T::Error> {
        self.dispatch(HubCommand::SelfTest).await
    }

    /// Changes the streamed output data rate.
    ///
    /// The stored rate is only updated once the hub has accepted the
    /// command.
    pub async fn set_sampling_frequency(
        &mut self,
        sampling_frequency: SamplingFrequency,
    ) -> HubMagnResult<(), T::Error> {
        self.dispatch(sampling_frequency.command()).await?;
        self.sampling_frequency = sampling_frequency;

        Ok(())
    }

    /// The currently configured streamed output data rate.
    pub fn sampling_frequency(&self) -> SamplingFrequency {
        self.sampling_frequency
    }

    /// The calibrated scale of the axis channels, in micro-gauss per least
    /// significant bit.
    pub fn scale_micro(&self) -> u32 {
        self.gain_micro
    }

    /// The declared channel layout, for scan-mask negotiation with the
    /// buffering layer.
    pub fn channels(&self) -> &'static [ChannelDesc] {
        &DATA_CHANNELS
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.mode, Mode::Streaming(_))
    }

    /// Reads one channel on demand.
    ///
    /// Performs the direct-mode sequence: enable the sensor for a single
    /// sample, read one full payload, disable the sensor, then decode the
    /// requested channel. Fails with [`HubMagnError::Busy`] before any
    /// transport call if streaming mode is active.
    ///
    /// **Note:** if the payload read fails, the error is surfaced without
    /// attempting the disable, which leaves the sensor enabled on the hub.
    /// A failed disable after a successful read is also surfaced as an
    /// error and the sample is discarded.
    ///
    /// # Examples
    /// ```rust,no_run
    /// # use hub_magn::{HubMagnetometer, HubMagnResult};
    /// # use hub_magn::channel::ChannelId;
    /// # use hub_magn::stream::SampleSink;
    /// # use hub_magn::transport::HubTransport;
    /// # async fn demo<T: HubTransport, S: SampleSink>(
    /// #     mut mag: HubMagnetometer<T, S>,
    /// # ) -> HubMagnResult<(), T::Error> {
    /// let x = mag.read_axis(ChannelId::X).await?;
    /// let accuracy = mag.read_axis(ChannelId::Accuracy).await?;
    /// # Ok(()) }
    /// ```
    pub async fn read_axis(&mut self, channel: ChannelId) -> HubMagnResult<i32, T::Error> {
        if self.is_streaming() {
            return Err(HubMagnError::Busy);
        }

        let mut payload = [0u8; PAYLOAD_BYTES];

        self.transport
            .set_enable(self.sensor, true, true)
            .await
            .map_err(HubMagnError::Transport)?;

        self.transport
            .read_payload(self.sensor, &mut payload[..self.payload_bytes])
            .await
            .map_err(HubMagnError::Transport)?;

        self.transport
            .set_enable(self.sensor, false, true)
            .await
            .map_err(HubMagnError::Transport)?;

        Ok(DATA_CHANNELS[channel.scan_index()].decode(&payload))
    }

    /// Enters streaming mode with the given channel selection.
    ///
    /// The mask is fixed until [`stop_streaming`](Self::stop_streaming);
    /// while streaming, direct reads and a second start fail with
    /// [`HubMagnError::Busy`].
    pub async fn start_streaming(&mut self, mask: ChannelMask) -> HubMagnResult<(), T::Error> {
        if self.is_streaming() {
            return Err(HubMagnError::Busy);
        }

        self.transport
            .set_enable(self.sensor, true, false)
            .await
            .map_err(HubMagnError::Transport)?;
        self.mode = Mode::Streaming(mask);

        Ok(())
    }

    /// Leaves streaming mode. Does nothing when already in direct mode.
    ///
    /// The session returns to direct mode even when the transport disable
    /// fails; the failure is still surfaced.
    pub async fn stop_streaming(&mut self) -> HubMagnResult<(), T::Error> {
        if !self.is_streaming() {
            return Ok(());
        }

        let result = self
            .transport
            .set_enable(self.sensor, false, false)
            .await
            .map_err(HubMagnError::Transport);
        self.mode = Mode::Direct;

        result
    }

    /// Decodes one streamed payload and forwards the packed record to the
    /// session's sink.
    ///
    /// This is the entry point the hub invokes (see [`PushClient`]) for
    /// every sample delivered in streaming mode. The read cursor walks
    /// every declared channel so byte offsets stay stable; only channels
    /// selected in the session's mask are copied out, packed contiguously
    /// in declared order. Exactly one record is appended per call, paired
    /// with `timestamp`.
    ///
    /// A payload delivered after streaming has stopped is dropped; the hub
    /// serializes deliveries against mode transitions, so this only
    /// happens for a sample already in flight during teardown.
    ///
    /// # Panics
    /// `payload` must be exactly the declared payload length. A violation
    /// is a hub framing defect, not a recoverable condition.
    pub fn push(&mut self, payload: &[u8], timestamp: i64) {
        assert_eq!(
            payload.len(),
            self.payload_bytes,
            "payload length does not match the declared channel layout"
        );

        let mask = match self.mode {
            Mode::Streaming(mask) => mask,
            Mode::Direct => return,
        };

        let mut read = 0;
        let mut write = 0;
        for channel in &DATA_CHANNELS {
            if mask.contains(channel.id) {
                self.scratch[write..write + channel.storage_bytes]
                    .copy_from_slice(&payload[read..read + channel.storage_bytes]);
                write += channel.storage_bytes;
            }
            read += channel.storage_bytes;
        }

        self.sink.append(&self.scratch[..write], timestamp);
    }
}

impl<T, S> PushClient for HubMagnetometer<T, S>
where
    T: HubTransport,
    S: SampleSink,
{
    fn push(&mut self, payload: &[u8], timestamp: i64) {
        HubMagnetometer::push(self, payload, timestamp);
    }
}
