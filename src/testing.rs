//! Scripted hub transport and sink for exercising the client without
//! hardware.

use crate::channel::PAYLOAD_BYTES;
use crate::command::MAX_COMMAND_BYTES;
use crate::stream::SampleSink;
use crate::transport::{HubTransport, SensorIndex, SensorInfo};
use heapless::Vec;

/// Error produced by [`FakeHub`] when a fault is injected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FakeHubError;

/// One recorded transport interaction, in call order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Command(Vec<u8, MAX_COMMAND_BYTES>),
    SetEnable {
        sensor: SensorIndex,
        enable: bool,
        oneshot: bool,
    },
    ReadPayload {
        sensor: SensorIndex,
        len: usize,
    },
    RegisterListener(SensorIndex),
    UnregisterListener(SensorIndex),
}

/// Which primitive the fake should keep failing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    Command,
    /// Fail `set_enable` calls that enable.
    Enable,
    /// Fail `set_enable` calls that disable.
    Disable,
    Read,
}

/// In-memory stand-in for the shared hub transport.
///
/// Records every call it receives (failed attempts included), serves a
/// fixed payload for reads and can be told to fail one primitive.
pub struct FakeHub {
    pub calls: Vec<Call, 16>,
    pub payload: [u8; PAYLOAD_BYTES],
    pub info: SensorInfo,
    pub registered: Option<SensorIndex>,
    pub fault: Option<Fault>,
}

impl FakeHub {
    pub fn new() -> Self {
        FakeHub {
            calls: Vec::new(),
            payload: [0; PAYLOAD_BYTES],
            info: SensorInfo {
                gain_micro: 438,
                payload_bytes: PAYLOAD_BYTES,
            },
            registered: None,
            fault: None,
        }
    }

    pub fn with_payload(mut self, payload: [u8; PAYLOAD_BYTES]) -> Self {
        self.payload = payload;

        self
    }

    pub fn with_info(mut self, info: SensorInfo) -> Self {
        self.info = info;

        self
    }

    pub fn fail(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);

        self
    }
}

impl HubTransport for FakeHub {
    type Error = FakeHubError;

    async fn send_command(&mut self, command: &[u8]) -> Result<usize, FakeHubError> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(command).unwrap();
        self.calls.push(Call::Command(bytes)).unwrap();

        if self.fault == Some(Fault::Command) {
            return Err(FakeHubError);
        }

        Ok(command.len())
    }

    async fn set_enable(
        &mut self,
        sensor: SensorIndex,
        enable: bool,
        oneshot: bool,
    ) -> Result<(), FakeHubError> {
        self.calls
            .push(Call::SetEnable {
                sensor,
                enable,
                oneshot,
            })
            .unwrap();

        match (self.fault, enable) {
            (Some(Fault::Enable), true) | (Some(Fault::Disable), false) => Err(FakeHubError),
            _ => Ok(()),
        }
    }

    async fn read_payload(&mut self, sensor: SensorIndex, out: &mut [u8]) -> Result<(), FakeHubError> {
        self.calls
            .push(Call::ReadPayload {
                sensor,
                len: out.len(),
            })
            .unwrap();

        if self.fault == Some(Fault::Read) {
            return Err(FakeHubError);
        }

        out.copy_from_slice(&self.payload[..out.len()]);
        Ok(())
    }

    fn sensor_info(&self, _sensor: SensorIndex) -> SensorInfo {
        self.info
    }

    fn register_listener(&mut self, sensor: SensorIndex) {
        self.calls.push(Call::RegisterListener(sensor)).unwrap();
        self.registered = Some(sensor);
    }

    fn unregister_listener(&mut self, sensor: SensorIndex) {
        self.calls.push(Call::UnregisterListener(sensor)).unwrap();
        if self.registered == Some(sensor) {
            self.registered = None;
        }
    }
}

/// Sink capturing every record the decode pipeline appends.
pub struct RecordingSink {
    pub records: Vec<(Vec<u8, PAYLOAD_BYTES>, i64), 16>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink {
            records: Vec::new(),
        }
    }
}

impl SampleSink for RecordingSink {
    fn append(&mut self, record: &[u8], timestamp: i64) {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(record).unwrap();
        self.records.push((bytes, timestamp)).unwrap();
    }
}
