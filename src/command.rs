//! Control commands submitted to the hub firmware on behalf of the
//! magnetometer.
//!
//! Commands are short byte strings: an opcode followed by the sensor-type
//! discriminator, then any operands. The hub acknowledges acceptance of a
//! command; it does not report completion of the action the command
//! triggers.

/// Sensor-type discriminator the hub firmware uses to address the
/// magnetometer in command payloads.
pub const SENSOR_TYPE_MAGNETOMETER: u8 = 0x02;

const OP_SAMPLING_FREQUENCY: u8 = 0x10;
const OP_FORCE_CALIBRATION: u8 = 0x11;
const OP_SELF_TEST: u8 = 0x12;

/// Longest encoding produced by [`HubCommand::encode`].
pub const MAX_COMMAND_BYTES: usize = 4;

/// A control command addressed to the magnetometer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum HubCommand {
    /// Triggers exactly one calibration cycle in the device.
    ForceCalibration,

    /// Starts the device's built-in self test.
    SelfTest,

    /// Changes the streamed output data rate, in hertz.
    SamplingFrequency(u16),
}

impl HubCommand {
    /// Encodes the command into `out`, returning the number of bytes
    /// written.
    pub fn encode(&self, out: &mut [u8; MAX_COMMAND_BYTES]) -> usize {
        match *self {
            HubCommand::ForceCalibration => {
                out[0] = OP_FORCE_CALIBRATION;
                out[1] = SENSOR_TYPE_MAGNETOMETER;
                2
            }
            HubCommand::SelfTest => {
                out[0] = OP_SELF_TEST;
                out[1] = SENSOR_TYPE_MAGNETOMETER;
                2
            }
            HubCommand::SamplingFrequency(hz) => {
                let hz = hz.to_le_bytes();
                out[0] = OP_SAMPLING_FREQUENCY;
                out[1] = SENSOR_TYPE_MAGNETOMETER;
                out[2] = hz[0];
                out[3] = hz[1];
                4
            }
        }
    }
}
