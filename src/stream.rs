//! Streamed sample delivery: the push seam between the hub and the
//! client, and a bounded sink for hosts without their own buffer layer.

use crate::channel::PAYLOAD_BYTES;
use heapless::{Deque, Vec};

/// Capability the hub invokes for every asynchronously streamed sample.
///
/// Implementations must not block: the hub calls this from its own
/// delivery context, so only in-memory work is allowed.
pub trait PushClient {
    /// Hands one raw payload and its capture timestamp to the client.
    fn push(&mut self, payload: &[u8], timestamp: i64);
}

/// Accepts packed sample records from the decode pipeline.
pub trait SampleSink {
    /// Appends one packed record and its timestamp. Called exactly once
    /// per delivered sample; `record` may be empty when no data channel is
    /// selected.
    fn append(&mut self, record: &[u8], timestamp: i64);
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn append(&mut self, record: &[u8], timestamp: i64) {
        (**self).append(record, timestamp)
    }
}

/// One packed sample as stored by [`SampleBuffer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleRecord {
    /// The packed prefix produced by the decode pipeline: the active
    /// channels' bytes, in declared order.
    pub bytes: Vec<u8, PAYLOAD_BYTES>,
    pub timestamp: i64,
}

/// Bounded, overwrite-oldest queue of streamed samples.
///
/// A ready-made [`SampleSink`] for hosts that do not bring their own
/// buffering layer. When the queue is full the oldest record is dropped to
/// make room for the newest one.
pub struct SampleBuffer<const N: usize> {
    records: Deque<SampleRecord, N>,
}

impl<const N: usize> SampleBuffer<N> {
    pub const fn new() -> Self {
        Self {
            records: Deque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes and returns the oldest buffered record.
    pub fn pop(&mut self) -> Option<SampleRecord> {
        self.records.pop_front()
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleSink for SampleBuffer<N> {
    fn append(&mut self, record: &[u8], timestamp: i64) {
        if self.records.is_full() {
            self.records.pop_front();
        }

        let mut bytes = Vec::new();
        // The pipeline never hands out more than one full payload.
        let _ = bytes.extend_from_slice(record);
        let _ = self.records.push_back(SampleRecord { bytes, timestamp });
    }
}
