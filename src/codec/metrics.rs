//! Process-wide codec counters, kept free of external dependencies.

use std::sync::atomic::{AtomicU64, Ordering};

static DECODED_FRAMES: AtomicU64 = AtomicU64::new(0);
static ENCODED_FRAMES: AtomicU64 = AtomicU64::new(0);
static DECODED_BYTES: AtomicU64 = AtomicU64::new(0);
static ENCODED_BYTES: AtomicU64 = AtomicU64::new(0);
static DECODE_ERRORS: AtomicU64 = AtomicU64::new(0);
static ENCODE_ERRORS: AtomicU64 = AtomicU64::new(0);
static INCOMPLETE_POLLS: AtomicU64 = AtomicU64::new(0);
static LARGEST_DECODED_FRAME: AtomicU64 = AtomicU64::new(0);
static LARGEST_ENCODED_FRAME: AtomicU64 = AtomicU64::new(0);

/// Track codec activity across all connections.
pub(crate) struct Metrics;

impl Metrics {
    #[inline]
    pub(crate) fn record_decode(frame_len: usize) {
        let frame_len = frame_len as u64;
        DECODED_FRAMES.fetch_add(1, Ordering::Relaxed);
        DECODED_BYTES.fetch_add(frame_len, Ordering::Relaxed);
        update_max(&LARGEST_DECODED_FRAME, frame_len);
    }

    #[inline]
    pub(crate) fn record_encode(frame_len: usize) {
        let frame_len = frame_len as u64;
        ENCODED_FRAMES.fetch_add(1, Ordering::Relaxed);
        ENCODED_BYTES.fetch_add(frame_len, Ordering::Relaxed);
        update_max(&LARGEST_ENCODED_FRAME, frame_len);
    }

    #[inline]
    pub(crate) fn record_decode_error() {
        DECODE_ERRORS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_encode_error() {
        ENCODE_ERRORS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_incomplete() {
        INCOMPLETE_POLLS.fetch_add(1, Ordering::Relaxed);
    }
}

fn update_max(target: &AtomicU64, candidate: u64) {
    let mut current = target.load(Ordering::Relaxed);
    while candidate > current {
        match target.compare_exchange_weak(
            current,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return,
            Err(old) => current = old,
        }
    }
}

/// Lightweight snapshot of the codec counters.
#[derive(Default, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    /// Frames fully decoded
    pub decoded_frames: u64,
    /// Frames fully encoded
    pub encoded_frames: u64,
    /// Bytes consumed by successful decodes (headers included)
    pub decoded_bytes: u64,
    /// Bytes produced by successful encodes (headers included)
    pub encoded_bytes: u64,
    /// Fatal decode failures
    pub decode_errors: u64,
    /// Fatal encode failures
    pub encode_errors: u64,
    /// Reads that found no complete frame yet
    pub incomplete_polls: u64,
    /// Largest frame decoded so far, in bytes
    pub largest_decoded_frame: u64,
    /// Largest frame encoded so far, in bytes
    pub largest_encoded_frame: u64,
}

impl MetricsSnapshot {
    /// Average decoded frame size in bytes.
    #[must_use]
    pub fn avg_decoded_frame(&self) -> Option<u64> {
        average(self.decoded_bytes, self.decoded_frames)
    }

    /// Average encoded frame size in bytes.
    #[must_use]
    pub fn avg_encoded_frame(&self) -> Option<u64> {
        average(self.encoded_bytes, self.encoded_frames)
    }
}

fn average(total: u64, count: u64) -> Option<u64> {
    if count == 0 {
        return None;
    }
    Some(total / count)
}

/// Snapshot the process-wide codec counters.
#[must_use]
pub fn metrics_snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        decoded_frames: DECODED_FRAMES.load(Ordering::Relaxed),
        encoded_frames: ENCODED_FRAMES.load(Ordering::Relaxed),
        decoded_bytes: DECODED_BYTES.load(Ordering::Relaxed),
        encoded_bytes: ENCODED_BYTES.load(Ordering::Relaxed),
        decode_errors: DECODE_ERRORS.load(Ordering::Relaxed),
        encode_errors: ENCODE_ERRORS.load(Ordering::Relaxed),
        incomplete_polls: INCOMPLETE_POLLS.load(Ordering::Relaxed),
        largest_decoded_frame: LARGEST_DECODED_FRAME.load(Ordering::Relaxed),
        largest_encoded_frame: LARGEST_ENCODED_FRAME.load(Ordering::Relaxed),
    }
}
