//! Per-connection identifier obfuscation port
//!
//! The rotation cipher itself belongs to the session layer; the codec only
//! invokes it, once per decode and once per encode, and never inspects its
//! state. A connection that has not yet established session state passes
//! `None` and identifiers travel unmodified.

/// Reversible per-connection transform applied to packet identifiers.
///
/// `rotate_incoming` must be the exact inverse of the peer's
/// `rotate_outgoing` for the stream to stay decodable. Implementations are
/// stateful and must not be shared between connections.
pub trait IdRotation {
    /// Reverse the transform on an identifier read off the wire.
    fn rotate_incoming(&mut self, id: u8) -> u8;

    /// Apply the transform to an identifier about to be written.
    fn rotate_outgoing(&mut self, id: u8) -> u8;
}

/// Wrapping additive rotation.
///
/// A minimal, independently testable port implementation for handshake
/// traffic and tests; production sessions plug in their own cipher.
#[derive(Debug, Clone, Copy)]
pub struct OffsetRotation {
    offset: u8,
}

impl OffsetRotation {
    /// Rotation adding `offset` on the way out, subtracting it on the way in.
    #[must_use]
    pub const fn new(offset: u8) -> Self {
        Self { offset }
    }
}

impl IdRotation for OffsetRotation {
    fn rotate_incoming(&mut self, id: u8) -> u8 {
        id.wrapping_sub(self.offset)
    }

    fn rotate_outgoing(&mut self, id: u8) -> u8 {
        id.wrapping_add(self.offset)
    }
}
