//! Frame reader (decode pipeline)
//!
//! Consumes a growing receive buffer and yields at most one decoded packet
//! per call. A partial frame is never consumed: the header is peeked without
//! advancing, and the buffer is only split once the whole frame is present.
//! Decode and the identifier rotation are synchronous and bounded; one
//! reader serves exactly one connection.

use std::sync::Arc;

use bytes::{Buf, Bytes, BytesMut};
use tracing::trace;

use super::length::peek_length;
use super::metrics::Metrics;
use super::{
    Error, FieldCodecRegistry, IdRotation, LENGTH_EXTENSION, Packet, PacketKind, PacketRegistry,
    RawPacket, Result, TypedPacket,
};

/// Decode half of a connection's codec pipeline.
pub struct FrameReader {
    packets: Arc<PacketRegistry>,
    fields: Arc<FieldCodecRegistry>,
}

impl FrameReader {
    /// Reader over a packet registry, using the built-in field codecs.
    #[must_use]
    pub fn new(packets: Arc<PacketRegistry>) -> Self {
        Self {
            packets,
            fields: Arc::new(FieldCodecRegistry::new()),
        }
    }

    /// Reader with a custom field codec registry.
    #[must_use]
    pub fn with_field_codecs(
        packets: Arc<PacketRegistry>,
        fields: Arc<FieldCodecRegistry>,
    ) -> Self {
        Self { packets, fields }
    }

    /// Try to extract one complete packet from the receive buffer.
    ///
    /// Returns `Ok(None)` while the buffer holds less than one full frame;
    /// the buffer is left untouched in that case and the caller retries
    /// after the next receive. On success exactly the frame's bytes have
    /// been consumed. Any `Err` is fatal for the connection.
    pub fn read_frame(
        &self,
        buf: &mut BytesMut,
        rotation: Option<&mut dyn IdRotation>,
    ) -> Result<Option<Packet>> {
        let Some((length, header_len)) = peek_length(buf) else {
            Metrics::record_incomplete();
            return Ok(None);
        };

        if length == 0 || buf.len() < header_len + length {
            Metrics::record_incomplete();
            return Ok(None);
        }

        // The whole frame is in; consume it in one step.
        let frame = buf.split_to(header_len + length).freeze();
        match self.decode_frame(&frame, header_len, length, rotation) {
            Ok(packet) => {
                Metrics::record_decode(frame.len());
                Ok(Some(packet))
            }
            Err(err) => {
                Metrics::record_decode_error();
                Err(err)
            }
        }
    }

    fn decode_frame(
        &self,
        frame: &Bytes,
        header_len: usize,
        length: usize,
        rotation: Option<&mut dyn IdRotation>,
    ) -> Result<Packet> {
        let (wire_id, payload) = split_frame(frame, header_len, length);

        let id = match rotation {
            Some(rotation) => rotation.rotate_incoming(wire_id),
            None => wire_id,
        };

        let ty = self
            .packets
            .type_for_id(id)
            .ok_or(Error::UnknownPacketId { id })?;
        trace!(id, packet = ty.name(), length, "decoding frame");

        match ty.kind() {
            PacketKind::Raw => Ok(Packet::Raw(RawPacket::from_decoded(ty.clone(), payload))),
            PacketKind::Fields(descriptors) => {
                let mut cursor = payload;
                let mut values = Vec::with_capacity(descriptors.len());
                for descriptor in descriptors {
                    let codec = self.fields.get(descriptor.ty())?;
                    values.push(codec.decode(&mut cursor)?);
                }

                if cursor.has_remaining() {
                    return Err(Error::TrailingBytes {
                        packet: ty.name(),
                        remaining: cursor.remaining(),
                    });
                }

                Ok(Packet::Typed(TypedPacket::from_decoded(ty.clone(), values)))
            }
        }
    }
}

/// Split one complete frame into its wire identifier and reassembled payload.
///
/// The identifier's position is a function of the frame length. Large frames
/// put it right after the header; small frames relocate the final payload
/// byte to sit before the identifier, so the payload is reassembled as the
/// middle bytes followed by the relocated byte.
fn split_frame(frame: &Bytes, header_len: usize, length: usize) -> (u8, Bytes) {
    if length >= LENGTH_EXTENSION {
        let id = frame[header_len];
        (id, frame.slice(header_len + 1..))
    } else if length >= 2 {
        let last = frame[header_len];
        let id = frame[header_len + 1];
        let mut payload = Vec::with_capacity(length - 1);
        payload.extend_from_slice(&frame[header_len + 2..]);
        payload.push(last);
        (id, Bytes::from(payload))
    } else {
        (frame[header_len], Bytes::new())
    }
}
