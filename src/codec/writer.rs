//! Frame writer (encode pipeline)
//!
//! Serializes one packet into exactly one outgoing byte sequence, using the
//! same length header and size-class layout the reader decodes, so the two
//! halves are exact inverses. Raw packets bypass framing entirely and travel
//! verbatim.

use std::sync::Arc;

use bytes::Bytes;
use tracing::trace;

use super::length::encode_length;
use super::metrics::Metrics;
use super::{
    Error, FieldCodecRegistry, IdRotation, LENGTH_EXTENSION, Packet, PacketRegistry, Result,
};

/// Encode half of a connection's codec pipeline.
pub struct FrameWriter {
    packets: Arc<PacketRegistry>,
    fields: Arc<FieldCodecRegistry>,
}

impl FrameWriter {
    /// Writer over a packet registry, using the built-in field codecs.
    #[must_use]
    pub fn new(packets: Arc<PacketRegistry>) -> Self {
        Self {
            packets,
            fields: Arc::new(FieldCodecRegistry::new()),
        }
    }

    /// Writer with a custom field codec registry.
    #[must_use]
    pub fn with_field_codecs(
        packets: Arc<PacketRegistry>,
        fields: Arc<FieldCodecRegistry>,
    ) -> Self {
        Self { packets, fields }
    }

    /// Serialize one packet into its outgoing byte sequence.
    pub fn write_frame(
        &self,
        packet: &Packet,
        rotation: Option<&mut dyn IdRotation>,
    ) -> Result<Bytes> {
        match self.encode(packet, rotation) {
            Ok(bytes) => {
                Metrics::record_encode(bytes.len());
                Ok(bytes)
            }
            Err(err) => {
                Metrics::record_encode_error();
                Err(err)
            }
        }
    }

    fn encode(&self, packet: &Packet, rotation: Option<&mut dyn IdRotation>) -> Result<Bytes> {
        let packet = match packet {
            // Raw packets are framing-exempt by transport convention.
            Packet::Raw(raw) => return Ok(raw.payload().clone()),
            Packet::Typed(typed) => typed,
        };

        let ty = packet.packet_type();
        let logical_id = self
            .packets
            .id_for(ty)
            .ok_or(Error::UnregisteredPacketType { name: ty.name() })?;

        let mut body = Vec::new();
        for (descriptor, value) in ty.descriptors().iter().zip(packet.values()) {
            let codec = self.fields.get(descriptor.ty())?;
            codec.encode(value, &mut body)?;
        }

        let id = match rotation {
            Some(rotation) => rotation.rotate_outgoing(logical_id),
            None => logical_id,
        };

        // One extra byte for the identifier.
        let length = body.len() + 1;
        let mut out = Vec::with_capacity(2 + length);
        encode_length(length, &mut out)?;

        if length >= LENGTH_EXTENSION {
            out.push(id);
            out.extend_from_slice(&body);
        } else if length >= 2 {
            // Mirror of the reader's small-frame layout: relocated last body
            // byte first, then the identifier, then the rest of the body.
            out.push(body[length - 2]);
            out.push(id);
            out.extend_from_slice(&body[..length - 2]);
        } else {
            out.push(id);
        }

        trace!(id = logical_id, packet = ty.name(), length, "encoded frame");
        Ok(Bytes::from(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{
        FieldDescriptor, FieldType, FieldValue, OffsetRotation, PacketType, RawPacket, TypedPacket,
    };

    fn registry() -> Arc<PacketRegistry> {
        let move_to = PacketType::with_fields(
            "move-to",
            vec![FieldDescriptor::new("path", FieldType::Bytes)],
        );
        let blob = PacketType::with_fields(
            "blob",
            vec![FieldDescriptor::new("data", FieldType::Bytes)],
        );
        let nop = PacketType::with_fields("nop", Vec::new());
        Arc::new(PacketRegistry::new([(0x2A, move_to), (0x07, blob), (0x01, nop)]).unwrap())
    }

    fn typed(registry: &PacketRegistry, id: u8, values: Vec<FieldValue>) -> Packet {
        let ty = registry.type_for_id(id).unwrap().clone();
        Packet::Typed(TypedPacket::new(ty, values).unwrap())
    }

    #[test]
    fn small_frame_relocates_last_body_byte() {
        let registry = registry();
        let writer = FrameWriter::new(registry.clone());
        let packet = typed(&registry, 0x2A, vec![FieldValue::Bytes(vec![0x01, 0x02, 0x03])]);

        let frame = writer.write_frame(&packet, None).unwrap();
        // Body is [0x03, 0x01, 0x02, 0x03]; its last byte leads, then the id.
        assert_eq!(&frame[..], &[0x05, 0x03, 0x2A, 0x03, 0x01, 0x02]);
    }

    #[test]
    fn empty_body_frame_is_header_and_id() {
        let registry = registry();
        let writer = FrameWriter::new(registry.clone());
        let packet = typed(&registry, 0x01, Vec::new());

        let frame = writer.write_frame(&packet, None).unwrap();
        assert_eq!(&frame[..], &[0x01, 0x01]);
    }

    #[test]
    fn large_frame_uses_two_byte_header_without_relocation() {
        let registry = registry();
        let writer = FrameWriter::new(registry.clone());
        let packet = typed(&registry, 0x07, vec![FieldValue::Bytes(vec![0xCD; 198])]);

        let frame = writer.write_frame(&packet, None).unwrap();
        // Body = prefix byte + 198 data bytes = 199; frame length = 200.
        assert_eq!(frame.len(), 2 + 1 + 199);
        assert_eq!(&frame[..3], &[160, 200, 0x07]);
        assert_eq!(frame[3], 198);
        assert!(frame[4..].iter().all(|&b| b == 0xCD));
    }

    #[test]
    fn boundary_frame_length_160_takes_large_layout() {
        // Body of 159 bytes gives frame length exactly 160: two-byte header,
        // no relocation, on both sides of the pipe.
        let registry = registry();
        let writer = FrameWriter::new(registry.clone());
        let packet = typed(&registry, 0x07, vec![FieldValue::Bytes(vec![0x11; 158])]);

        let frame = writer.write_frame(&packet, None).unwrap();
        assert_eq!(&frame[..3], &[160, 160, 0x07]);
        assert_eq!(frame[3], 158);
    }

    #[test]
    fn rotation_applied_to_wire_id_only() {
        let registry = registry();
        let writer = FrameWriter::new(registry.clone());
        let packet = typed(&registry, 0x01, Vec::new());

        let mut rotation = OffsetRotation::new(0x10);
        let frame = writer.write_frame(&packet, Some(&mut rotation)).unwrap();
        assert_eq!(&frame[..], &[0x01, 0x11]);
    }

    #[test]
    fn raw_packet_bypasses_framing() {
        let registry = registry();
        let writer = FrameWriter::new(registry);
        let ty = PacketType::raw("preframed");
        let packet = Packet::Raw(RawPacket::new(ty, Bytes::from_static(b"already framed")).unwrap());

        let frame = writer.write_frame(&packet, None).unwrap();
        assert_eq!(&frame[..], b"already framed");
    }

    #[test]
    fn unregistered_type_is_fatal() {
        let registry = registry();
        let writer = FrameWriter::new(registry);
        let stranger = PacketType::with_fields("stranger", Vec::new());
        let packet = Packet::Typed(TypedPacket::new(stranger, Vec::new()).unwrap());

        let result = writer.write_frame(&packet, None);
        assert!(matches!(
            result,
            Err(Error::UnregisteredPacketType { name: "stranger" })
        ));
    }
}
