//! Stream-level scenarios: several connections' worth of frames moving
//! through a shared registry, fed in arbitrary-sized chunks.

use std::sync::Arc;

use bytes::BytesMut;
use packframe::{
    Error, FieldDescriptor, FieldType, FieldValue, FrameReader, FrameWriter, OffsetRotation,
    Packet, PacketRegistry, PacketType, RawPacket, TypedPacket,
};

fn game_registry() -> Arc<PacketRegistry> {
    let login = PacketType::with_fields(
        "login",
        vec![
            FieldDescriptor::new("username", FieldType::Str),
            FieldDescriptor::new("password", FieldType::Str),
            FieldDescriptor::new("client-version", FieldType::U16),
        ],
    );
    let move_to = PacketType::with_fields(
        "move-to",
        vec![
            FieldDescriptor::new("x", FieldType::U16),
            FieldDescriptor::new("y", FieldType::U16),
        ],
    );
    let chat = PacketType::with_fields(
        "chat",
        vec![FieldDescriptor::new("message", FieldType::Bytes)],
    );
    let keepalive = PacketType::with_fields("keepalive", Vec::new());
    let update_blob = PacketType::with_fields(
        "update-blob",
        vec![
            FieldDescriptor::new("sequence", FieldType::U64),
            FieldDescriptor::new("chunk", FieldType::Bytes),
        ],
    );
    let legacy = PacketType::raw("legacy");

    Arc::new(
        PacketRegistry::new([
            (0x00, login),
            (0x2A, move_to),
            (0x03, chat),
            (0x05, keepalive),
            (0x9C, update_blob),
            (0xF0, legacy),
        ])
        .unwrap(),
    )
}

fn sample_packets(registry: &PacketRegistry) -> Vec<Packet> {
    let login = registry.type_for_id(0x00).unwrap().clone();
    let move_to = registry.type_for_id(0x2A).unwrap().clone();
    let chat = registry.type_for_id(0x03).unwrap().clone();
    let keepalive = registry.type_for_id(0x05).unwrap().clone();
    let update_blob = registry.type_for_id(0x9C).unwrap().clone();

    vec![
        Packet::Typed(
            TypedPacket::new(
                login,
                vec![
                    FieldValue::Str("mod-runite".into()),
                    FieldValue::Str("hunter2".into()),
                    FieldValue::U16(204),
                ],
            )
            .unwrap(),
        ),
        Packet::Typed(
            TypedPacket::new(move_to, vec![FieldValue::U16(321), FieldValue::U16(457)]).unwrap(),
        ),
        Packet::Typed(TypedPacket::new(keepalive, Vec::new()).unwrap()),
        Packet::Typed(
            TypedPacket::new(chat, vec![FieldValue::Bytes(b"selling lobsters".to_vec())]).unwrap(),
        ),
        Packet::Typed(
            TypedPacket::new(
                update_blob,
                vec![
                    FieldValue::U64(0x0102_0304_0506_0708),
                    FieldValue::Bytes(vec![0x42; 250]),
                ],
            )
            .unwrap(),
        ),
    ]
}

#[test]
fn multi_packet_stream_round_trips_in_order() {
    let registry = game_registry();
    let writer = FrameWriter::new(registry.clone());
    let reader = FrameReader::new(registry.clone());

    let packets = sample_packets(&registry);

    let mut stream = BytesMut::new();
    let mut produced = 0;
    for packet in &packets {
        let frame = writer.write_frame(packet, None).unwrap();
        produced += frame.len();
        stream.extend_from_slice(&frame);
    }

    let mut decoded = Vec::new();
    while let Some(packet) = reader.read_frame(&mut stream, None).unwrap() {
        decoded.push(packet);
    }

    assert_eq!(decoded, packets);
    assert!(stream.is_empty(), "decode must consume exactly {produced} bytes");
}

#[test]
fn byte_by_byte_feed_is_idempotent_until_complete() {
    let registry = game_registry();
    let writer = FrameWriter::new(registry.clone());
    let reader = FrameReader::new(registry.clone());

    let packets = sample_packets(&registry);

    for packet in &packets {
        let frame = writer.write_frame(packet, None).unwrap();
        let mut buf = BytesMut::new();

        for (fed, byte) in frame.iter().enumerate() {
            buf.extend_from_slice(&[*byte]);
            if fed + 1 < frame.len() {
                assert!(reader.read_frame(&mut buf, None).unwrap().is_none());
                assert_eq!(buf.len(), fed + 1, "partial frame must not be consumed");
            }
        }

        let decoded = reader.read_frame(&mut buf, None).unwrap().unwrap();
        assert_eq!(&decoded, packet);
        assert!(buf.is_empty());
    }
}

#[test]
fn session_rotation_round_trips() {
    let registry = game_registry();
    let writer = FrameWriter::new(registry.clone());
    let reader = FrameReader::new(registry.clone());

    // Both sides of the session share the rotation contract.
    let mut outgoing = OffsetRotation::new(0x53);
    let mut incoming = OffsetRotation::new(0x53);

    for packet in sample_packets(&registry) {
        let frame = writer.write_frame(&packet, Some(&mut outgoing)).unwrap();
        let mut buf = BytesMut::from(&frame[..]);
        let decoded = reader
            .read_frame(&mut buf, Some(&mut incoming))
            .unwrap()
            .unwrap();
        assert_eq!(decoded, packet);
    }
}

#[test]
fn rotated_stream_without_session_state_is_rejected() {
    let registry = game_registry();
    let writer = FrameWriter::new(registry.clone());
    let reader = FrameReader::new(registry.clone());

    let keepalive = registry.type_for_id(0x05).unwrap().clone();
    let packet = Packet::Typed(TypedPacket::new(keepalive, Vec::new()).unwrap());

    let mut rotation = OffsetRotation::new(0x40);
    let frame = writer.write_frame(&packet, Some(&mut rotation)).unwrap();

    let mut buf = BytesMut::from(&frame[..]);
    let result = reader.read_frame(&mut buf, None);
    assert!(matches!(result, Err(Error::UnknownPacketId { id: 0x45 })));
}

#[test]
fn known_wire_vector_decodes_to_relocated_payload() {
    // length 5, id 0x2A, payload [0x01, 0x02, 0x03, 0x04]: the last payload
    // byte leads the frame body, then the identifier, then the rest.
    let ty = PacketType::raw("probe");
    let registry = Arc::new(PacketRegistry::new([(0x2A, ty)]).unwrap());
    let reader = FrameReader::new(registry);

    let mut buf = BytesMut::from(&[0x05u8, 0x04, 0x2A, 0x01, 0x02, 0x03][..]);
    let packet = reader.read_frame(&mut buf, None).unwrap().unwrap();

    let Packet::Raw(raw) = packet else {
        panic!("expected raw packet");
    };
    assert_eq!(&raw.payload()[..], &[0x01, 0x02, 0x03, 0x04]);
    assert!(buf.is_empty());
}

#[test]
fn legacy_raw_traffic_passes_through_both_ways() {
    let registry = game_registry();
    let writer = FrameWriter::new(registry.clone());
    let reader = FrameReader::new(registry.clone());

    // Inbound: a frame addressed to the raw type keeps its payload opaque.
    let mut buf = BytesMut::from(&[0x04u8, 0x03, 0xF0, 0x01, 0x02][..]);
    let inbound = reader.read_frame(&mut buf, None).unwrap().unwrap();
    let Packet::Raw(inbound) = inbound else {
        panic!("expected raw packet");
    };
    assert_eq!(&inbound.payload()[..], &[0x01, 0x02, 0x03]);

    // Outbound: raw packets are emitted verbatim, framing-exempt.
    let legacy = registry.type_for_id(0xF0).unwrap().clone();
    let outbound = Packet::Raw(RawPacket::new(legacy, vec![9u8, 9, 9]).unwrap());
    let bytes = writer.write_frame(&outbound, None).unwrap();
    assert_eq!(&bytes[..], &[9, 9, 9]);
}

#[test]
fn corrupted_stream_stops_at_first_bad_frame() {
    let registry = game_registry();
    let writer = FrameWriter::new(registry.clone());
    let reader = FrameReader::new(registry.clone());

    let keepalive = registry.type_for_id(0x05).unwrap().clone();
    let good = Packet::Typed(TypedPacket::new(keepalive, Vec::new()).unwrap());
    let good_frame = writer.write_frame(&good, None).unwrap();

    let mut stream = BytesMut::new();
    stream.extend_from_slice(&good_frame);
    stream.extend_from_slice(&[0x01, 0xEE]); // id 0xEE is not registered
    stream.extend_from_slice(&good_frame);

    assert!(reader.read_frame(&mut stream, None).unwrap().is_some());
    assert!(matches!(
        reader.read_frame(&mut stream, None),
        Err(Error::UnknownPacketId { id: 0xEE })
    ));
}
