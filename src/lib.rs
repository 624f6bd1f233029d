//! packframe - length-framed, ID-obfuscated packet codec for classic game-server protocols
//!
//! This library implements the wire-level encode/decode contract used between
//! a game server and its clients: a compact variable-width length header, a
//! per-connection rotation applied to packet identifiers, and a type-driven
//! field serialization layer that round-trips structured messages over a byte
//! stream.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use bytes::BytesMut;
//! use packframe::{
//!     FieldDescriptor, FieldType, FieldValue, FrameReader, FrameWriter, Packet,
//!     PacketRegistry, PacketType, TypedPacket,
//! };
//!
//! let ping = PacketType::with_fields(
//!     "ping",
//!     vec![FieldDescriptor::new("token", FieldType::U32)],
//! );
//! let registry = Arc::new(PacketRegistry::new([(42, ping.clone())])?);
//!
//! let writer = FrameWriter::new(registry.clone());
//! let packet = TypedPacket::new(ping, vec![FieldValue::U32(7)])?;
//! let frame = writer.write_frame(&Packet::Typed(packet), None)?;
//!
//! let reader = FrameReader::new(registry);
//! let mut buf = BytesMut::from(&frame[..]);
//! let decoded = reader.read_frame(&mut buf, None)?;
//! assert!(decoded.is_some());
//! # Ok::<(), packframe::Error>(())
//! ```
//!
//! # Design
//!
//! - **Streaming-safe framing** - a partial frame is never consumed from the
//!   receive buffer; `read_frame` returns `Ok(None)` until a full frame is in
//! - **Type-safe packet schemas** - field order is a declared, compile-time
//!   contract, not a runtime introspection result
//! - **Injected obfuscation** - the per-connection identifier rotation is a
//!   trait the session supplies; the codec never owns cipher state

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod codec;

pub use codec::{
    Error, FieldCodec, FieldCodecRegistry, FieldDescriptor, FieldType, FieldValue, FrameReader,
    FrameWriter, IdRotation, LENGTH_EXTENSION, MAX_FRAME_LEN, MetricsSnapshot, OffsetRotation,
    Packet, PacketKind, PacketRegistry, PacketType, RawPacket, Result, TypedPacket,
    metrics_snapshot,
};

/// Wire protocol revision implemented by this crate.
pub const VERSION: &str = "1.0.0";
