//! Wire codec core
//!
//! This module provides the frame reader/writer pair, the field codec
//! registry, the packet type registry, and the identifier obfuscation port.

mod error;
mod field;
mod length;
mod metrics;
mod packet;
mod reader;
mod registry;
mod rotation;
mod writer;

pub use error::{Error, Result};
pub use field::{FieldCodec, FieldCodecRegistry, FieldType, FieldValue};
pub use metrics::{MetricsSnapshot, metrics_snapshot};
pub use packet::{FieldDescriptor, Packet, PacketKind, PacketType, RawPacket, TypedPacket};
pub use reader::FrameReader;
pub use registry::PacketRegistry;
pub use rotation::{IdRotation, OffsetRotation};
pub use writer::FrameWriter;

/// First header byte value reserved for the two-byte length form.
///
/// Lengths below this fit in a single header byte; the identifier space and
/// the length continuation range stay disjoint by construction.
pub const LENGTH_EXTENSION: usize = 160;

/// Largest frame length representable by the two-byte header form.
pub const MAX_FRAME_LEN: usize = (255 - LENGTH_EXTENSION) * 256 + 255;
