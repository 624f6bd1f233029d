//! Field semantic types and per-type codecs
//!
//! A field codec is a stateless unit keyed by semantic type, not by field
//! name. Both pipeline directions resolve codecs through the same registry,
//! so adding a wire representation means registering a codec, never touching
//! the frame reader or writer.

use std::collections::HashMap;
use std::fmt;

use bytes::{Buf, Bytes};

use super::{Error, Result};

/// Semantic field types known to the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldType {
    /// Length-prefixed byte array (one-byte length, 0-255)
    Bytes,
    /// Unsigned 8-bit integer
    U8,
    /// Unsigned 16-bit integer, big-endian
    U16,
    /// Unsigned 32-bit integer, big-endian
    U32,
    /// Unsigned 64-bit integer, big-endian
    U64,
    /// Length-prefixed UTF-8 string (one-byte length, 0-255)
    Str,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bytes => "Bytes",
            Self::U8 => "U8",
            Self::U16 => "U16",
            Self::U32 => "U32",
            Self::U64 => "U64",
            Self::Str => "Str",
        };
        write!(f, "{name}")
    }
}

/// A decoded field value, tagged with its semantic type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    /// Raw byte array
    Bytes(Vec<u8>),
    /// Unsigned 8-bit integer
    U8(u8),
    /// Unsigned 16-bit integer
    U16(u16),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Unsigned 64-bit integer
    U64(u64),
    /// UTF-8 string
    Str(String),
}

impl FieldValue {
    /// Semantic type tag of this value.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::Bytes(_) => FieldType::Bytes,
            Self::U8(_) => FieldType::U8,
            Self::U16(_) => FieldType::U16,
            Self::U32(_) => FieldType::U32,
            Self::U64(_) => FieldType::U64,
            Self::Str(_) => FieldType::Str,
        }
    }
}

/// Stateless encode/decode unit for one semantic field type.
pub trait FieldCodec: Send + Sync {
    /// Decode one value from the payload cursor.
    fn decode(&self, buf: &mut Bytes) -> Result<FieldValue>;

    /// Append one value's wire representation to the body sink.
    fn encode(&self, value: &FieldValue, out: &mut Vec<u8>) -> Result<()>;
}

fn ensure(buf: &Bytes, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            got: buf.remaining(),
        });
    }
    Ok(())
}

fn mismatch(expected: FieldType, value: &FieldValue) -> Error {
    Error::FieldTypeMismatch {
        expected,
        got: value.field_type(),
    }
}

/// One-byte length prefix followed by that many raw bytes.
struct ByteArrayCodec;

impl ByteArrayCodec {
    fn read_prefixed(buf: &mut Bytes) -> Result<Bytes> {
        ensure(buf, 1)?;
        let len = usize::from(buf.get_u8());
        ensure(buf, len)?;
        Ok(buf.split_to(len))
    }

    fn write_prefixed(bytes: &[u8], out: &mut Vec<u8>) -> Result<()> {
        if bytes.len() > usize::from(u8::MAX) {
            return Err(Error::FieldTooLong {
                len: bytes.len(),
                max: usize::from(u8::MAX),
            });
        }
        out.push(bytes.len() as u8);
        out.extend_from_slice(bytes);
        Ok(())
    }
}

impl FieldCodec for ByteArrayCodec {
    fn decode(&self, buf: &mut Bytes) -> Result<FieldValue> {
        Ok(FieldValue::Bytes(Self::read_prefixed(buf)?.to_vec()))
    }

    fn encode(&self, value: &FieldValue, out: &mut Vec<u8>) -> Result<()> {
        let FieldValue::Bytes(bytes) = value else {
            return Err(mismatch(FieldType::Bytes, value));
        };
        Self::write_prefixed(bytes, out)
    }
}

/// One-byte length prefix followed by UTF-8 text.
struct StrCodec;

impl FieldCodec for StrCodec {
    fn decode(&self, buf: &mut Bytes) -> Result<FieldValue> {
        let bytes = ByteArrayCodec::read_prefixed(buf)?;
        Ok(FieldValue::Str(String::from_utf8(bytes.to_vec())?))
    }

    fn encode(&self, value: &FieldValue, out: &mut Vec<u8>) -> Result<()> {
        let FieldValue::Str(text) = value else {
            return Err(mismatch(FieldType::Str, value));
        };
        ByteArrayCodec::write_prefixed(text.as_bytes(), out)
    }
}

struct U8Codec;

impl FieldCodec for U8Codec {
    fn decode(&self, buf: &mut Bytes) -> Result<FieldValue> {
        ensure(buf, 1)?;
        Ok(FieldValue::U8(buf.get_u8()))
    }

    fn encode(&self, value: &FieldValue, out: &mut Vec<u8>) -> Result<()> {
        let FieldValue::U8(v) = value else {
            return Err(mismatch(FieldType::U8, value));
        };
        out.push(*v);
        Ok(())
    }
}

struct U16Codec;

impl FieldCodec for U16Codec {
    fn decode(&self, buf: &mut Bytes) -> Result<FieldValue> {
        ensure(buf, 2)?;
        Ok(FieldValue::U16(buf.get_u16()))
    }

    fn encode(&self, value: &FieldValue, out: &mut Vec<u8>) -> Result<()> {
        let FieldValue::U16(v) = value else {
            return Err(mismatch(FieldType::U16, value));
        };
        out.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }
}

struct U32Codec;

impl FieldCodec for U32Codec {
    fn decode(&self, buf: &mut Bytes) -> Result<FieldValue> {
        ensure(buf, 4)?;
        Ok(FieldValue::U32(buf.get_u32()))
    }

    fn encode(&self, value: &FieldValue, out: &mut Vec<u8>) -> Result<()> {
        let FieldValue::U32(v) = value else {
            return Err(mismatch(FieldType::U32, value));
        };
        out.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }
}

struct U64Codec;

impl FieldCodec for U64Codec {
    fn decode(&self, buf: &mut Bytes) -> Result<FieldValue> {
        ensure(buf, 8)?;
        Ok(FieldValue::U64(buf.get_u64()))
    }

    fn encode(&self, value: &FieldValue, out: &mut Vec<u8>) -> Result<()> {
        let FieldValue::U64(v) = value else {
            return Err(mismatch(FieldType::U64, value));
        };
        out.extend_from_slice(&v.to_be_bytes());
        Ok(())
    }
}

/// Type-to-codec lookup shared by the frame reader and writer.
pub struct FieldCodecRegistry {
    codecs: HashMap<FieldType, Box<dyn FieldCodec>>,
}

impl FieldCodecRegistry {
    /// Registry populated with the built-in codecs.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(FieldType::Bytes, Box::new(ByteArrayCodec));
        registry.register(FieldType::U8, Box::new(U8Codec));
        registry.register(FieldType::U16, Box::new(U16Codec));
        registry.register(FieldType::U32, Box::new(U32Codec));
        registry.register(FieldType::U64, Box::new(U64Codec));
        registry.register(FieldType::Str, Box::new(StrCodec));
        registry
    }

    /// Registry with no codecs at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Register (or replace) the codec for a semantic type.
    pub fn register(&mut self, ty: FieldType, codec: Box<dyn FieldCodec>) {
        self.codecs.insert(ty, codec);
    }

    /// Resolve the codec for a semantic type.
    pub fn get(&self, ty: FieldType) -> Result<&dyn FieldCodec> {
        self.codecs
            .get(&ty)
            .map(Box::as_ref)
            .ok_or(Error::UnsupportedFieldType { ty })
    }
}

impl Default for FieldCodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
