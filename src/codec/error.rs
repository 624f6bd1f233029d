//! Codec error types

use thiserror::Error;

use super::FieldType;

/// Fatal codec errors.
///
/// An incomplete receive buffer is not represented here: the frame reader
/// reports it as `Ok(None)` and retries on the next receive. Every variant
/// below means the connection's framing can no longer be trusted and the
/// owning connection should be closed or reset.
#[derive(Error, Debug)]
pub enum Error {
    /// Decoded identifier has no registered packet type
    #[error("unknown packet id: {id:#04x}")]
    UnknownPacketId {
        /// Identifier after rotation reversal
        id: u8,
    },

    /// Packet type handed to the writer is not in the registry
    #[error("unregistered packet type: {name}")]
    UnregisteredPacketType {
        /// Packet type name
        name: &'static str,
    },

    /// Registry construction saw the same identifier twice
    #[error("duplicate packet id in registry: {id:#04x}")]
    DuplicatePacketId {
        /// Conflicting identifier
        id: u8,
    },

    /// Registry construction saw the same packet type twice
    #[error("duplicate packet type in registry: {name}")]
    DuplicatePacketType {
        /// Conflicting packet type name
        name: &'static str,
    },

    /// No codec registered for a declared field type
    #[error("unsupported field type: {ty}")]
    UnsupportedFieldType {
        /// Offending semantic type
        ty: FieldType,
    },

    /// Value variant handed to a codec does not match its semantic type
    #[error("field type mismatch: expected {expected}, got {got}")]
    FieldTypeMismatch {
        /// Type the codec serves
        expected: FieldType,
        /// Type of the supplied value
        got: FieldType,
    },

    /// Value does not match the declared type of a named field
    #[error("field {field} of {packet} expects {expected}, got {got}")]
    FieldValueMismatch {
        /// Packet type name
        packet: &'static str,
        /// Field name
        field: &'static str,
        /// Declared semantic type
        expected: FieldType,
        /// Type of the supplied value
        got: FieldType,
    },

    /// Wrong number of values for a packet type's declared fields
    #[error("field count mismatch for {packet}: expected {expected}, got {got}")]
    FieldCountMismatch {
        /// Packet type name
        packet: &'static str,
        /// Declared field count
        expected: usize,
        /// Supplied value count
        got: usize,
    },

    /// Payload bytes left over after all declared fields decoded
    #[error("{remaining} bytes left in payload after decoding packet {packet}")]
    TrailingBytes {
        /// Packet type name
        packet: &'static str,
        /// Unconsumed byte count
        remaining: usize,
    },

    /// Field decode ran past the end of the payload
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Frame length exceeds the two-byte header ceiling
    #[error("frame too large: {length} bytes (max {max})")]
    FrameTooLarge {
        /// Requested frame length
        length: usize,
        /// Maximum representable length
        max: usize,
    },

    /// Length-prefixed field value exceeds its one-byte length prefix
    #[error("field too long for length-prefixed encoding: {len} bytes (max {max})")]
    FieldTooLong {
        /// Value length
        len: usize,
        /// Maximum encodable length
        max: usize,
    },

    /// Typed constructor given a packet type that carries a raw payload
    #[error("packet type {name} does not declare fields")]
    NotATypedPacket {
        /// Packet type name
        name: &'static str,
    },

    /// Raw constructor given a packet type that declares fields
    #[error("packet type {name} does not carry a raw payload")]
    NotARawPacket {
        /// Packet type name
        name: &'static str,
    },

    /// String field payload is not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
