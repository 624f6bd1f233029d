//! Packet data model
//!
//! A packet type is a statically declared schema: either an ordered list of
//! named, typed fields, or an opaque raw payload. Declaration order defines
//! wire order and is immutable once the type is built.

use std::sync::Arc;

use bytes::Bytes;

use super::{Error, FieldType, FieldValue, Result};

/// (name, semantic type) pair belonging to a packet type's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: &'static str,
    ty: FieldType,
}

impl FieldDescriptor {
    /// Declare a field.
    #[must_use]
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }

    /// Field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Semantic type.
    #[must_use]
    pub const fn ty(&self) -> FieldType {
        self.ty
    }
}

/// Shape of a packet type's body.
#[derive(Debug, PartialEq, Eq)]
pub enum PacketKind {
    /// Ordered field schema; wire order equals declaration order
    Fields(Vec<FieldDescriptor>),
    /// Opaque pass-through payload with no field structure
    Raw,
}

/// A registered packet type descriptor.
///
/// Shared as `Arc<PacketType>` between the registry, decoded packets, and
/// application code; never mutated after construction.
#[derive(Debug, PartialEq, Eq)]
pub struct PacketType {
    name: &'static str,
    kind: PacketKind,
}

impl PacketType {
    /// Declare a typed packet with an ordered field schema.
    #[must_use]
    pub fn with_fields(name: &'static str, fields: Vec<FieldDescriptor>) -> Arc<Self> {
        Arc::new(Self {
            name,
            kind: PacketKind::Fields(fields),
        })
    }

    /// Declare a raw pass-through packet.
    #[must_use]
    pub fn raw(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            kind: PacketKind::Raw,
        })
    }

    /// Packet type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Body shape.
    #[must_use]
    pub const fn kind(&self) -> &PacketKind {
        &self.kind
    }

    /// Declared fields, in wire order. Empty for raw packet types.
    #[must_use]
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        match &self.kind {
            PacketKind::Fields(fields) => fields,
            PacketKind::Raw => &[],
        }
    }

    /// Whether this type carries an opaque payload.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self.kind, PacketKind::Raw)
    }
}

/// A structured message with values for every declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedPacket {
    ty: Arc<PacketType>,
    values: Vec<FieldValue>,
}

impl TypedPacket {
    /// Build a packet, validating value count and per-field type tags
    /// against the schema.
    pub fn new(ty: Arc<PacketType>, values: Vec<FieldValue>) -> Result<Self> {
        if ty.is_raw() {
            return Err(Error::NotATypedPacket { name: ty.name() });
        }

        let descriptors = ty.descriptors();
        if descriptors.len() != values.len() {
            return Err(Error::FieldCountMismatch {
                packet: ty.name(),
                expected: descriptors.len(),
                got: values.len(),
            });
        }

        for (descriptor, value) in descriptors.iter().zip(&values) {
            if descriptor.ty() != value.field_type() {
                return Err(Error::FieldValueMismatch {
                    packet: ty.name(),
                    field: descriptor.name(),
                    expected: descriptor.ty(),
                    got: value.field_type(),
                });
            }
        }

        Ok(Self { ty, values })
    }

    /// Values already validated field-by-field during frame decoding.
    pub(crate) fn from_decoded(ty: Arc<PacketType>, values: Vec<FieldValue>) -> Self {
        Self { ty, values }
    }

    /// Packet type descriptor.
    #[must_use]
    pub const fn packet_type(&self) -> &Arc<PacketType> {
        &self.ty
    }

    /// Field values in wire order.
    #[must_use]
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Look up a field value by declared name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.ty
            .descriptors()
            .iter()
            .position(|descriptor| descriptor.name() == name)
            .map(|index| &self.values[index])
    }
}

/// An opaque message carrying its wire payload verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPacket {
    ty: Arc<PacketType>,
    payload: Bytes,
}

impl RawPacket {
    /// Build a raw packet for a raw-kind type.
    pub fn new(ty: Arc<PacketType>, payload: impl Into<Bytes>) -> Result<Self> {
        if !ty.is_raw() {
            return Err(Error::NotARawPacket { name: ty.name() });
        }
        Ok(Self {
            ty,
            payload: payload.into(),
        })
    }

    pub(crate) fn from_decoded(ty: Arc<PacketType>, payload: Bytes) -> Self {
        Self { ty, payload }
    }

    /// Packet type descriptor.
    #[must_use]
    pub const fn packet_type(&self) -> &Arc<PacketType> {
        &self.ty
    }

    /// Stored payload, byte-for-byte as received or as it will be sent.
    #[must_use]
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }
}

/// One decoded frame body, or one message queued for sending.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Field-structured message
    Typed(TypedPacket),
    /// Opaque pass-through message
    Raw(RawPacket),
}

impl Packet {
    /// Packet type descriptor for either kind.
    #[must_use]
    pub const fn packet_type(&self) -> &Arc<PacketType> {
        match self {
            Self::Typed(typed) => typed.packet_type(),
            Self::Raw(raw) => raw.packet_type(),
        }
    }
}

impl From<TypedPacket> for Packet {
    fn from(packet: TypedPacket) -> Self {
        Self::Typed(packet)
    }
}

impl From<RawPacket> for Packet {
    fn from(packet: RawPacket) -> Self {
        Self::Raw(packet)
    }
}
