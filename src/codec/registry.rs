//! Bidirectional packet type registry
//!
//! Supplied by the hosting server at codec construction and read-only from
//! then on, so a single registry is shared by reference across every
//! connection without synchronization.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{Error, PacketType, Result};

/// Bijection between numeric wire identifiers and packet type descriptors.
pub struct PacketRegistry {
    by_id: HashMap<u8, Arc<PacketType>>,
    by_name: HashMap<&'static str, u8>,
}

impl PacketRegistry {
    /// Build a registry from `(id, type)` pairs.
    ///
    /// Each identifier must map to exactly one type and vice versa; a
    /// duplicate on either side is a configuration error.
    pub fn new(entries: impl IntoIterator<Item = (u8, Arc<PacketType>)>) -> Result<Self> {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();

        for (id, ty) in entries {
            if by_id.contains_key(&id) {
                return Err(Error::DuplicatePacketId { id });
            }
            if by_name.contains_key(ty.name()) {
                return Err(Error::DuplicatePacketType { name: ty.name() });
            }
            by_name.insert(ty.name(), id);
            by_id.insert(id, ty);
        }

        debug!(types = by_id.len(), "packet registry built");
        Ok(Self { by_id, by_name })
    }

    /// Resolve a logical identifier to its packet type (decode direction).
    #[must_use]
    pub fn type_for_id(&self, id: u8) -> Option<&Arc<PacketType>> {
        self.by_id.get(&id)
    }

    /// Resolve a packet type to its logical identifier (encode direction).
    #[must_use]
    pub fn id_for(&self, ty: &PacketType) -> Option<u8> {
        self.by_name.get(ty.name()).copied()
    }

    /// Number of registered packet types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_mutually_consistent() {
        let ping = PacketType::raw("ping");
        let pong = PacketType::raw("pong");
        let registry =
            PacketRegistry::new([(1, ping.clone()), (2, pong.clone())]).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.type_for_id(1), Some(&ping));
        assert_eq!(registry.id_for(&pong), Some(2));
        assert_eq!(registry.type_for_id(9), None);
        assert_eq!(registry.id_for(&PacketType::raw("other")), None);
    }

    #[test]
    fn duplicate_id_rejected() {
        let result = PacketRegistry::new([
            (1, PacketType::raw("ping")),
            (1, PacketType::raw("pong")),
        ]);
        assert!(matches!(result, Err(Error::DuplicatePacketId { id: 1 })));
    }

    #[test]
    fn duplicate_type_rejected() {
        let result = PacketRegistry::new([
            (1, PacketType::raw("ping")),
            (2, PacketType::raw("ping")),
        ]);
        assert!(matches!(
            result,
            Err(Error::DuplicatePacketType { name: "ping" })
        ));
    }
}
