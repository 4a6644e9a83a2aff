//! Entity trait and type descriptors.

use patchsync_storage::Record;
use std::fmt;

/// Static descriptor of an entity type.
///
/// The sync engine dispatches on the `resource` name when several entity
/// types are registered; `name` is used in logs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityType {
    name: &'static str,
    resource: &'static str,
}

impl EntityType {
    /// Creates a descriptor.
    pub const fn new(name: &'static str, resource: &'static str) -> Self {
        Self { name, resource }
    }

    /// Returns the singular type name, e.g. `todo`.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the collection resource name, e.g. `todos`.
    pub const fn resource(&self) -> &'static str {
        self.resource
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A record type managed through a persistence bridge.
///
/// Equality must be structural: the sync engine detects "no change" by
/// comparing values, never identities.
pub trait Entity: Record + PartialEq + fmt::Debug {
    /// The descriptor for this type.
    const ENTITY_TYPE: EntityType;
}
